use serde::de::DeserializeOwned;
use serde::ser::{self, Impossible, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;

/// Errors produced by typed access to [`SessionState`].
#[derive(Debug, Error)]
pub enum StateError {
    #[error("state key `{key}` holds a value of a different type: {source}")]
    Type {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("value for state key `{key}` cannot be stored: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Mutable key/value store shared by every dispatch of one prompt session.
///
/// Values are kept as [`serde_json::Value`]. A `null` value is never stored: setting a key
/// to `None` (or to a unit-like value that serializes to `null`) removes it, so a cleared key
/// reads exactly like one that was never set. NaN and the infinities have no JSON form and
/// are rejected rather than treated as `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    values: HashMap<String, Value>,
}

impl SessionState {
    /// An empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `key` as `T`. Returns `None` when the key is absent or holds another type.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.try_get(key).ok().flatten()
    }

    /// Read `key` as `T`, reporting a type mismatch as an error instead of `None`.
    pub fn try_get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StateError> {
        match self.values.get(key) {
            None => Ok(None),
            Some(value) => T::deserialize(value)
                .map(Some)
                .map_err(|source| StateError::Type {
                    key: key.to_owned(),
                    source,
                }),
        }
    }

    /// The raw JSON stored under `key`.
    pub fn get_value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Store `value` under `key`; `None` removes the key.
    ///
    /// A non-finite float is an [`StateError::Encode`] error and leaves the key untouched.
    pub fn set<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: Option<T>,
    ) -> Result<(), StateError> {
        let key = key.into();
        let value = match value {
            Some(v) => {
                let encode = |source| StateError::Encode {
                    key: key.clone(),
                    source,
                };
                let value = serde_json::to_value(&v).map_err(encode)?;
                if value.is_null() && v.serialize(NonFinite).unwrap_or(false) {
                    return Err(encode(ser::Error::custom("NaN and infinity have no JSON form")));
                }
                value
            }
            None => Value::Null,
        };
        self.set_value(key, value);
        Ok(())
    }

    /// Store a raw value; `Value::Null` removes the key.
    pub fn set_value(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        if value.is_null() {
            self.values.remove(&key);
        } else {
            self.values.insert(key, value);
        }
    }

    /// Remove `key`, returning what it held.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    /// Whether `key` holds a value.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Drop every key.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no key holds a value.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Stored keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Snapshot of the whole state as a JSON object, keys sorted.
    pub fn to_json(&self) -> Value {
        let mut keys: Vec<&String> = self.values.keys().collect();
        keys.sort();
        let map: Map<String, Value> = keys
            .into_iter()
            .map(|k| (k.clone(), self.values[k].clone()))
            .collect();
        Value::Object(map)
    }
}

/// Tells a non-finite float apart from the unit-like values that also serialize to `null`.
struct NonFinite;

macro_rules! finite_scalars {
    ($($method:ident($ty:ty)),* $(,)?) => {
        $(fn $method(self, _: $ty) -> Result<bool, Self::Error> {
            Ok(false)
        })*
    };
}

fn compound() -> serde_json::Error {
    ser::Error::custom("compound value")
}

impl Serializer for NonFinite {
    type Ok = bool;
    type Error = serde_json::Error;
    type SerializeSeq = Impossible<bool, serde_json::Error>;
    type SerializeTuple = Impossible<bool, serde_json::Error>;
    type SerializeTupleStruct = Impossible<bool, serde_json::Error>;
    type SerializeTupleVariant = Impossible<bool, serde_json::Error>;
    type SerializeMap = Impossible<bool, serde_json::Error>;
    type SerializeStruct = Impossible<bool, serde_json::Error>;
    type SerializeStructVariant = Impossible<bool, serde_json::Error>;

    finite_scalars!(
        serialize_bool(bool),
        serialize_i8(i8),
        serialize_i16(i16),
        serialize_i32(i32),
        serialize_i64(i64),
        serialize_u8(u8),
        serialize_u16(u16),
        serialize_u32(u32),
        serialize_u64(u64),
        serialize_char(char),
        serialize_str(&str),
        serialize_bytes(&[u8]),
        serialize_unit_struct(&'static str),
    );

    fn serialize_f32(self, v: f32) -> Result<bool, Self::Error> {
        Ok(!v.is_finite())
    }

    fn serialize_f64(self, v: f64) -> Result<bool, Self::Error> {
        Ok(!v.is_finite())
    }

    fn serialize_none(self) -> Result<bool, Self::Error> {
        Ok(false)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<bool, Self::Error> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<bool, Self::Error> {
        Ok(false)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
    ) -> Result<bool, Self::Error> {
        Ok(false)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<bool, Self::Error> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<bool, Self::Error> {
        Ok(false)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        Err(compound())
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        Err(compound())
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        Err(compound())
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        Err(compound())
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        Err(compound())
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        Err(compound())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        Err(compound())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[test]
    fn test_store_and_retrieve() {
        let mut state = SessionState::new();
        state.set("username", Some("Alice")).unwrap();

        assert_eq!(state.get::<String>("username"), Some("Alice".to_string()));
    }

    #[test]
    fn test_override_existing_value() {
        let mut state = SessionState::new();
        state.set("counter", Some(1)).unwrap();
        state.set("counter", Some(2)).unwrap();

        assert_eq!(state.get::<i64>("counter"), Some(2));
    }

    #[test]
    fn test_setting_none_is_same_as_never_set() {
        let mut state = SessionState::new();
        state.set("username", Some("Alice")).unwrap();
        state.set::<String>("username", None).unwrap();

        assert_eq!(state, SessionState::new());
        assert!(!state.contains("username"));
        assert_eq!(state.get::<String>("username"), None);
        assert!(state.get_value("username").is_none());
        assert!(state.try_get::<String>("username").unwrap().is_none());
    }

    #[test]
    fn test_null_serialization_removes_key() {
        let mut state = SessionState::new();
        state.set("k", Some(5)).unwrap();
        state.set("k", Some(())).unwrap();
        assert!(state.is_empty());

        state.set_value("k", json!(1));
        state.set_value("k", Value::Null);
        assert!(state.is_empty());
    }

    #[test]
    fn test_non_finite_float_is_rejected() {
        let mut state = SessionState::new();
        state.set("ratio", Some(0.5)).unwrap();

        assert!(matches!(
            state.set("ratio", Some(f64::NAN)),
            Err(StateError::Encode { ref key, .. }) if key == "ratio"
        ));
        assert!(state.set("ratio", Some(f32::INFINITY)).is_err());
        assert!(state.set("ratio", Some(Some(f64::NEG_INFINITY))).is_err());
        assert_eq!(state.get::<f64>("ratio"), Some(0.5));

        state.set("ratio", Some(None::<f64>)).unwrap();
        assert!(!state.contains("ratio"));
    }

    #[test]
    fn test_clear() {
        let mut state = SessionState::new();
        state.set("username", Some("Alice")).unwrap();
        state.set("counter", Some(10)).unwrap();

        state.clear();

        assert_eq!(state.get::<String>("username"), None);
        assert_eq!(state.get::<i32>("counter"), None);
        assert_eq!(state.len(), 0);
    }

    #[test]
    fn test_type_mismatch() {
        let mut state = SessionState::new();
        state.set("counter", Some("ten")).unwrap();

        assert_eq!(state.get::<i32>("counter"), None);
        assert!(matches!(
            state.try_get::<i32>("counter"),
            Err(StateError::Type { ref key, .. }) if key == "counter"
        ));
    }

    #[test]
    fn test_structured_values() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Note {
            text: String,
        }

        let mut state = SessionState::new();
        let notes = vec![Note { text: "a".into() }, Note { text: "b".into() }];
        state.set("notes", Some(&notes)).unwrap();

        assert_eq!(state.get::<Vec<Note>>("notes"), Some(notes));
        assert_eq!(
            state.to_json(),
            json!({ "notes": [{ "text": "a" }, { "text": "b" }] })
        );
    }
}
