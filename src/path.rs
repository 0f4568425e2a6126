use std::fmt;

/// Conventional suffix stripped from declared handler names, e.g. `ListPromptHandler` -> `list`.
pub const HANDLER_SUFFIX: &str = "PromptHandler";

/// Ordered, lower-cased sequence of segments identifying a handler.
///
/// Paths compare structurally: same length and the same segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CommandPath(Vec<String>);

impl CommandPath {
    /// Build a path from user tokens, lower-casing each one.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        Self(tokens.iter().map(|t| t.as_ref().to_lowercase()).collect())
    }

    /// Lower-cased segments, in order.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the path of an empty line.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CommandPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

/// Group prefix removed from every handler's group path before matching.
///
/// Segments may be separated by `.` or `::`, so both `Demo.PromptHandlers` and a Rust
/// module path such as `notes_demo::demo` are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BasePrefix(Vec<String>);

impl BasePrefix {
    /// Split on `.` or `::` and lower-case each segment. An empty string gives no prefix.
    pub fn parse(prefix: &str) -> Self {
        Self(split_group(prefix).map(|s| s.to_lowercase()).collect())
    }

    /// True when nothing is stripped.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lower-cased prefix segments.
    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for BasePrefix {
    fn from(prefix: &str) -> Self {
        Self::parse(prefix)
    }
}

impl fmt::Display for BasePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// Declared identity of a handler: the grouping it lives in plus its type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerIdentity {
    group: Vec<String>,
    name: String,
}

impl HandlerIdentity {
    /// Declare an identity explicitly. `group` uses `.` or `::` separators.
    pub fn new(group: &str, name: impl Into<String>) -> Self {
        Self {
            group: split_group(group).map(str::to_owned).collect(),
            name: name.into(),
        }
    }

    /// Identity of a handler type, taken from its fully qualified type name.
    ///
    /// `notes_demo::demo::note::Create` becomes group `[notes_demo, demo, note]` and
    /// name `Create`. Generic arguments are ignored.
    pub fn of<T: ?Sized>() -> Self {
        Self::from_type_name(std::any::type_name::<T>())
    }

    fn from_type_name(full: &str) -> Self {
        let full = full.split('<').next().unwrap_or(full);
        match full.rsplit_once("::") {
            Some((group, name)) => Self::new(group, name),
            None => Self::new("", full),
        }
    }

    /// Group segments as declared, case preserved.
    pub fn group(&self) -> &[String] {
        &self.group
    }

    /// Declared type name, suffix included.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for HandlerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}::{}", self.group.join("::"), self.name)
        }
    }
}

/// Compute the canonical command path of `identity`.
///
/// The `PromptHandler` suffix is matched against the declared name before lower-casing.
/// The base prefix is only removed when the whole prefix matches the leading group
/// segments; a partial match leaves the group untouched.
pub fn normalize(identity: &HandlerIdentity, base_prefix: &BasePrefix) -> CommandPath {
    let name = match identity.name.strip_suffix(HANDLER_SUFFIX) {
        Some(stem) if !stem.is_empty() => stem,
        _ => identity.name.as_str(),
    }
    .to_lowercase();

    let group: Vec<String> = identity.group.iter().map(|s| s.to_lowercase()).collect();
    let prefix = base_prefix.segments();
    let skip = if !prefix.is_empty() && group.starts_with(prefix) {
        prefix.len()
    } else {
        0
    };

    let mut segments: Vec<String> = group.into_iter().skip(skip).collect();
    segments.push(name);
    CommandPath(segments)
}

fn split_group(group: &str) -> impl Iterator<Item = &str> {
    group
        .split("::")
        .flat_map(|part| part.split('.'))
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    mod handlers {
        pub mod note {
            pub struct Delete;
            pub struct ListPromptHandler;
        }
    }

    fn path(segments: &[&str]) -> CommandPath {
        CommandPath::from_tokens(segments)
    }

    #[test]
    fn test_strips_base_prefix_and_lowercases() {
        let identity = HandlerIdentity::new("Demo.PromptHandlers.Note", "Delete");
        let canonical = normalize(&identity, &BasePrefix::parse("Demo.PromptHandlers"));
        assert_eq!(canonical, path(&["note", "delete"]));
    }

    #[test]
    fn test_strips_handler_suffix() {
        let identity = HandlerIdentity::new("Note", "ListPromptHandler");
        assert_eq!(
            normalize(&identity, &BasePrefix::default()),
            path(&["note", "list"])
        );
    }

    #[test]
    fn test_suffix_match_is_case_sensitive() {
        let identity = HandlerIdentity::new("Note", "Listprompthandler");
        assert_eq!(
            normalize(&identity, &BasePrefix::default()),
            path(&["note", "listprompthandler"])
        );
    }

    #[test]
    fn test_bare_suffix_is_kept_as_name() {
        let identity = HandlerIdentity::new("Note", "PromptHandler");
        assert_eq!(
            normalize(&identity, &BasePrefix::default()),
            path(&["note", "prompthandler"])
        );
    }

    #[test]
    fn test_prefix_comparison_ignores_case() {
        let identity = HandlerIdentity::new("demo.prompthandlers.Note", "Create");
        let canonical = normalize(&identity, &BasePrefix::parse("DEMO.PromptHandlers"));
        assert_eq!(canonical, path(&["note", "create"]));
    }

    #[test]
    fn test_non_matching_prefix_is_left_alone() {
        let identity = HandlerIdentity::new("Other.PromptHandlers.Note", "Create");
        let canonical = normalize(&identity, &BasePrefix::parse("Demo.PromptHandlers"));
        assert_eq!(
            canonical,
            path(&["other", "prompthandlers", "note", "create"])
        );
    }

    #[test]
    fn test_partial_prefix_match_is_not_stripped() {
        let identity = HandlerIdentity::new("Demo", "Create");
        let canonical = normalize(&identity, &BasePrefix::parse("Demo.PromptHandlers"));
        assert_eq!(canonical, path(&["demo", "create"]));
    }

    #[test]
    fn test_renormalizing_canonical_path_is_idempotent() {
        let canonical = normalize(
            &HandlerIdentity::new("Demo.PromptHandlers.Note", "DeletePromptHandler"),
            &BasePrefix::parse("Demo.PromptHandlers"),
        );
        let (name, group) = canonical.segments().split_last().unwrap();
        let again = normalize(
            &HandlerIdentity::new(&group.join("."), name.clone()),
            &BasePrefix::default(),
        );
        assert_eq!(again, canonical);
    }

    #[test]
    fn test_rust_module_paths_are_accepted() {
        let identity = HandlerIdentity::new("notes_demo::demo::note", "Create");
        let canonical = normalize(&identity, &BasePrefix::parse("notes_demo::demo"));
        assert_eq!(canonical, path(&["note", "create"]));
    }

    #[test]
    fn test_identity_from_type_name() {
        let identity = HandlerIdentity::of::<handlers::note::Delete>();
        assert_eq!(identity.name(), "Delete");
        assert_eq!(identity.group().last().map(String::as_str), Some("note"));

        let prefix = BasePrefix::parse(&format!("{}::handlers", module_path!()));
        assert_eq!(normalize(&identity, &prefix), path(&["note", "delete"]));
        assert_eq!(
            normalize(&HandlerIdentity::of::<handlers::note::ListPromptHandler>(), &prefix),
            path(&["note", "list"])
        );
    }

    #[test]
    fn test_generic_arguments_are_ignored() {
        let identity = HandlerIdentity::from_type_name("app::note::Create<app::Store>");
        assert_eq!(identity.name(), "Create");
        assert_eq!(identity.group(), ["app".to_string(), "note".to_string()]);
    }

    #[test]
    fn test_display() {
        let identity = HandlerIdentity::new("Demo.Note", "Create");
        assert_eq!(identity.to_string(), "Demo::Note::Create");
        assert_eq!(path(&["Note", "Create"]).to_string(), "note create");
    }
}
