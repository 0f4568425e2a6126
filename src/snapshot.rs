//! Seeding the session state from a JSON file given at startup.
//!
//! The file must contain a JSON object; it is stored whole under [`STATE_KEY`]. Any problem
//! with the file leaves the session with an empty state and a single diagnostic line.

use crate::state::SessionState;
use serde_json::Value;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Key under which an imported snapshot is stored.
pub const STATE_KEY: &str = "state";

/// Why a state file could not be used.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("State file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Cannot read state file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("State file {} is not valid JSON: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("State file {} must contain a JSON object", .0.display())]
    NotAnObject(PathBuf),
}

/// Read `path` and build a state holding its contents under [`STATE_KEY`].
pub fn load_state(path: &Path) -> Result<SessionState, SnapshotError> {
    let text = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => SnapshotError::NotFound(path.to_owned()),
        _ => SnapshotError::Io {
            path: path.to_owned(),
            source,
        },
    })?;

    let value: Value = serde_json::from_str(&text).map_err(|source| SnapshotError::Parse {
        path: path.to_owned(),
        source,
    })?;
    if !value.is_object() {
        return Err(SnapshotError::NotAnObject(path.to_owned()));
    }

    let mut state = SessionState::new();
    state.set_value(STATE_KEY, value);
    Ok(state)
}

/// Like [`load_state`], but falls back to an empty state after writing the error to `out`.
///
/// `out` gets the only user-facing line; the matching tracing event is at debug level.
pub fn load_state_or_empty(path: &Path, out: &mut dyn Write) -> SessionState {
    match load_state(path) {
        Ok(state) => {
            tracing::info!(path = %path.display(), "loaded session state");
            state
        }
        Err(err) => {
            tracing::debug!(error = %err, "starting with empty session state");
            if let Err(write_err) = writeln!(out, "Error: {err}") {
                tracing::debug!(error = %write_err, "could not report state file problem");
            }
            SessionState::new()
        }
    }
}
