//! `state ...` commands for inspecting the session.

use anyhow::{Context, Result};
use prompt_framework::{PromptHandler, SessionState};

/// `state show [key]`
pub struct Show;

fn render(state: &SessionState, key: Option<&str>) -> Result<String> {
    let value = match key {
        Some(key) => state.get_value(key).cloned().unwrap_or_default(),
        None => state.to_json(),
    };
    serde_json::to_string_pretty(&value).context("failed to render session state")
}

impl PromptHandler for Show {
    fn handle_prompt(
        &self,
        _path: &[String],
        args: &[String],
        state: &mut SessionState,
    ) -> Result<()> {
        println!("{}", render(state, args.first().map(String::as_str))?);
        Ok(())
    }
}

/// `state clear`
pub struct Clear;

impl PromptHandler for Clear {
    fn handle_prompt(
        &self,
        _path: &[String],
        _args: &[String],
        state: &mut SessionState,
    ) -> Result<()> {
        let count = state.len();
        state.clear();
        println!("Cleared {count} entries");
        Ok(())
    }
}
