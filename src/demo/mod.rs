//! Note-taking handlers wired into the demo prompt.

pub mod note;
pub mod repository;
pub mod state;

use prompt_framework::{CommandPath, Exitor, HandlerRegistry, NoMatchHandler, SessionState};
use repository::NoteRepository;
use rustyline::DefaultEditor;

/// Group prefix shared by the demo handlers, so `demo::note::Create` answers to `note create`.
pub fn base_prefix() -> &'static str {
    module_path!()
}

/// Every handler the demo knows about, in resolution order.
pub fn registry() -> HandlerRegistry {
    let repo = NoteRepository;
    HandlerRegistry::new()
        .with(note::Create::new(repo))
        .with(note::Delete::new(repo))
        .with(note::ListPromptHandler::new(repo))
        .with(note::Find::new(repo))
        .with(state::Show)
        .with(state::Clear)
}

/// Asks for confirmation before leaving.
pub struct ConfirmExit;

impl Exitor for ConfirmExit {
    fn confirm_exit(&self, _state: &mut SessionState) -> bool {
        let answer = DefaultEditor::new()
            .and_then(|mut editor| editor.readline("Are you sure you want to exit? (y/n): "));
        match answer {
            Ok(line) => is_yes(&line),
            // nobody left to answer
            Err(err) => {
                tracing::debug!(error = %err, "exit confirmation unavailable");
                true
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

/// Echoes unknown input and points at commands sharing its first word.
pub struct UnknownCommand {
    known: Vec<CommandPath>,
}

impl UnknownCommand {
    pub fn new(known: Vec<CommandPath>) -> Self {
        Self { known }
    }

    fn suggestions(&self, tokens: &[String]) -> Vec<String> {
        let Some(first) = tokens.first().map(|t| t.to_lowercase()) else {
            return Vec::new();
        };
        self.known
            .iter()
            .filter(|p| p.segments().first() == Some(&first))
            .map(|p| p.to_string())
            .collect()
    }
}

impl NoMatchHandler for UnknownCommand {
    fn handle_no_match(&self, tokens: &[String], _state: &mut SessionState) -> bool {
        println!("Unknown command: {}", tokens.join(" "));
        let suggestions = self.suggestions(tokens);
        if !suggestions.is_empty() {
            println!("Did you mean: {}", suggestions.join(", "));
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prompt_framework::{BasePrefix, Prompt, PromptOptions, ScriptedReader, UNRECOGNIZED_COMMAND};

    fn prefix() -> BasePrefix {
        BasePrefix::parse(base_prefix())
    }

    fn strings(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_demo_paths() {
        let paths: Vec<String> = registry()
            .paths(&prefix())
            .iter()
            .map(|p| p.to_string())
            .collect();
        assert_eq!(
            paths,
            [
                "note create",
                "note delete",
                "note list",
                "note find",
                "state show",
                "state clear"
            ]
        );
        assert!(registry().shadowed(&prefix()).is_empty());
    }

    #[test]
    fn test_suggestions_share_first_word() {
        let unknown = UnknownCommand::new(registry().paths(&prefix()));
        assert_eq!(
            unknown.suggestions(&strings(&["NOTE", "edit"])),
            ["note create", "note delete", "note list", "note find"]
        );
        assert!(unknown.suggestions(&strings(&["fly", "to", "moon"])).is_empty());
        assert!(unknown.suggestions(&[]).is_empty());
    }

    #[test]
    fn test_yes_answers() {
        assert!(is_yes("y"));
        assert!(is_yes(" Y \n"));
        assert!(!is_yes("yes"));
        assert!(!is_yes(""));
    }

    #[test]
    fn test_session_round() {
        let registry = registry();
        let known = registry.paths(&prefix());
        let options = PromptOptions {
            base_prefix: prefix(),
            verbose: false,
        };
        let mut prompt = Prompt::new(registry, options)
            .with_no_match_handler(UnknownCommand::new(known));

        let mut reader = ScriptedReader::new([
            "note create My first note",
            "Note Create second",
            "note delete",
            "fly to moon",
        ]);
        let mut out = Vec::new();
        prompt.run_with(&mut reader, &mut out).unwrap();

        let notes = NoteRepository.all(prompt.state());
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].text, "My first note");
        assert_eq!(String::from_utf8(out).unwrap(), format!("{UNRECOGNIZED_COMMAND}\n"));
    }
}
