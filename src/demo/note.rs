//! `note ...` commands.

use super::repository::{Note, NoteRepository};
use anyhow::{Context, Result, bail};
use argh::{EarlyExit, FromArgs};
use prompt_framework::config::single_line;
use prompt_framework::{PromptHandler, SessionState};
use regex::{Regex, RegexBuilder};

/// `note create <text>`
pub struct Create {
    repo: NoteRepository,
}

impl Create {
    pub fn new(repo: NoteRepository) -> Self {
        Self { repo }
    }
}

impl PromptHandler for Create {
    fn handle_prompt(
        &self,
        _path: &[String],
        args: &[String],
        state: &mut SessionState,
    ) -> Result<()> {
        if args.is_empty() {
            bail!("usage: note create <text>");
        }
        let note = self.repo.create(state, args.join(" "))?;
        println!("Note {} created: {}", note.id, note.text);
        Ok(())
    }
}

/// `note delete`, removes the latest note.
pub struct Delete {
    repo: NoteRepository,
}

impl Delete {
    pub fn new(repo: NoteRepository) -> Self {
        Self { repo }
    }
}

impl PromptHandler for Delete {
    fn handle_prompt(
        &self,
        _path: &[String],
        _args: &[String],
        state: &mut SessionState,
    ) -> Result<()> {
        match self.repo.delete_last(state)? {
            Some(note) => println!("Note {} deleted", note.id),
            None => println!("No notes to delete"),
        }
        Ok(())
    }
}

/// `note list`
pub struct ListPromptHandler {
    repo: NoteRepository,
}

impl ListPromptHandler {
    pub fn new(repo: NoteRepository) -> Self {
        Self { repo }
    }
}

impl PromptHandler for ListPromptHandler {
    fn handle_prompt(
        &self,
        _path: &[String],
        _args: &[String],
        state: &mut SessionState,
    ) -> Result<()> {
        let notes = self.repo.all(state);
        if notes.is_empty() {
            println!("No notes yet");
        }
        for note in notes {
            println!("{:>3}  {}", note.id, note.text);
        }
        Ok(())
    }
}

#[derive(FromArgs, Debug)]
/// Print notes matching a pattern.
struct FindArgs {
    #[argh(positional)]
    /// the pattern to search for (a regular expression)
    pattern: String,

    #[argh(switch, short = 'w')]
    /// match only whole words
    word_regexp: bool,

    #[argh(switch, short = 'i')]
    /// ignore case distinctions
    ignore_case: bool,
}

impl FindArgs {
    fn regex(&self) -> Result<Regex> {
        let pattern = if self.word_regexp {
            format!(r"\b({})\b", self.pattern)
        } else {
            self.pattern.clone()
        };
        RegexBuilder::new(&pattern)
            .case_insensitive(self.ignore_case)
            .build()
            .with_context(|| format!("Invalid regex pattern: {}", pattern))
    }
}

fn matching<'a>(notes: &'a [Note], re: &Regex) -> Vec<&'a Note> {
    notes.iter().filter(|n| re.is_match(&n.text)).collect()
}

/// `note find [-i] [-w] <pattern>`
pub struct Find {
    repo: NoteRepository,
}

impl Find {
    pub fn new(repo: NoteRepository) -> Self {
        Self { repo }
    }
}

impl PromptHandler for Find {
    fn handle_prompt(
        &self,
        path: &[String],
        args: &[String],
        state: &mut SessionState,
    ) -> Result<()> {
        let command = path.join(" ");
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let find = match FindArgs::from_args(&[command.as_str()], &args) {
            Ok(find) => find,
            Err(EarlyExit { output, status }) => {
                return match status {
                    Ok(()) => {
                        println!("{output}");
                        Ok(())
                    }
                    Err(()) => bail!("{}", single_line(&output)),
                };
            }
        };

        let notes = self.repo.all(state);
        let found = matching(&notes, &find.regex()?);
        if found.is_empty() {
            println!("No matching notes");
        }
        for note in found {
            println!("{:>3}  {}", note.id, note.text);
        }
        Ok(())
    }
}
