use anyhow::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::collections::VecDeque;

/// Result of one attempt to read a prompt line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    /// The user pressed Ctrl-C.
    Interrupted,
    /// No more input will arrive.
    Eof,
}

/// Source of prompt lines for the REPL loop.
///
/// Implementations show `prompt` before blocking for input.
pub trait LineReader {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome>;

    /// Remember a line that was accepted for dispatch.
    fn add_history(&mut self, _line: &str) {}
}

/// Interactive console reader backed by rustyline.
pub struct ConsoleReader {
    editor: DefaultEditor,
}

impl ConsoleReader {
    /// A rustyline editor on the terminal.
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new().context("failed to initialise line editor")?;
        Ok(Self { editor })
    }
}

impl LineReader for ConsoleReader {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadOutcome::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
            Err(err) => Err(err).context("failed to read prompt line"),
        }
    }

    fn add_history(&mut self, line: &str) {
        if let Err(err) = self.editor.add_history_entry(line) {
            tracing::debug!(error = %err, "could not record history entry");
        }
    }
}

/// Memory-backed reader that replays a fixed script, then reports end of input.
///
/// Every prompt it is asked to show is recorded, which lets callers check how many
/// times the loop came back for input.
#[derive(Debug, Default)]
pub struct ScriptedReader {
    lines: VecDeque<ReadOutcome>,
    prompts: Vec<String>,
    history: Vec<String>,
}

impl ScriptedReader {
    /// Script that yields each of `lines`, then end of input.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(|l| ReadOutcome::Line(l.into())).collect(),
            ..Self::default()
        }
    }

    /// Queue a Ctrl-C after the lines already scripted.
    pub fn then_interrupt(mut self) -> Self {
        self.lines.push_back(ReadOutcome::Interrupted);
        self
    }

    /// Every prompt shown so far.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Lines added to history.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Scripted outcomes not yet read.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineReader for ScriptedReader {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome> {
        self.prompts.push(prompt.to_owned());
        Ok(self.lines.pop_front().unwrap_or(ReadOutcome::Eof))
    }

    fn add_history(&mut self, line: &str) {
        self.history.push(line.to_owned());
    }
}
