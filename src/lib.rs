//! A small framework for interactive, command-routed prompts.
//!
//! Lines typed at the prompt are split on whitespace. The first two tokens form a command
//! path (`note create`), the rest are arguments. The path is matched against the handlers in
//! a [`HandlerRegistry`]; each handler is addressed by its grouping (a module path or a
//! dotted namespace) plus its type name, lower-cased, with a shared base prefix and a
//! trailing `PromptHandler` removed. Matched handlers receive the path, the arguments and a
//! mutable [`SessionState`] that lives for the whole session.
//!
//! The main entry point is [`Prompt`]. Optional collaborators plug into it: an
//! [`Exitor`] that can veto `q`/`quit`, and a [`NoMatchHandler`] that gets a chance at lines
//! no handler claims.

pub mod command;
pub mod config;
mod interpreter;
mod io_adapters;
pub mod lexer;
pub mod logging;
pub mod path;
mod registry;
pub mod snapshot;
pub mod state;
#[cfg(test)]
mod testsupport;

pub use command::{ExitPolicy, Exitor, NoMatchHandler, NoMatchPolicy, PromptHandler};
pub use config::{Launch, LaunchArgs, PromptOptions};
pub use interpreter::{PROMPT_MARKER, Prompt, Step, UNRECOGNIZED_COMMAND};
pub use io_adapters::{ConsoleReader, LineReader, ReadOutcome, ScriptedReader};
pub use path::{BasePrefix, CommandPath, HandlerIdentity};
pub use registry::HandlerRegistry;
pub use state::{SessionState, StateError};
