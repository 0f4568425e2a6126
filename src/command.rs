use crate::state::SessionState;
use anyhow::Result;

/// A unit of behavior bound to one command path.
///
/// Handlers are registered in a [`HandlerRegistry`](crate::HandlerRegistry) and
/// stay immutable for the whole session; anything they need to remember goes into the
/// [`SessionState`].
pub trait PromptHandler {
    /// Handle one prompt line.
    ///
    /// `path` holds the tokens that selected this handler (as typed by the user) and
    /// `args` the remaining tokens. An error is reported to the user and the prompt
    /// continues.
    fn handle_prompt(
        &self,
        path: &[String],
        args: &[String],
        state: &mut SessionState,
    ) -> Result<()>;
}

/// Gate consulted when the user asks to quit.
pub trait Exitor {
    /// Return `true` to let the prompt terminate, `false` to keep reading.
    fn confirm_exit(&self, state: &mut SessionState) -> bool;
}

impl<F> Exitor for F
where
    F: Fn(&mut SessionState) -> bool,
{
    fn confirm_exit(&self, state: &mut SessionState) -> bool {
        self(state)
    }
}

/// Fallback invoked when no handler matches the entered path.
pub trait NoMatchHandler {
    /// Receives every token of the line. Return `true` if the input was dealt with;
    /// `false` makes the prompt print its generic "unrecognized command" message.
    fn handle_no_match(&self, tokens: &[String], state: &mut SessionState) -> bool;
}

impl<F> NoMatchHandler for F
where
    F: Fn(&[String], &mut SessionState) -> bool,
{
    fn handle_no_match(&self, tokens: &[String], state: &mut SessionState) -> bool {
        self(tokens, state)
    }
}

/// What happens when the user enters the quit sentinel.
#[derive(Default)]
pub enum ExitPolicy {
    /// Terminate immediately.
    #[default]
    Unconditional,
    /// Ask the exitor first.
    Confirm(Box<dyn Exitor>),
}

impl ExitPolicy {
    /// Boxes `exitor` into [`ExitPolicy::Confirm`].
    pub fn confirm(exitor: impl Exitor + 'static) -> Self {
        Self::Confirm(Box::new(exitor))
    }

    pub(crate) fn allows_exit(&self, state: &mut SessionState) -> bool {
        match self {
            Self::Unconditional => true,
            Self::Confirm(exitor) => exitor.confirm_exit(state),
        }
    }
}

/// What happens when a line matches no handler.
#[derive(Default)]
pub enum NoMatchPolicy {
    /// Print the generic diagnostic.
    #[default]
    Report,
    /// Let the handler try first.
    Delegate(Box<dyn NoMatchHandler>),
}

impl NoMatchPolicy {
    /// Boxes `handler` into [`NoMatchPolicy::Delegate`].
    pub fn delegate(handler: impl NoMatchHandler + 'static) -> Self {
        Self::Delegate(Box::new(handler))
    }

    /// Returns `true` when the miss was handled and no diagnostic should be printed.
    pub(crate) fn handled(&self, tokens: &[String], state: &mut SessionState) -> bool {
        match self {
            Self::Report => false,
            Self::Delegate(handler) => handler.handle_no_match(tokens, state),
        }
    }
}
