use crate::command::{ExitPolicy, Exitor, NoMatchHandler, NoMatchPolicy};
use crate::config::{LaunchArgs, PromptOptions};
use crate::io_adapters::{ConsoleReader, LineReader, ReadOutcome};
use crate::lexer::{split_into_tokens, split_path_and_args};
use crate::path::CommandPath;
use crate::registry::HandlerRegistry;
use crate::snapshot::load_state_or_empty;
use crate::state::SessionState;
use anyhow::Result;
use std::io::Write;

/// Marker shown before every read.
pub const PROMPT_MARKER: &str = " > ";

/// Diagnostic printed when a line matches no handler and nothing else claimed it.
pub const UNRECOGNIZED_COMMAND: &str = "Error: Unrecognized command.";

/// What a single line did to the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Blank line; nothing happened.
    Ignored,
    /// A handler ran and completed.
    Dispatched,
    /// A handler ran and reported an error, which was printed.
    HandlerFailed,
    /// No handler matched and the no-match handler took care of it.
    NoMatchHandled,
    /// No handler matched; the generic diagnostic was printed.
    Unrecognized,
    /// Quit was requested but the exitor refused.
    ExitDenied,
    /// Quit was confirmed. The loop stops.
    Terminated,
}

fn is_quit(line: &str) -> bool {
    line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit")
}

/// Read-eval loop that routes prompt lines to registered handlers.
///
/// Each line is trimmed and split on whitespace. `q`/`quit` asks the [`ExitPolicy`]
/// whether to stop; anything else is split into a path (first two tokens) and arguments,
/// and the path is resolved against the registry. Lines are handled strictly one after
/// another, so a handler always finishes before the next prompt appears.
///
/// Example
/// ```
/// use prompt_framework::{HandlerRegistry, Prompt, PromptOptions, ScriptedReader};
///
/// let mut prompt = Prompt::new(HandlerRegistry::new(), PromptOptions::new());
/// let mut reader = ScriptedReader::new(["fly to moon", "q"]);
/// let mut out = Vec::new();
/// prompt.run_with(&mut reader, &mut out).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "Error: Unrecognized command.\n");
/// ```
pub struct Prompt {
    registry: HandlerRegistry,
    exit: ExitPolicy,
    no_match: NoMatchPolicy,
    state: SessionState,
    options: PromptOptions,
}

impl Prompt {
    /// Create a prompt with an empty state, unconditional exit and the generic no-match
    /// diagnostic.
    pub fn new(registry: HandlerRegistry, options: PromptOptions) -> Self {
        Self {
            registry,
            exit: ExitPolicy::default(),
            no_match: NoMatchPolicy::default(),
            state: SessionState::new(),
            options,
        }
    }

    /// Create a prompt configured from command-line flags.
    ///
    /// `--verbose` is merged into `options`; `--state <file>` seeds the session state,
    /// falling back to an empty state (with a printed diagnostic) if the file is unusable.
    pub fn from_args(
        registry: HandlerRegistry,
        options: PromptOptions,
        args: &LaunchArgs,
    ) -> Self {
        let options = PromptOptions {
            verbose: options.verbose || args.verbose,
            ..options
        };
        let state = match &args.state {
            Some(path) => load_state_or_empty(path, &mut std::io::stdout()),
            None => SessionState::new(),
        };
        Self::new(registry, options).with_state(state)
    }

    /// Start from `state` instead of an empty one.
    pub fn with_state(mut self, state: SessionState) -> Self {
        self.state = state;
        self
    }

    /// Ask `exitor` before quitting.
    pub fn with_exitor(self, exitor: impl Exitor + 'static) -> Self {
        self.with_exit_policy(ExitPolicy::confirm(exitor))
    }

    /// Replace the exit policy.
    pub fn with_exit_policy(mut self, policy: ExitPolicy) -> Self {
        self.exit = policy;
        self
    }

    /// Give `handler` the first go at unmatched lines.
    pub fn with_no_match_handler(self, handler: impl NoMatchHandler + 'static) -> Self {
        self.with_no_match_policy(NoMatchPolicy::delegate(handler))
    }

    /// Replace the no-match policy.
    pub fn with_no_match_policy(mut self, policy: NoMatchPolicy) -> Self {
        self.no_match = policy;
        self
    }

    /// Current session state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Mutable access to the session state between dispatches.
    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    /// Handlers this prompt routes to.
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Effective options, `--verbose` merged in.
    pub fn options(&self) -> &PromptOptions {
        &self.options
    }

    /// Interactive loop on the terminal, using rustyline for input and stdout for
    /// diagnostics.
    pub fn repl(&mut self) -> Result<()> {
        let mut reader = ConsoleReader::new()?;
        let mut stdout = std::io::stdout();
        self.run_with(&mut reader, &mut stdout)
    }

    /// Drive the loop until quit is confirmed or `reader` runs out of input.
    ///
    /// Ctrl-C counts as a quit request and goes through the exit policy. End of input
    /// stops the loop directly, since no confirmation could be read anyway.
    pub fn run_with(&mut self, reader: &mut dyn LineReader, out: &mut dyn Write) -> Result<()> {
        self.announce();

        loop {
            out.flush()?;
            let step = match reader.read_line(PROMPT_MARKER)? {
                ReadOutcome::Line(line) => {
                    let trimmed = line.trim();
                    if !trimmed.is_empty() {
                        reader.add_history(trimmed);
                    }
                    self.dispatch_line(trimmed, out)?
                }
                ReadOutcome::Interrupted => self.request_exit(),
                ReadOutcome::Eof => {
                    tracing::debug!("end of input");
                    break;
                }
            };
            if step == Step::Terminated {
                break;
            }
        }

        out.flush()?;
        Ok(())
    }

    /// Process one line and report what happened.
    pub fn dispatch_line(&mut self, line: &str, out: &mut dyn Write) -> Result<Step> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Step::Ignored);
        }
        if is_quit(line) {
            return Ok(self.request_exit());
        }

        let tokens = split_into_tokens(line);
        if tokens.is_empty() {
            return Ok(Step::Ignored);
        }
        let (path, args) = split_path_and_args(&tokens);
        let wanted = CommandPath::from_tokens(path);

        if let Some(handler) = self.registry.resolve(&wanted, &self.options.base_prefix) {
            if self.options.verbose {
                tracing::info!(path = %wanted, args = args.len(), "dispatching");
            }
            return match handler.handle_prompt(path, args, &mut self.state) {
                Ok(()) => Ok(Step::Dispatched),
                Err(err) => {
                    tracing::debug!(path = %wanted, error = %err, "handler failed");
                    writeln!(out, "Error: {err:#}")?;
                    Ok(Step::HandlerFailed)
                }
            };
        }

        if self.options.verbose {
            tracing::info!(path = %wanted, "no handler matched");
        }
        if self.no_match.handled(&tokens, &mut self.state) {
            return Ok(Step::NoMatchHandled);
        }
        writeln!(out, "{UNRECOGNIZED_COMMAND}")?;
        Ok(Step::Unrecognized)
    }

    fn request_exit(&mut self) -> Step {
        if self.exit.allows_exit(&mut self.state) {
            Step::Terminated
        } else {
            tracing::debug!("exit denied");
            Step::ExitDenied
        }
    }

    fn announce(&self) {
        for (hidden, winner) in self.registry.shadowed(&self.options.base_prefix) {
            tracing::warn!(
                handler = %hidden,
                shadowed_by = %winner,
                "handler is unreachable: an earlier handler claims the same path"
            );
        }
        if self.options.verbose {
            for path in self.registry.paths(&self.options.base_prefix) {
                tracing::info!(path = %path, "registered handler");
            }
            match serde_json::to_string_pretty(&self.state.to_json()) {
                Ok(json) => tracing::info!("initial session state:\n{json}"),
                Err(err) => tracing::debug!(error = %err, "could not render session state"),
            }
        }
    }
}
