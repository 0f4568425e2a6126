use crate::path::BasePrefix;
use argh::{EarlyExit, FromArgs};
use std::io::Write;
use std::path::PathBuf;

#[derive(FromArgs, Debug, Default, PartialEq)]
/// Start an interactive prompt session.
pub struct LaunchArgs {
    #[argh(switch)]
    /// print routing decisions and the initial session state.
    pub verbose: bool,

    #[argh(option)]
    /// JSON file whose contents seed the session state under the `state` key.
    pub state: Option<PathBuf>,
}

/// Outcome of reading the command line.
#[derive(Debug, PartialEq)]
pub enum Launch {
    /// Start the prompt with these arguments.
    Run(LaunchArgs),
    /// Help was printed; nothing else to do.
    Exit,
}

impl LaunchArgs {
    /// Parse `args`, never refusing to start.
    ///
    /// `--help` writes the usage text to `out` and yields [`Launch::Exit`]. Any other parse
    /// failure, such as `--state` without a file name or an unknown flag, writes one `Error:`
    /// line and starts without a state file; `--verbose` is still honored.
    pub fn parse_or_default(command: &str, args: &[&str], out: &mut dyn Write) -> Launch {
        match Self::from_args(&[command], args) {
            Ok(parsed) => Launch::Run(parsed),
            Err(EarlyExit {
                output,
                status: Ok(()),
            }) => {
                if let Err(err) = write!(out, "{output}") {
                    tracing::debug!(error = %err, "could not print usage");
                }
                Launch::Exit
            }
            Err(EarlyExit {
                output,
                status: Err(()),
            }) => {
                if let Err(err) = writeln!(out, "Error: {}", single_line(&output)) {
                    tracing::debug!(error = %err, "could not report argument problem");
                }
                Launch::Run(Self {
                    verbose: args.contains(&"--verbose"),
                    state: None,
                })
            }
        }
    }
}

/// Collapse argh's multi-line messages into one line.
pub fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Settings the host supplies when building a [`Prompt`](crate::Prompt).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromptOptions {
    pub base_prefix: BasePrefix,
    /// See [`PromptOptions::verbose`].
    pub verbose: bool,
}

impl PromptOptions {
    /// Empty base prefix, quiet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Group prefix stripped from handler identities, e.g. `Demo.PromptHandlers`.
    pub fn base_prefix(mut self, prefix: &str) -> Self {
        self.base_prefix = BasePrefix::parse(prefix);
        self
    }

    /// Log the registered paths, the initial state and every routing decision.
    ///
    /// These are `tracing` events at info level under the `prompt_framework` target, so they
    /// only show up if the host's subscriber lets them through.
    /// [`init_tracing(true)`](crate::logging::init_tracing) does; its quiet filter does not.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl From<&LaunchArgs> for PromptOptions {
    fn from(args: &LaunchArgs) -> Self {
        Self::new().verbose(args.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<LaunchArgs, argh::EarlyExit> {
        LaunchArgs::from_args(&["notes_demo"], args)
    }

    #[test]
    fn test_no_flags() {
        assert_eq!(parse(&[]).unwrap(), LaunchArgs::default());
    }

    #[test]
    fn test_verbose_and_state() {
        let args = parse(&["--verbose", "--state", "notes.json"]).unwrap();
        assert!(args.verbose);
        assert_eq!(args.state, Some(PathBuf::from("notes.json")));

        let options = PromptOptions::from(&args).base_prefix("Demo.PromptHandlers");
        assert!(options.verbose);
        assert_eq!(options.base_prefix, BasePrefix::parse("demo.prompthandlers"));
    }

    fn launch(args: &[&str]) -> (Launch, String) {
        let mut out = Vec::new();
        let launch = LaunchArgs::parse_or_default("notes_demo", args, &mut out);
        (launch, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_valid_arguments_run_silently() {
        let (launch, printed) = launch(&["--state", "notes.json"]);
        assert_eq!(
            launch,
            Launch::Run(LaunchArgs {
                verbose: false,
                state: Some(PathBuf::from("notes.json")),
            })
        );
        assert_eq!(printed, "");
    }

    #[test]
    fn test_state_without_value_degrades_to_defaults() {
        assert!(parse(&["--state"]).unwrap_err().status.is_err());

        let (launch, printed) = launch(&["--state"]);
        assert_eq!(launch, Launch::Run(LaunchArgs::default()));
        assert!(printed.starts_with("Error: "));
        assert_eq!(printed.lines().count(), 1);
    }

    #[test]
    fn test_bad_arguments_keep_verbose() {
        let (launch, printed) = launch(&["--verbose", "--bogus"]);
        assert_eq!(
            launch,
            Launch::Run(LaunchArgs {
                verbose: true,
                state: None,
            })
        );
        assert_eq!(printed.lines().count(), 1);
    }

    #[test]
    fn test_help_exits_after_usage() {
        let (launch, printed) = launch(&["--help"]);
        assert_eq!(launch, Launch::Exit);
        assert!(printed.contains("--state"));
    }

    #[test]
    fn test_single_line() {
        assert_eq!(
            single_line("Required positional arguments not provided:\n    pattern\n"),
            "Required positional arguments not provided: pattern"
        );
        assert_eq!(single_line(""), "");
    }
}
