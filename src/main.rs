mod demo;

use prompt_framework::{Launch, LaunchArgs, Prompt, PromptOptions, logging};
use std::path::Path;

fn main() -> anyhow::Result<()> {
    let argv: Vec<String> = std::env::args().collect();
    let command = argv
        .first()
        .and_then(|arg| Path::new(arg).file_name())
        .and_then(|name| name.to_str())
        .unwrap_or("notes_demo");
    let rest: Vec<&str> = argv.iter().skip(1).map(String::as_str).collect();

    let args = match LaunchArgs::parse_or_default(command, &rest, &mut std::io::stdout()) {
        Launch::Run(args) => args,
        Launch::Exit => return Ok(()),
    };
    logging::init_tracing(args.verbose);

    let options = PromptOptions::from(&args).base_prefix(demo::base_prefix());
    let registry = demo::registry();
    let known = registry.paths(&options.base_prefix);

    let mut prompt = Prompt::from_args(registry, options, &args)
        .with_exitor(demo::ConfirmExit)
        .with_no_match_handler(demo::UnknownCommand::new(known));
    prompt.repl()
}
