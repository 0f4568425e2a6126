use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "prompt_framework=debug,info"
    } else {
        "warn"
    }
}

/// Install a stderr subscriber for the prompt's diagnostics.
///
/// `RUST_LOG` takes precedence; otherwise `verbose` turns on routing-level output. A second
/// call leaves the first subscriber in place and prints a warning.
pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .without_time()
        .try_init();

    if let Err(err) = result {
        eprintln!("Warning: tracing already initialised: {err}");
    }
}
