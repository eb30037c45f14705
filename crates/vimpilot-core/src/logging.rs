use tracing_subscriber::EnvFilter;

/// Initialize structured logging to stderr.
///
/// `RUST_LOG` wins when set; otherwise quiet mode only surfaces warnings and
/// verbose mode enables debug events from both crates. Safe to call more
/// than once (later calls are ignored), which keeps tests painless.
pub fn init_logging(quiet: bool) {
    let default_directives = if quiet {
        "warn"
    } else {
        "vimpilot_core=debug,vimpilot=debug,info"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
