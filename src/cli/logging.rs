use tracing_subscriber::EnvFilter;

/// Initialize logging with tracing-subscriber.
///
/// `RUST_LOG` takes precedence over the given level. Logs go to stderr so
/// that command output on stdout stays clean.
pub fn init(log_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
