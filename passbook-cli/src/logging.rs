use tracing_subscriber::EnvFilter;

/// Log to stderr so stdout stays clean for csv/json output. `RUST_LOG`
/// wins over the configured level; `verbose` wins over both.
pub fn init(level: &str, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
