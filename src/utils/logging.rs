use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Pick the log filter: `--verbose` wins, then `RUST_LOG`, then the config file level.
pub fn env_filter(config_level: &str, verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::try_new(config_level).unwrap_or_else(|_| EnvFilter::new("info")))
}

/// Install the global subscriber. Logs go to stderr so stdout stays machine-readable.
///
/// Calling this twice is harmless; the second call is ignored.
pub fn init_logging(config_level: &str, verbose: bool) {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(env_filter(config_level, verbose))
        .try_init();
}
