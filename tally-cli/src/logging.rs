use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global subscriber. Logs go to stderr so tables on stdout stay
/// clean.
///
/// Precedence: explicit `--log-level`, then `RUST_LOG`, then the config file.
pub fn setup_logging(flag: Option<&str>, configured: &str) {
    let filter = flag
        .and_then(|lvl| EnvFilter::try_new(lvl).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .or_else(|| EnvFilter::try_new(configured).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry().with(filter).with(layer).init();
}
