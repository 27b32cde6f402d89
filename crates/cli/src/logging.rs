//! Logging setup for the terminal front end.

use tracing_subscriber::EnvFilter;

/// Install a stderr subscriber.
///
/// Respects `RUST_LOG`, defaults to `warn` so log lines stay out of the way
/// of the rendered dashboard on stdout.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
