//! Logging setup for the command line tools.

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a global subscriber that writes human-readable logs to stderr.
///
/// `RUST_LOG` takes precedence when set; otherwise `default_level` (e.g.
/// "info" or "dashboard_metrics=debug") is used. Stdout is left free for the
/// command's output.
pub fn setup_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_log = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(stderr_log.with_filter(filter))
        .init();
}
