//! Diagnostic logging to stderr.

use std::io::stderr;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Install the global subscriber.
///
/// Defaults to `warn`, or `debug` when `verbose` is set. `RUST_LOG` overrides
/// both. Logs go to stderr so command output on stdout stays clean.
pub fn init(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(filter);

    // Ignore a second init.
    let _ = tracing_subscriber::registry().with(terminal_log).try_init();
}
