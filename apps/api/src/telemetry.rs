//! Tracing subscriber setup.
//!
//! Production emits one JSON object per event at `info`; development emits
//! pretty multi-line output at `debug`. `RUST_LOG` overrides either default.

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Call once, before anything logs.
pub fn init(production: bool) {
    let default_level = if production { "info" } else { "debug" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if production {
        builder.json().with_current_span(false).init();
    } else {
        builder.with_thread_ids(true).pretty().init();
    }
}
