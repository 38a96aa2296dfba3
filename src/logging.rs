//! Diagnostic logging setup.
//!
//! Log lines go to stderr through `tracing`. Once shutdown starts, output is
//! suppressed so that late log lines from background tasks don't interleave
//! with the final messages.

use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

static SUPPRESSED: AtomicBool = AtomicBool::new(false);

/// Default filter directive for the given verbosity.
pub fn default_directive(debug: bool) -> &'static str {
    if debug { "lintctl=debug" } else { "lintctl=info" }
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over the `--debug` flag.
pub fn init(debug: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directive(debug).into());

    let fmt = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(filter::filter_fn(|_| !is_suppressed()));

    // A subscriber may already be installed by tests.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt)
        .try_init();
}

/// Stop emitting log lines for the rest of the process.
pub fn suppress() {
    SUPPRESSED.store(true, Ordering::SeqCst);
}

pub fn is_suppressed() -> bool {
    SUPPRESSED.load(Ordering::SeqCst)
}
