//! Tracing setup for the binary.
//!
//! Logs go to stderr so stdout carries only the conversation.

use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::EnvFilter;

/// Build the filter: `RUST_LOG` wins, then `directive`, then `warn`.
pub fn resolve_env_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber. Calling it again is harmless.
pub fn init_tracing(directive: &str) {
    let layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr);
    let _ = tracing_subscriber::registry()
        .with(resolve_env_filter(directive))
        .with(layer)
        .try_init();
}
