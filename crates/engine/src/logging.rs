//! Tracing setup for embedding applications

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "earnin_engine=debug,earnin_networking=info,earnin_persistence=info";

/// Install the fmt subscriber, filtered by `RUST_LOG` or `default_filter`.
/// Returns false if a global subscriber was already set.
pub fn init(default_filter: &str) -> bool {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
