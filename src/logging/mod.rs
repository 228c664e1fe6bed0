//! Logging for the gateway
//!
//! Two layers:
//! - Diagnostic tracing to the console (`tracing` + `tracing-subscriber`)
//! - The append-only request log written by both pipelines

pub mod events;
pub mod logger;

pub use events::{LogEvent, RequestContext, SourceSummary};
pub use logger::{FileRequestLogger, MemoryRequestLogger, RequestLogger, DEFAULT_LOG_FILE};

use tracing_subscriber::EnvFilter;

/// Install the console subscriber
///
/// `RUST_LOG` wins over `default_level` when set. Calling this twice is a
/// no-op.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
