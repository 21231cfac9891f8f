//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at startup
//! - Apply the configured log level, letting `RUST_LOG` override it
//!
//! # Design Decisions
//! - Uses the tracing crate for structured logging
//! - Level comes from config; the environment wins when set, so operators
//!   can turn up verbosity without touching the deployed config

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber.
pub fn init(log_level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("edge_router={log_level},tower_http=warn"))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
