//! Observability for the nats-box tools
//!
//! Structured logging on stderr; see [`logging`].

pub mod logging;

// Re-export for convenience
pub use logging::{init_logging, LogFormat, LogSettings};
