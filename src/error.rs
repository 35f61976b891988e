//! Error types for the nats-box tools
//!
//! Every failure in these tools is fatal: the application logs the error and
//! exits with status 1. The variants exist so the log line says what failed.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Boxed error carried across the transport seam
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for nats-box operations
#[derive(Debug, Error)]
pub enum NatsBoxError {
    #[error("Unable to load credentials from {}: {source}", path.display())]
    Credentials {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Connect(#[source] BoxError),

    #[error("Publish failed: {0}")]
    Publish(#[source] BoxError),

    #[error("Flush failed: {0}")]
    Flush(#[source] BoxError),

    #[error("Subscribe failed: {0}")]
    Subscribe(#[source] BoxError),

    #[error("{0} for request")]
    Request(#[source] BoxError),

    #[error("timeout after {}s for request", .0.as_secs())]
    RequestTimeout(Duration),

    #[error("Unable to write reply: {0}")]
    Output(#[from] std::io::Error),

    #[error("Exiting: {0}")]
    Closed(String),

    #[error("Exiting: subscription on [{subject}] closed")]
    SubscriptionClosed { subject: String },
}

impl NatsBoxError {
    /// Create connection error
    pub fn connect<E: Into<BoxError>>(error: E) -> Self {
        Self::Connect(error.into())
    }

    /// Create publish error
    pub fn publish<E: Into<BoxError>>(error: E) -> Self {
        Self::Publish(error.into())
    }

    /// Create flush error
    pub fn flush<E: Into<BoxError>>(error: E) -> Self {
        Self::Flush(error.into())
    }

    /// Create subscribe error
    pub fn subscribe<E: Into<BoxError>>(error: E) -> Self {
        Self::Subscribe(error.into())
    }

    /// Create request error
    pub fn request<E: Into<BoxError>>(error: E) -> Self {
        Self::Request(error.into())
    }

    /// Process exit status for this error
    pub fn exit_code(&self) -> u8 {
        1
    }
}

/// Result type for nats-box operations
pub type NatsBoxResult<T> = Result<T, NatsBoxError>;
