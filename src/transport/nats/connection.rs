//! Pure connection state management for the NATS client
//!
//! This module contains the reconnect policy handed to the client library,
//! the connection state the application watches, and the adapter's errors.

use crate::error::BoxError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Connection state for the NATS client
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionState {
    /// Initial state - connection not confirmed yet
    Connecting,
    /// Connected and ready for operations
    Connected,
    /// Lost the server; the client library is reconnecting
    Disconnected,
    /// Back online after a disconnect
    Reconnected,
    /// Permanently closed - reconnect attempts exhausted
    PermanentlyDisconnected(String),
}

/// Reconnection policy handed to the client library
///
/// A constant delay between attempts, with the attempt count sized so the
/// whole run of attempts fits the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconnectPolicy {
    /// Wait between reconnect attempts
    pub delay: Duration,
    /// Total time to keep trying before giving up
    pub total_window: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(1),
            total_window: Duration::from_secs(10 * 60),
        }
    }
}

impl ReconnectPolicy {
    /// Maximum number of reconnect attempts
    /// Returns None (unlimited) for a zero delay
    pub fn max_reconnects(&self) -> Option<usize> {
        if self.delay.is_zero() {
            return None;
        }
        Some((self.total_window.as_nanos() / self.delay.as_nanos()) as usize)
    }

    /// Delay before the given attempt, counted from 1.
    ///
    /// The client library also runs this before the initial connect and the
    /// first try after a disconnect; those go out at once, later attempts
    /// wait the constant delay.
    pub fn calculate_backoff_delay(&self, attempt: usize) -> Duration {
        if attempt <= 1 {
            Duration::ZERO
        } else {
            self.delay
        }
    }

    /// Window length in whole minutes, as shown in the disconnect log line
    pub fn window_minutes(&self) -> u64 {
        (self.total_window.as_secs_f64() / 60.0).round() as u64
    }
}

/// NATS transport errors
#[derive(Debug, Error)]
pub enum NatsError {
    #[error("Unable to load credentials from {}: {source}", path.display())]
    Credentials {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    ConnectionFailed(#[source] BoxError),
    #[error("{0}")]
    PublishFailed(#[source] BoxError),
    #[error("{0}")]
    FlushFailed(#[source] BoxError),
    #[error("{0}")]
    SubscriptionFailed(#[source] BoxError),
    #[error("{0}")]
    RequestFailed(#[source] BoxError),
    #[error("nats: message does not have a reply subject")]
    NoReplySubject,
}

impl From<NatsError> for crate::error::NatsBoxError {
    fn from(error: NatsError) -> Self {
        match error {
            NatsError::Credentials { path, source } => Self::Credentials { path, source },
            other => Self::Connect(Box::new(other)),
        }
    }
}
