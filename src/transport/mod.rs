//! Transport layer for the nats-box tools
//!
//! This module provides the messaging abstraction the commands run against
//! and the NATS implementation behind it.

use bytes::Bytes;
use futures::stream::BoxStream;
use std::time::Duration;

pub mod nats;

pub use nats::ConnectionState;

/// A message delivered to a subscription or returned by a request
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    pub subject: String,
    /// Reply subject set by a requester
    pub reply: Option<String>,
    pub payload: Bytes,
}

impl InboundMessage {
    pub fn new(subject: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            subject: subject.into(),
            reply: None,
            payload: payload.into(),
        }
    }

    pub fn with_reply(mut self, reply: impl Into<String>) -> Self {
        self.reply = Some(reply.into());
        self
    }

    /// Payload rendered for log output
    pub fn payload_lossy(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

/// Messages arriving on a subscription
pub type MessageStream = BoxStream<'static, InboundMessage>;

/// Transport trait for the messaging client
///
/// The commands only need this narrow surface, so they can be tested
/// against a fake instead of a live server.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Publish a payload to a subject
    async fn publish(&self, subject: &str, payload: Bytes) -> Result<(), Self::Error>;

    /// Round trip to the server so earlier operations are known to have landed
    async fn flush(&self) -> Result<(), Self::Error>;

    /// Subscribe to a subject
    async fn subscribe(&self, subject: &str) -> Result<MessageStream, Self::Error>;

    /// Subscribe to a subject as a member of a queue group
    async fn queue_subscribe(
        &self,
        subject: &str,
        queue: &str,
    ) -> Result<MessageStream, Self::Error>;

    /// Publish a request and wait for a single reply
    async fn request(&self, subject: &str, payload: Bytes) -> Result<InboundMessage, Self::Error>;

    /// Answer a message on its reply subject
    async fn respond(&self, message: &InboundMessage, payload: Bytes) -> Result<(), Self::Error>;

    /// Get current connection state
    fn connection_state(&self) -> ConnectionState;

    /// Check if the connection is permanently closed
    fn is_permanently_disconnected(&self) -> bool {
        matches!(
            self.connection_state(),
            ConnectionState::PermanentlyDisconnected(_)
        )
    }

    /// Wait until the connection is permanently closed and return the reason
    ///
    /// The default polls `connection_state`; implementations that are told
    /// about state changes should wait on those instead.
    async fn closed(&self) -> String {
        loop {
            if let ConnectionState::PermanentlyDisconnected(reason) = self.connection_state() {
                return reason;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }
}

/// Type alias for NATS transport
pub type NatsTransport = nats::NatsClient;
