//! Impure I/O operations for the NATS client
//!
//! This module wraps `async_nats::Client` behind the [`Transport`] trait and
//! keeps the connection state current from the client's event callback.

use super::connection::{ConnectionState, NatsError};
use super::health_monitor::HealthMonitor;
use crate::config::ClientConfig;
use crate::transport::{InboundMessage, MessageStream, Transport};
use async_nats::ConnectOptions;
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use tokio::sync::watch;
use tracing::debug;

/// NATS transport client for the nats-box tools
pub struct NatsClient {
    client: async_nats::Client,
    state_rx: watch::Receiver<ConnectionState>,
}

impl NatsClient {
    /// Connect to the configured servers
    ///
    /// Fails if the credentials file cannot be loaded or no server accepts
    /// the initial connection. Reconnection after that is handled by the
    /// client library according to the configured policy.
    pub async fn connect(config: &ClientConfig) -> Result<Self, NatsError> {
        let (state_tx, state_rx) = watch::channel(ConnectionState::Connecting);
        let options = Self::connect_options(config, state_tx.clone()).await?;

        debug!("Connecting to [{}] as {}", config.servers, config.name);
        let client = options
            .connect(config.servers.as_str())
            .await
            .map_err(|e| NatsError::ConnectionFailed(Box::new(e)))?;

        // The Connected event may race the return of connect()
        state_tx.send_if_modified(|state| {
            if *state == ConnectionState::Connecting {
                *state = ConnectionState::Connected;
                true
            } else {
                false
            }
        });

        Ok(Self { client, state_rx })
    }

    /// Build connect options from config
    async fn connect_options(
        config: &ClientConfig,
        state_tx: watch::Sender<ConnectionState>,
    ) -> Result<ConnectOptions, NatsError> {
        let policy = config.reconnect;
        let servers = config.servers.clone();

        let mut options = ConnectOptions::new()
            .name(config.name.as_str())
            .max_reconnects(policy.max_reconnects())
            .reconnect_delay_callback(move |attempt| policy.calculate_backoff_delay(attempt))
            .event_callback(move |event| {
                let state_tx = state_tx.clone();
                let servers = servers.clone();
                async move {
                    let event = HealthMonitor::classify_event(&event);
                    state_tx.send_modify(|state| {
                        *state =
                            HealthMonitor::determine_next_state(state, &event, &policy, &servers);
                    });
                }
            });

        if let Some(path) = &config.credentials {
            options = options
                .credentials_file(path)
                .await
                .map_err(|source| NatsError::Credentials {
                    path: path.clone(),
                    source,
                })?;
        }

        Ok(options)
    }
}

impl From<async_nats::Message> for InboundMessage {
    fn from(message: async_nats::Message) -> Self {
        Self {
            subject: message.subject.to_string(),
            reply: message.reply.map(|reply| reply.to_string()),
            payload: message.payload,
        }
    }
}

#[async_trait]
impl Transport for NatsClient {
    type Error = NatsError;

    async fn publish(&self, subject: &str, payload: Bytes) -> Result<(), Self::Error> {
        self.client
            .publish(subject.to_string(), payload)
            .await
            .map_err(|e| NatsError::PublishFailed(Box::new(e)))
    }

    async fn flush(&self) -> Result<(), Self::Error> {
        self.client
            .flush()
            .await
            .map_err(|e| NatsError::FlushFailed(Box::new(e)))
    }

    async fn subscribe(&self, subject: &str) -> Result<MessageStream, Self::Error> {
        let subscriber = self
            .client
            .subscribe(subject.to_string())
            .await
            .map_err(|e| NatsError::SubscriptionFailed(Box::new(e)))?;
        Ok(subscriber.map(InboundMessage::from).boxed())
    }

    async fn queue_subscribe(
        &self,
        subject: &str,
        queue: &str,
    ) -> Result<MessageStream, Self::Error> {
        let subscriber = self
            .client
            .queue_subscribe(subject.to_string(), queue.to_string())
            .await
            .map_err(|e| NatsError::SubscriptionFailed(Box::new(e)))?;
        Ok(subscriber.map(InboundMessage::from).boxed())
    }

    async fn request(&self, subject: &str, payload: Bytes) -> Result<InboundMessage, Self::Error> {
        self.client
            .request(subject.to_string(), payload)
            .await
            .map(InboundMessage::from)
            .map_err(|e| NatsError::RequestFailed(Box::new(e)))
    }

    async fn respond(&self, message: &InboundMessage, payload: Bytes) -> Result<(), Self::Error> {
        let reply = message.reply.as_deref().ok_or(NatsError::NoReplySubject)?;
        self.publish(reply, payload).await
    }

    fn connection_state(&self) -> ConnectionState {
        self.state_rx.borrow().clone()
    }

    async fn closed(&self) -> String {
        wait_for_closure(self.state_rx.clone()).await
    }
}

/// Resolve with the reason once the state turns permanently disconnected
async fn wait_for_closure(mut state_rx: watch::Receiver<ConnectionState>) -> String {
    let reason = match state_rx
        .wait_for(|state| matches!(state, ConnectionState::PermanentlyDisconnected(_)))
        .await
    {
        Ok(state) => match &*state {
            ConnectionState::PermanentlyDisconnected(reason) => Some(reason.clone()),
            _ => None,
        },
        Err(_) => None,
    };

    match reason {
        Some(reason) => reason,
        // The sender lives as long as the connection; without it nothing
        // will ever report a closure
        None => std::future::pending().await,
    }
}
