//! Mock implementations for testing
//!
//! Provides a mock Transport that records what the commands publish and
//! replays scripted inbound messages, so the tools can be tested without a
//! NATS server.

use crate::transport::nats::{ConnectionState, NatsError};
use crate::transport::{InboundMessage, MessageStream, Transport};
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub type PublishedMessage = (String, Bytes);

/// A subscription the mock was asked for: subject and queue group
pub type SubscriptionRecord = (String, Option<String>);

/// Mock transport for testing
#[derive(Debug)]
pub struct MockTransport {
    pub published_messages: Arc<Mutex<Vec<PublishedMessage>>>,
    pub responses: Arc<Mutex<Vec<PublishedMessage>>>,
    pub requests: Arc<Mutex<Vec<PublishedMessage>>>,
    pub subscriptions: Arc<Mutex<Vec<SubscriptionRecord>>>,
    pub flush_count: Arc<AtomicUsize>,
    /// Messages delivered to every subscription
    pub inbound: Vec<InboundMessage>,
    /// Reply returned by `request`; None means no responders
    pub request_reply: Option<InboundMessage>,
    pub request_delay: Option<Duration>,
    /// Keep subscriptions open after the scripted messages
    pub hold_open: bool,
    pub should_fail: bool,
    pub fail_flush: bool,
    pub fail_respond: bool,
    pub state: ConnectionState,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self {
            published_messages: Arc::default(),
            responses: Arc::default(),
            requests: Arc::default(),
            subscriptions: Arc::default(),
            flush_count: Arc::default(),
            inbound: Vec::new(),
            request_reply: None,
            request_delay: None,
            hold_open: false,
            should_fail: false,
            fail_flush: false,
            fail_respond: false,
            state: ConnectionState::Connected,
        }
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failure() -> Self {
        Self {
            should_fail: true,
            ..Default::default()
        }
    }

    pub fn with_inbound(messages: Vec<InboundMessage>) -> Self {
        Self {
            inbound: messages,
            ..Default::default()
        }
    }

    pub fn with_request_reply(reply: InboundMessage) -> Self {
        Self {
            request_reply: Some(reply),
            ..Default::default()
        }
    }

    pub fn with_state(state: ConnectionState) -> Self {
        Self {
            state,
            ..Default::default()
        }
    }

    pub fn holding_open(mut self) -> Self {
        self.hold_open = true;
        self
    }

    pub fn delaying_requests(mut self, delay: Duration) -> Self {
        self.request_delay = Some(delay);
        self
    }

    pub fn failing_flush(mut self) -> Self {
        self.fail_flush = true;
        self
    }

    pub fn failing_respond(mut self) -> Self {
        self.fail_respond = true;
        self
    }

    pub async fn get_published_messages(&self) -> Vec<PublishedMessage> {
        self.published_messages.lock().await.clone()
    }

    pub async fn get_responses(&self) -> Vec<PublishedMessage> {
        self.responses.lock().await.clone()
    }

    pub async fn get_requests(&self) -> Vec<PublishedMessage> {
        self.requests.lock().await.clone()
    }

    pub async fn get_subscriptions(&self) -> Vec<SubscriptionRecord> {
        self.subscriptions.lock().await.clone()
    }

    pub fn flushes(&self) -> usize {
        self.flush_count.load(Ordering::SeqCst)
    }

    async fn open_stream(&self, subject: &str, queue: Option<&str>) -> MessageStream {
        self.subscriptions
            .lock()
            .await
            .push((subject.to_string(), queue.map(str::to_string)));

        let scripted = stream::iter(self.inbound.clone());
        if self.hold_open {
            scripted.chain(stream::pending()).boxed()
        } else {
            scripted.boxed()
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    type Error = NatsError;

    async fn publish(&self, subject: &str, payload: Bytes) -> Result<(), Self::Error> {
        if self.should_fail {
            return Err(NatsError::PublishFailed("Mock publish failure".into()));
        }

        let mut published = self.published_messages.lock().await;
        published.push((subject.to_string(), payload));
        Ok(())
    }

    async fn flush(&self) -> Result<(), Self::Error> {
        if self.fail_flush {
            return Err(NatsError::FlushFailed("Mock flush failure".into()));
        }

        self.flush_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn subscribe(&self, subject: &str) -> Result<MessageStream, Self::Error> {
        if self.should_fail {
            return Err(NatsError::SubscriptionFailed(
                "Mock subscription failure".into(),
            ));
        }
        Ok(self.open_stream(subject, None).await)
    }

    async fn queue_subscribe(
        &self,
        subject: &str,
        queue: &str,
    ) -> Result<MessageStream, Self::Error> {
        if self.should_fail {
            return Err(NatsError::SubscriptionFailed(
                "Mock subscription failure".into(),
            ));
        }
        Ok(self.open_stream(subject, Some(queue)).await)
    }

    async fn request(&self, subject: &str, payload: Bytes) -> Result<InboundMessage, Self::Error> {
        self.requests
            .lock()
            .await
            .push((subject.to_string(), payload));

        if let Some(delay) = self.request_delay {
            tokio::time::sleep(delay).await;
        }

        match &self.request_reply {
            Some(reply) if !self.should_fail => Ok(reply.clone()),
            _ => Err(NatsError::RequestFailed(
                "nats: no responders available".into(),
            )),
        }
    }

    async fn respond(&self, message: &InboundMessage, payload: Bytes) -> Result<(), Self::Error> {
        let reply = message.reply.as_deref().ok_or(NatsError::NoReplySubject)?;
        if self.fail_respond {
            return Err(NatsError::PublishFailed("Mock respond failure".into()));
        }

        let mut responses = self.responses.lock().await;
        responses.push((reply.to_string(), payload));
        Ok(())
    }

    fn connection_state(&self) -> ConnectionState {
        self.state.clone()
    }
}
