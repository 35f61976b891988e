//! The four tool actions
//!
//! Each action runs against any [`Transport`], which keeps them testable
//! without a server. Publish and request return when done; subscribe and
//! reply run until their subscription ends.

use crate::cli::Mode;
use crate::config::REQUEST_TIMEOUT;
use crate::error::{NatsBoxError, NatsBoxResult};
use crate::transport::{InboundMessage, MessageStream, Transport};
use bytes::Bytes;
use futures::StreamExt;
use std::io::Write;
use std::time::Duration;
use tracing::{debug, info, warn};

/// A parsed tool command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Publish { subject: String, payload: Bytes },
    Subscribe { subject: String },
    Request { subject: String, payload: Bytes },
    Reply {
        subject: String,
        queue: String,
        response: Bytes,
    },
}

impl Command {
    /// Build the command for a mode from its positional arguments
    pub fn from_args(mode: Mode, args: Vec<String>, queue: String) -> Self {
        let mut args = args.into_iter();
        let subject = args.next().unwrap_or_default();
        let payload = Bytes::from(args.next().unwrap_or_default());

        match mode {
            Mode::Publish => Command::Publish { subject, payload },
            Mode::Subscribe => Command::Subscribe { subject },
            Mode::Request => Command::Request { subject, payload },
            Mode::Reply => Command::Reply {
                subject,
                queue,
                response: payload,
            },
        }
    }

    pub fn subject(&self) -> &str {
        match self {
            Command::Publish { subject, .. }
            | Command::Subscribe { subject }
            | Command::Request { subject, .. }
            | Command::Reply { subject, .. } => subject,
        }
    }

    /// Subscriber commands keep running until the subscription ends
    pub fn keeps_running(&self) -> bool {
        matches!(self, Command::Subscribe { .. } | Command::Reply { .. })
    }
}

/// Log line for a received message, numbered from 1
pub fn format_received(index: u64, message: &InboundMessage) -> String {
    format!(
        "[#{}] Received on [{}]: '{}'",
        index,
        message.subject,
        message.payload_lossy()
    )
}

/// Log line once a subscription is in place
///
/// `Listening on [foo]`, or `Listening on [foo workers]` for a queue group.
pub fn format_listening(subject: &str, queue: Option<&str>) -> String {
    match queue {
        Some(queue) => format!("Listening on [{subject} {queue}]"),
        None => format!("Listening on [{subject}]"),
    }
}

/// Publish one message and flush it to the server
pub async fn publish<T: Transport>(
    transport: &T,
    subject: &str,
    payload: Bytes,
) -> NatsBoxResult<()> {
    transport
        .publish(subject, payload)
        .await
        .map_err(NatsBoxError::publish)?;
    transport.flush().await.map_err(NatsBoxError::flush)?;

    debug!("Published [{}]", subject);
    Ok(())
}

/// Subscribe and log every message until the subscription ends
///
/// Returns the number of messages received.
pub async fn subscribe<T: Transport>(transport: &T, subject: &str) -> NatsBoxResult<u64> {
    let messages = transport
        .subscribe(subject)
        .await
        .map_err(NatsBoxError::subscribe)?;
    transport.flush().await.map_err(NatsBoxError::flush)?;

    info!("{}", format_listening(subject, None));
    Ok(print_messages(messages).await)
}

async fn print_messages(mut messages: MessageStream) -> u64 {
    let mut received = 0;
    while let Some(message) = messages.next().await {
        received += 1;
        info!("{}", format_received(received, &message));
    }
    received
}

/// Send a request and write the reply payload, plus a newline, to `out`
pub async fn request<T, W>(
    transport: &T,
    subject: &str,
    payload: Bytes,
    timeout: Duration,
    out: &mut W,
) -> NatsBoxResult<InboundMessage>
where
    T: Transport,
    W: Write,
{
    let reply = tokio::time::timeout(timeout, transport.request(subject, payload))
        .await
        .map_err(|_| NatsBoxError::RequestTimeout(timeout))?
        .map_err(NatsBoxError::request)?;

    out.write_all(&reply.payload)?;
    out.write_all(b"\n")?;
    out.flush()?;

    Ok(reply)
}

/// Answer every message in a queue group with a fixed response
///
/// Returns the number of messages received. A message that cannot be
/// answered is logged and skipped.
pub async fn reply<T: Transport>(
    transport: &T,
    subject: &str,
    queue: &str,
    response: Bytes,
) -> NatsBoxResult<u64> {
    let mut messages = transport
        .queue_subscribe(subject, queue)
        .await
        .map_err(NatsBoxError::subscribe)?;
    transport.flush().await.map_err(NatsBoxError::flush)?;

    info!("{}", format_listening(subject, Some(queue)));

    let mut received = 0;
    while let Some(message) = messages.next().await {
        received += 1;
        info!("{}", format_received(received, &message));

        if message.reply.is_none() {
            warn!("Message #{} has no reply subject, not responding", received);
            continue;
        }
        if let Err(e) = transport.respond(&message, response.clone()).await {
            warn!("Failed to respond to message #{}: {}", received, e);
        }
    }

    Ok(received)
}

/// Run a command to completion
///
/// For the subscriber commands, the subscription ending is an error: the
/// tool is meant to run until the process is stopped.
pub async fn execute<T, W>(transport: &T, command: &Command, out: &mut W) -> NatsBoxResult<()>
where
    T: Transport,
    W: Write,
{
    match command {
        Command::Publish { subject, payload } => publish(transport, subject, payload.clone()).await,
        Command::Subscribe { subject } => {
            subscribe(transport, subject).await?;
            Err(NatsBoxError::SubscriptionClosed {
                subject: subject.clone(),
            })
        }
        Command::Request { subject, payload } => {
            request(transport, subject, payload.clone(), REQUEST_TIMEOUT, out)
                .await
                .map(|_| ())
        }
        Command::Reply {
            subject,
            queue,
            response,
        } => {
            reply(transport, subject, queue, response.clone()).await?;
            Err(NatsBoxError::SubscriptionClosed {
                subject: subject.clone(),
            })
        }
    }
}
