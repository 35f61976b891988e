//! Pure health monitoring for the NATS client
//!
//! The client library reports connection changes through an event callback.
//! This module turns those events into [`ConnectionState`] transitions and
//! writes the disconnect/reconnect log lines.

use super::connection::{ConnectionState, ReconnectPolicy};
use async_nats::{ClientError, Event};
use tracing::{debug, info, warn};

/// Reason reported when the client library gives up reconnecting
pub const MAX_RECONNECTS_REASON: &str = "nats: max reconnects reached";

/// Connection events the tools react to
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionEvent {
    Connected,
    Disconnected,
    ServerError(String),
    /// Reconnect attempts exhausted; the client will not come back
    PermanentFailure(String),
    Other(String),
}

/// `Disconnected: will attempt reconnects for 10m`
pub fn format_disconnected(policy: &ReconnectPolicy) -> String {
    format!(
        "Disconnected: will attempt reconnects for {}m",
        policy.window_minutes()
    )
}

/// `Reconnected [nats://localhost:4222]`
///
/// The client library does not say which server of a list it reached, so
/// the configured list is shown. With a single server this is the address
/// reconnected to.
pub fn format_reconnected(servers: &str) -> String {
    format!("Reconnected [{servers}]")
}

/// Pure health monitoring logic
pub struct HealthMonitor;

impl HealthMonitor {
    /// Translate a client library event (pure function)
    pub fn classify_event(event: &Event) -> ConnectionEvent {
        match event {
            Event::Connected => ConnectionEvent::Connected,
            Event::Disconnected => ConnectionEvent::Disconnected,
            Event::ServerError(err) => ConnectionEvent::ServerError(format!("{err:?}")),
            Event::ClientError(ClientError::MaxReconnects) => {
                ConnectionEvent::PermanentFailure(MAX_RECONNECTS_REASON.to_string())
            }
            other => ConnectionEvent::Other(format!("{other:?}")),
        }
    }

    /// Determine next state after a connection event
    pub fn determine_next_state(
        current: &ConnectionState,
        event: &ConnectionEvent,
        policy: &ReconnectPolicy,
        servers: &str,
    ) -> ConnectionState {
        // Nothing comes back from a permanent closure
        if let ConnectionState::PermanentlyDisconnected(_) = current {
            return current.clone();
        }

        match event {
            ConnectionEvent::Connected => match current {
                ConnectionState::Disconnected => {
                    info!("{}", format_reconnected(servers));
                    ConnectionState::Reconnected
                }
                ConnectionState::Reconnected => ConnectionState::Reconnected,
                _ => {
                    debug!("Connected [{}]", servers);
                    ConnectionState::Connected
                }
            },
            ConnectionEvent::Disconnected => {
                if *current != ConnectionState::Disconnected {
                    info!("{}", format_disconnected(policy));
                }
                ConnectionState::Disconnected
            }
            ConnectionEvent::PermanentFailure(reason) => {
                ConnectionState::PermanentlyDisconnected(reason.clone())
            }
            ConnectionEvent::ServerError(message) => {
                warn!("Server error: {}", message);
                current.clone()
            }
            ConnectionEvent::Other(description) => {
                debug!("NATS event: {}", description);
                current.clone()
            }
        }
    }
}
