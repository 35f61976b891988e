//! NATS client implementation for the nats-box tools
//!
//! The module is split the same way as the connection handling it wraps:
//!
//! - [`connection`] - Pure reconnect policy, connection state and errors
//! - [`health_monitor`] - Pure translation of client events into state changes
//! - [`client`] - Impure I/O over `async_nats::Client`
//!
//! # Usage
//!
//! ```rust,no_run
//! use nats_box::config::ClientConfig;
//! use nats_box::transport::nats::NatsClient;
//! use nats_box::transport::Transport;
//!
//! # tokio_test::block_on(async {
//! let config = ClientConfig::new("nats://localhost:4222", "NATS-PUB TOOL");
//! let client = NatsClient::connect(&config).await?;
//! client.publish("greetings", "hello".into()).await?;
//! client.flush().await?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! # });
//! ```

pub mod client;
pub mod connection;
pub mod health_monitor;

pub use client::NatsClient;
pub use connection::{ConnectionState, NatsError, ReconnectPolicy};
pub use health_monitor::{ConnectionEvent, HealthMonitor};
