//! nats-box - NATS command-line tools
//!
//! Four small tools over one NATS connection:
//! - `nats-pub` publishes a message
//! - `nats-sub` subscribes and prints incoming messages
//! - `nats-req` sends a request and prints the reply
//! - `nats-rply` answers requests as a member of a queue group
//!
//! All four are the same program; the tool is selected from the name the
//! executable is invoked as (see [`cli::Mode::from_exe_name`]).
//!
//! # Quick Start
//!
//! ```rust
//! use nats_box::cli::{parse_action, Action, Mode};
//! use nats_box::commands::Command;
//!
//! let mode = Mode::from_exe_name("/usr/local/bin/nats-sub");
//! assert_eq!(mode, Mode::Subscribe);
//!
//! let action = parse_action(mode, ["-s", "nats://localhost:4222", "orders.>"], |_| None);
//! match action {
//!     Action::Run(invocation) => {
//!         assert_eq!(invocation.client.servers, "nats://localhost:4222");
//!         assert_eq!(
//!             invocation.command,
//!             Command::Subscribe { subject: "orders.>".to_string() }
//!         );
//!     }
//!     other => panic!("unexpected action: {other:?}"),
//! }
//! ```

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod observability;
pub mod testing;
pub mod transport;

pub use cli::{Action, Invocation, Mode};
pub use commands::Command;
pub use config::ClientConfig;
pub use error::{NatsBoxError, NatsBoxResult};
pub use transport::nats::NatsClient;
pub use transport::{InboundMessage, Transport};
