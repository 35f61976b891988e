//! Client configuration for the nats-box tools
//!
//! Configuration comes from command-line flags and two environment
//! variables. There is no configuration file.

use crate::transport::nats::ReconnectPolicy;
use std::path::PathBuf;
use std::time::Duration;

/// Tool version reported by `-v`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Server used when neither `-s` nor `NATS_URL` is set
pub const DEFAULT_SERVER: &str = "connect.ngs.global";

/// Queue group used by the reply tool when `-q` is not given
pub const DEFAULT_QUEUE_GROUP: &str = "NATS-RPLY-22";

/// How long the request tool waits for a reply
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Overrides the server address, even one given with `-s`
pub const NATS_URL_ENV: &str = "NATS_URL";

/// Default credentials file path
pub const NATS_CREDS_ENV: &str = "NATS_CREDS";

/// Connection settings handed to the transport
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Comma-separated server URLs
    pub servers: String,
    /// User credentials file, if any
    pub credentials: Option<PathBuf>,
    /// Connection name reported to the server
    pub name: String,
    pub reconnect: ReconnectPolicy,
}

impl ClientConfig {
    pub fn new(servers: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            servers: servers.into(),
            credentials: None,
            name: name.into(),
            reconnect: ReconnectPolicy::default(),
        }
    }

    pub fn with_credentials(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials = Some(path.into());
        self
    }
}

/// Resolve the server address.
///
/// A non-empty `NATS_URL` wins over everything, then `-s`, then the default.
pub fn resolve_servers<F>(flag: Option<&str>, env: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(env(NATS_URL_ENV))
        .or_else(|| flag.map(str::to_string))
        .unwrap_or_else(|| DEFAULT_SERVER.to_string())
}

/// Resolve the credentials file: `-creds`, then `NATS_CREDS`. Empty means none.
pub fn resolve_credentials<F>(flag: Option<&str>, env: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    let value = match flag {
        Some(path) => Some(path.to_string()),
        None => env(NATS_CREDS_ENV),
    };
    non_empty(value).map(PathBuf::from)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
