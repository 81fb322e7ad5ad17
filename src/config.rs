//! Client configuration.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::traits::SocketFactory;
use crate::transport::{DEFAULT_TIMEOUT, POLL_INTERVAL};

/// Env var switching the client into non-blocking mode (`1` or `true`).
pub const NONBLOCKING_ENV: &str = "TWITTER_STREAM_NONBLOCKING";
/// Env var overriding the non-blocking timeout in seconds. `0` disables it.
pub const TIMEOUT_ENV: &str = "TWITTER_STREAM_TIMEOUT_SECS";

pub const DEFAULT_USER_AGENT: &str = concat!("twitter-streaming/", env!("CARGO_PKG_VERSION"));

/// Configuration for a [`StreamingClient`](crate::client::StreamingClient).
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use twitter_streaming::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_nonblocking(true)
///     .with_timeout(Some(Duration::from_secs(5)));
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    /// Keep the connection open between calls and return on timeout
    pub nonblocking: bool,
    /// How long a non-blocking call waits for data (`None` waits forever)
    pub timeout: Option<Duration>,
    /// Longest single readiness wait inside a non-blocking call
    pub poll_interval: Duration,
    /// TCP connect timeout (`None` uses the OS default)
    pub connect_timeout: Option<Duration>,
    /// Sent as the `User-Agent` header
    pub user_agent: String,
    /// Socket source. Defaults to TCP + OpenSSL when unset.
    pub socket_factory: Option<Arc<dyn SocketFactory>>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            nonblocking: false,
            timeout: Some(DEFAULT_TIMEOUT),
            poll_interval: POLL_INTERVAL,
            connect_timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            socket_factory: None,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("nonblocking", &self.nonblocking)
            .field("timeout", &self.timeout)
            .field("poll_interval", &self.poll_interval)
            .field("connect_timeout", &self.connect_timeout)
            .field("user_agent", &self.user_agent)
            .field("socket_factory", &self.socket_factory.is_some())
            .finish()
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_nonblocking(mut self, nonblocking: bool) -> Self {
        self.nonblocking = nonblocking;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Use `factory` for every connection instead of TCP + OpenSSL.
    pub fn with_socket_factory(mut self, factory: Arc<dyn SocketFactory>) -> Self {
        self.socket_factory = Some(factory);
        self
    }

    /// Defaults overridden by [`NONBLOCKING_ENV`] and [`TIMEOUT_ENV`].
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(value) = std::env::var(NONBLOCKING_ENV) {
            match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => config.nonblocking = true,
                "0" | "false" | "no" | "" => config.nonblocking = false,
                other => warn!("Ignoring {}={:?}", NONBLOCKING_ENV, other),
            }
        }

        if let Ok(value) = std::env::var(TIMEOUT_ENV) {
            match value.trim().parse::<u64>() {
                Ok(0) => config.timeout = None,
                Ok(secs) => config.timeout = Some(Duration::from_secs(secs)),
                Err(e) => warn!("Ignoring {}={:?}: {}", TIMEOUT_ENV, value, e),
            }
        }

        config
    }
}
