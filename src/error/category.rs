//! Error category classification for unified error handling.
//!
//! Categories give callers one place to decide whether re-invoking a
//! stream-starting operation makes sense after a terminal error.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// DNS, connect, TLS or socket read failures.
    /// Generally transient and retryable.
    Network,

    /// The endpoint rejected the credentials or the resource (401/403/404).
    /// Not retryable until the request or credentials change.
    Auth,

    /// The endpoint asked the client to slow down (420/429).
    /// Retryable once the rate-limit window resets.
    RateLimit,

    /// Server-side failures (5xx).
    Server,

    /// The request itself was rejected (other 4xx).
    Client,

    /// The response could not be parsed (malformed head or JSON line).
    Protocol,
}

impl ErrorCategory {
    /// Returns true if errors in this category are generally transient
    /// and the operation can be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorCategory::Network | ErrorCategory::RateLimit | ErrorCategory::Server
        )
    }

    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Auth => "auth",
            ErrorCategory::RateLimit => "rate_limit",
            ErrorCategory::Server => "server",
            ErrorCategory::Client => "client",
            ErrorCategory::Protocol => "protocol",
        }
    }

    /// Returns suggested recovery actions for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check your internet connection and reconnect",
            ErrorCategory::Auth => "Check the request credentials and the requested stream",
            ErrorCategory::RateLimit => {
                "Wait for the rate-limit window to reset before reconnecting"
            }
            ErrorCategory::Server => "The stream endpoint is having issues. Reconnect later",
            ErrorCategory::Client => "Check the stream parameters",
            ErrorCategory::Protocol => "The endpoint sent data this client cannot read",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
