//! Unified error type for stream attempts.
//!
//! `StreamingError` is what every transport and client operation returns.
//! It wraps the three terminal failure domains so callers can make one
//! decision about whether to reconnect.

use thiserror::Error;

use super::api::ApiError;
use super::category::ErrorCategory;
use super::network::NetworkError;
use super::parse::ParseError;
use crate::response::RateLimit;

/// Terminal failure of a stream attempt.
#[derive(Debug, Clone, Error)]
pub enum StreamingError {
    /// DNS, connect, TLS or socket failures.
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// Non-success HTTP status from the stream endpoint.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Malformed HTTP head or malformed JSON line.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl StreamingError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            StreamingError::Network(_) => ErrorCategory::Network,
            StreamingError::Api(err) => {
                use super::api::ApiErrorKind::*;
                match err.kind {
                    TooManyRequests => ErrorCategory::RateLimit,
                    Unauthorized | Forbidden | NotFound => ErrorCategory::Auth,
                    kind if kind.is_server_error() => ErrorCategory::Server,
                    _ => ErrorCategory::Client,
                }
            }
            StreamingError::Parse(_) => ErrorCategory::Protocol,
        }
    }

    /// Check if reconnecting could succeed without changing the request.
    pub fn is_retryable(&self) -> bool {
        match self {
            StreamingError::Network(err) => err.is_retryable(),
            _ => self.category().is_retryable(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamingError::Network(err) => err.error_code(),
            StreamingError::Api(err) if err.is_rate_limited() => "E_API_RATE",
            StreamingError::Api(_) => "E_API_STATUS",
            StreamingError::Parse(err) => err.error_code(),
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            StreamingError::Network(err) => err.user_message(),
            StreamingError::Api(err) => err.user_message(),
            StreamingError::Parse(_) => {
                "Received data from the stream that could not be read.".to_string()
            }
        }
    }

    /// The API error, if the endpoint rejected the stream.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            StreamingError::Api(err) => Some(err),
            _ => None,
        }
    }

    /// Rate-limit snapshot carried by an API error.
    pub fn rate_limit(&self) -> Option<&RateLimit> {
        self.as_api().and_then(|err| err.rate_limit.as_ref())
    }
}
