//! API-level errors raised from the HTTP head of a stream response.
//!
//! A stream response whose status is not 200 never reaches the body
//! pipeline. Its status is mapped through a fixed table onto an
//! [`ApiErrorKind`] and, when the endpoint sent the three rate-limit
//! headers, a [`RateLimit`] snapshot is attached.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::response::RateLimit;

/// Distinct error kinds keyed by HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    NotAcceptable,
    RequestEntityTooLarge,
    UnprocessableEntity,
    /// Raised for both 429 and the streaming endpoints' 420 "Enhance Your Calm".
    TooManyRequests,
    InternalServerError,
    BadGateway,
    ServiceUnavailable,
    GatewayTimeout,
    /// Any non-success status missing from the table.
    Other,
}

impl ApiErrorKind {
    /// The fixed status → kind table.
    pub const TABLE: [(u16, ApiErrorKind); 13] = [
        (400, ApiErrorKind::BadRequest),
        (401, ApiErrorKind::Unauthorized),
        (403, ApiErrorKind::Forbidden),
        (404, ApiErrorKind::NotFound),
        (406, ApiErrorKind::NotAcceptable),
        (413, ApiErrorKind::RequestEntityTooLarge),
        (420, ApiErrorKind::TooManyRequests),
        (422, ApiErrorKind::UnprocessableEntity),
        (429, ApiErrorKind::TooManyRequests),
        (500, ApiErrorKind::InternalServerError),
        (502, ApiErrorKind::BadGateway),
        (503, ApiErrorKind::ServiceUnavailable),
        (504, ApiErrorKind::GatewayTimeout),
    ];

    /// Look up the kind for a status code, falling back to [`ApiErrorKind::Other`].
    pub fn from_status(status: u16) -> Self {
        Self::TABLE
            .iter()
            .find(|(code, _)| *code == status)
            .map(|(_, kind)| *kind)
            .unwrap_or(ApiErrorKind::Other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApiErrorKind::BadRequest => "bad request",
            ApiErrorKind::Unauthorized => "unauthorized",
            ApiErrorKind::Forbidden => "forbidden",
            ApiErrorKind::NotFound => "not found",
            ApiErrorKind::NotAcceptable => "not acceptable",
            ApiErrorKind::RequestEntityTooLarge => "request entity too large",
            ApiErrorKind::UnprocessableEntity => "unprocessable entity",
            ApiErrorKind::TooManyRequests => "too many requests",
            ApiErrorKind::InternalServerError => "internal server error",
            ApiErrorKind::BadGateway => "bad gateway",
            ApiErrorKind::ServiceUnavailable => "service unavailable",
            ApiErrorKind::GatewayTimeout => "gateway timeout",
            ApiErrorKind::Other => "api error",
        }
    }

    /// True for the 5xx kinds.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            ApiErrorKind::InternalServerError
                | ApiErrorKind::BadGateway
                | ApiErrorKind::ServiceUnavailable
                | ApiErrorKind::GatewayTimeout
        )
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-success HTTP response from the stream endpoint.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Stream rejected with HTTP {status} {reason} ({kind})")]
pub struct ApiError {
    pub status: u16,
    pub kind: ApiErrorKind,
    /// Reason phrase from the status line.
    pub reason: String,
    pub rate_limit: Option<RateLimit>,
}

impl ApiError {
    pub fn new(status: u16, reason: impl Into<String>) -> Self {
        Self {
            status,
            kind: ApiErrorKind::from_status(status),
            reason: reason.into(),
            rate_limit: None,
        }
    }

    pub fn with_rate_limit(mut self, rate_limit: Option<RateLimit>) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    pub fn is_rate_limited(&self) -> bool {
        self.kind == ApiErrorKind::TooManyRequests
    }

    /// How long to wait before reconnecting, if the endpoint told us.
    pub fn retry_after(&self) -> Option<Duration> {
        self.rate_limit
            .as_ref()
            .map(|limit| Duration::from_secs(limit.reset_in))
    }

    pub fn user_message(&self) -> String {
        match self.kind {
            ApiErrorKind::Unauthorized => {
                "The stream endpoint rejected the credentials.".to_string()
            }
            ApiErrorKind::Forbidden => "Access to this stream is not allowed.".to_string(),
            ApiErrorKind::NotFound => "The requested stream does not exist.".to_string(),
            ApiErrorKind::TooManyRequests => match self.retry_after() {
                Some(wait) => format!(
                    "Too many connection attempts. Please wait {} seconds before reconnecting.",
                    wait.as_secs()
                ),
                None => "Too many connection attempts. Please wait before reconnecting."
                    .to_string(),
            },
            kind if kind.is_server_error() => {
                "The stream endpoint is experiencing issues. Please try again later.".to_string()
            }
            _ => format!("The stream endpoint returned HTTP {}.", self.status),
        }
    }
}
