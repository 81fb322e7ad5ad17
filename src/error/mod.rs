//! Unified error handling for the streaming client.
//!
//! - **Error Categories**: High-level classification for reconnect decisions
//! - **Domain-specific Errors**: Network, Api and Parse errors
//! - **Unified Error Type**: `StreamingError` consolidates all error types
//! - **Result Type Alias**: `StreamingResult<T>` for consistent return types
//!
//! # Error Categories
//!
//! | Category | Description | Retryable |
//! |----------|-------------|-----------|
//! | Network | DNS, connect, TLS, socket reads | Yes (except TLS) |
//! | Auth | 401, 403, 404 | No |
//! | RateLimit | 420, 429 | Yes, after reset |
//! | Server | 5xx | Yes |
//! | Client | Other 4xx | No |
//! | Protocol | Malformed head or JSON line | No |
//!
//! Would-block reads on the non-blocking transport are not errors; they
//! never leave the transport.

mod api;
mod category;
mod network;
mod parse;
mod result;
mod streaming_error;

// Re-export all public types
pub use api::{ApiError, ApiErrorKind};
pub use category::ErrorCategory;
pub use network::NetworkError;
pub use parse::ParseError;
pub use result::StreamingResult;
pub use streaming_error::StreamingError;
