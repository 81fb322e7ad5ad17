//! Network-related error types.
//!
//! Everything that can go wrong below the response pipeline: resolving the
//! stream host, opening the TCP connection, the TLS handshake, and socket
//! reads and writes. None of these are retried internally.

use std::io;

use thiserror::Error;

/// Network-specific error variants.
#[derive(Debug, Clone, Error)]
pub enum NetworkError {
    /// DNS resolution failed or returned no addresses.
    #[error("Could not resolve {host}: {message}")]
    DnsResolutionFailed { host: String, message: String },

    /// Connection to the stream host failed.
    #[error("Connection to {addr} failed: {message}")]
    ConnectionFailed { addr: String, message: String },

    /// TLS/SSL setup or handshake failed.
    #[error("TLS error: {message}")]
    TlsError { message: String },

    /// Writing the request onto the socket failed.
    #[error("Failed to send request: {message}")]
    WriteFailed { message: String },

    /// Reading from an established socket failed.
    #[error("Read from stream failed: {message}")]
    ReadFailed { message: String },
}

impl NetworkError {
    /// Build a read failure from an I/O error.
    pub fn read(err: &io::Error) -> Self {
        NetworkError::ReadFailed {
            message: err.to_string(),
        }
    }

    /// Build a write failure from an I/O error.
    pub fn write(err: &io::Error) -> Self {
        NetworkError::WriteFailed {
            message: err.to_string(),
        }
    }

    /// Check if this error is likely transient and can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            NetworkError::DnsResolutionFailed { .. } => true,
            NetworkError::ConnectionFailed { .. } => true,
            NetworkError::TlsError { .. } => false, // Usually config issue
            NetworkError::WriteFailed { .. } => true,
            NetworkError::ReadFailed { .. } => true,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            NetworkError::DnsResolutionFailed { host, .. } => format!(
                "Could not resolve stream host '{}'. Please check your DNS settings.",
                host
            ),
            NetworkError::ConnectionFailed { .. } => {
                "Unable to connect to the stream. Please check your internet connection."
                    .to_string()
            }
            NetworkError::TlsError { .. } => {
                "A secure connection could not be established. Please check your system's SSL/TLS configuration.".to_string()
            }
            NetworkError::WriteFailed { .. } | NetworkError::ReadFailed { .. } => {
                "The stream connection was interrupted.".to_string()
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            NetworkError::DnsResolutionFailed { .. } => "E_NET_DNS",
            NetworkError::ConnectionFailed { .. } => "E_NET_CONN",
            NetworkError::TlsError { .. } => "E_NET_TLS",
            NetworkError::WriteFailed { .. } => "E_NET_WRITE",
            NetworkError::ReadFailed { .. } => "E_NET_READ",
        }
    }
}
