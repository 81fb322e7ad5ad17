//! Parse errors for the response pipeline.

use thiserror::Error;

/// Failures to read the HTTP head or a body line.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The status line or a header line could not be parsed.
    #[error("Malformed HTTP response head: {message}")]
    MalformedHead { message: String },

    /// The head grew past the allowed size without a terminating blank line.
    #[error("HTTP response head exceeds {limit} bytes")]
    HeadTooLarge { limit: usize },

    /// A body line did not decode as a single JSON value.
    #[error("Invalid JSON in stream line: {message}")]
    InvalidJson { line: String, message: String },
}

impl ParseError {
    pub fn malformed_head(message: impl Into<String>) -> Self {
        ParseError::MalformedHead {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ParseError::MalformedHead { .. } => "E_PARSE_HEAD",
            ParseError::HeadTooLarge { .. } => "E_PARSE_HEAD_SIZE",
            ParseError::InvalidJson { .. } => "E_PARSE_JSON",
        }
    }
}
