//! Incremental HTTP/1.1 response head parser.
//!
//! Bytes are accumulated until the `\r\n\r\n` that ends the head, which may
//! arrive split across any number of reads. Bytes following the head in the
//! same read are handed back as the start of the body.

use crate::error::ParseError;

use super::headers::Headers;

/// Largest head we are willing to buffer before giving up.
pub const MAX_HEAD_BYTES: usize = 64 * 1024;

/// Parsed status line and headers.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseHead {
    pub version: String,
    pub status: u16,
    pub reason: String,
    pub headers: Headers,
}

impl ResponseHead {
    /// Only 200 opens a stream.
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Accumulates head bytes until the head is complete.
#[derive(Debug, Default)]
pub struct HeadParser {
    buf: Vec<u8>,
}

impl HeadParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk.
    ///
    /// Returns `Ok(None)` while the head is incomplete, and the parsed head
    /// together with any trailing body bytes once the terminating blank line
    /// has been seen.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<Option<(ResponseHead, Vec<u8>)>, ParseError> {
        // Resume the terminator search just before the new bytes.
        let search_from = self.buf.len().saturating_sub(3);
        self.buf.extend_from_slice(bytes);

        let Some(end) = find_header_end(&self.buf, search_from) else {
            if self.buf.len() > MAX_HEAD_BYTES {
                return Err(ParseError::HeadTooLarge {
                    limit: MAX_HEAD_BYTES,
                });
            }
            return Ok(None);
        };

        let head = parse_response_head(&self.buf[..end])?;
        let rest = self.buf[end + 4..].to_vec();
        self.buf.clear();
        Ok(Some((head, rest)))
    }

    /// Bytes buffered so far.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }
}

/// Find the position of `\r\n\r\n` at or after `from`, returning the index of the first `\r`.
fn find_header_end(data: &[u8], from: usize) -> Option<usize> {
    data.get(from..)?
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .map(|pos| pos + from)
}

/// Parse a response head (everything before `\r\n\r\n`).
pub fn parse_response_head(data: &[u8]) -> Result<ResponseHead, ParseError> {
    let text = std::str::from_utf8(data)
        .map_err(|_| ParseError::malformed_head("head is not valid UTF-8"))?;
    let mut lines = text.split("\r\n");

    // Status line: HTTP/1.1 200 OK
    let status_line = lines
        .next()
        .filter(|line| !line.is_empty())
        .ok_or_else(|| ParseError::malformed_head("missing status line"))?;
    let mut parts = status_line.splitn(3, ' ');
    let version = parts.next().unwrap_or_default();
    if !version.starts_with("HTTP/") {
        return Err(ParseError::malformed_head(format!(
            "invalid status line: {}",
            status_line
        )));
    }
    let status: u16 = parts
        .next()
        .filter(|code| code.len() == 3)
        .and_then(|code| code.parse().ok())
        .ok_or_else(|| {
            ParseError::malformed_head(format!("invalid status code in: {}", status_line))
        })?;
    let reason = parts.next().unwrap_or_default().trim().to_string();

    let mut headers = Headers::new();
    for line in lines {
        if line.is_empty() {
            break;
        }
        let (name, value) = line.split_once(':').ok_or_else(|| {
            ParseError::malformed_head(format!("invalid header line: {}", line))
        })?;
        headers.insert(name.trim(), value.trim());
    }

    Ok(ResponseHead {
        version: version.to_string(),
        status,
        reason,
        headers,
    })
}
