//! Rate-limit snapshot derived from response headers.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::headers::Headers;

pub const LIMIT_HEADER: &str = "x-rate-limit-limit";
pub const REMAINING_HEADER: &str = "x-rate-limit-remaining";
pub const RESET_HEADER: &str = "x-rate-limit-reset";

/// Rate-limit state reported by the endpoint alongside an error status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
    /// Requests allowed per window.
    pub limit: u32,
    /// Requests left in the current window.
    pub remaining: u32,
    /// When the window resets.
    pub reset_at: DateTime<Utc>,
    /// Whole seconds from parse time until `reset_at`, rounded up, never negative.
    pub reset_in: u64,
}

impl RateLimit {
    /// Build a snapshot from headers, measuring `reset_in` against the current time.
    ///
    /// Returns `None` unless all three rate-limit headers are present and
    /// parse as integers.
    pub fn from_headers(headers: &Headers) -> Option<Self> {
        Self::from_headers_at(headers, Utc::now())
    }

    /// Same as [`RateLimit::from_headers`] with an explicit "now".
    pub fn from_headers_at(headers: &Headers, now: DateTime<Utc>) -> Option<Self> {
        let limit = headers.get(LIMIT_HEADER)?.trim().parse().ok()?;
        let remaining = headers.get(REMAINING_HEADER)?.trim().parse().ok()?;
        let reset: i64 = headers.get(RESET_HEADER)?.trim().parse().ok()?;
        let reset_at = Utc.timestamp_opt(reset, 0).single()?;

        let millis = (reset_at - now).num_milliseconds();
        let reset_in = if millis > 0 {
            (millis as u64).div_ceil(1000)
        } else {
            0
        };

        Some(Self {
            limit,
            remaining,
            reset_at,
            reset_in,
        })
    }
}
