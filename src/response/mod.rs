//! Stream response handling.
//!
//! # Module structure
//! - `head` - Incremental HTTP head parser
//! - `headers` - Case-insensitive header map
//! - `rate_limit` - Rate-limit snapshot built from error responses
//! - `pipeline` - Body line splitting and event dispatch

mod head;
mod headers;
mod pipeline;
mod rate_limit;

pub use head::{parse_response_head, HeadParser, ResponseHead, MAX_HEAD_BYTES};
pub use headers::Headers;
pub use pipeline::{PipelineSink, ResponsePipeline};
pub use rate_limit::{RateLimit, LIMIT_HEADER, REMAINING_HEADER, RESET_HEADER};
