//! Result type alias for stream operations.

use super::streaming_error::StreamingError;

/// Type alias for Results using StreamingError.
///
/// # Example
///
/// ```ignore
/// use twitter_streaming::error::StreamingResult;
///
/// fn poll(client: &mut StreamingClient) -> StreamingResult<StreamStatus> {
///     client.sample(&[], |event| println!("{:?}", event))
/// }
/// ```
pub type StreamingResult<T> = Result<T, StreamingError>;
