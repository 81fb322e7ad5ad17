//! Response pipeline: head validation, line splitting and dispatch.
//!
//! The transport pushes every chunk it reads into [`ResponsePipeline::append`].
//! The pipeline parses the HTTP head exactly once. A non-200 status fails the
//! response with an [`ApiError`]; a 200 turns every later byte into body bytes
//! that are split on `\n`, decoded as JSON and classified into events.

use bytes::BytesMut;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{ApiError, ParseError, StreamingError, StreamingResult};
use crate::events::{classify, StreamEvent};
use crate::traits::ResponseSink;

use super::head::{HeadParser, ResponseHead};
use super::rate_limit::RateLimit;

#[derive(Debug)]
enum State {
    /// Waiting for the complete head.
    Head(HeadParser),
    /// Head accepted; everything is body.
    Body(ResponseHead),
    /// A terminal error was raised; the response accepts no more bytes.
    Failed(StreamingError),
}

/// Stateful consumer of one HTTP response.
#[derive(Debug)]
pub struct ResponsePipeline {
    state: State,
    /// Body bytes after the last complete line.
    buffer: BytesMut,
    /// Prefix of `buffer` already known to hold no `\n`.
    scanned: usize,
    events_emitted: u64,
}

impl Default for ResponsePipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponsePipeline {
    pub fn new() -> Self {
        Self {
            state: State::Head(HeadParser::new()),
            buffer: BytesMut::new(),
            scanned: 0,
            events_emitted: 0,
        }
    }

    /// Push a chunk read from the socket.
    ///
    /// `on_event` is called once per classified line, in stream order. Any
    /// error is terminal for this response and is returned again by every
    /// later call.
    pub fn append<F>(&mut self, chunk: &[u8], mut on_event: F) -> StreamingResult<()>
    where
        F: FnMut(StreamEvent),
    {
        match &mut self.state {
            State::Failed(err) => Err(err.clone()),
            State::Body(_) => {
                self.fail_on_error(|pipeline| pipeline.push_body(chunk, &mut on_event))
            }
            State::Head(parser) => {
                let parsed = match parser.feed(chunk) {
                    Ok(parsed) => parsed,
                    Err(err) => return Err(self.fail(err.into())),
                };
                let Some((head, rest)) = parsed else {
                    return Ok(());
                };
                if let Err(err) = check_status(&head) {
                    return Err(self.fail(err.into()));
                }
                info!(status = head.status, "Stream response accepted");
                self.state = State::Body(head);
                self.fail_on_error(|pipeline| pipeline.push_body(&rest, &mut on_event))
            }
        }
    }

    /// The parsed head, once a 200 response has been accepted.
    pub fn head(&self) -> Option<&ResponseHead> {
        match &self.state {
            State::Body(head) => Some(head),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, State::Failed(_))
    }

    /// Number of partial-line bytes waiting for their terminator.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    pub fn events_emitted(&self) -> u64 {
        self.events_emitted
    }

    fn fail(&mut self, err: StreamingError) -> StreamingError {
        self.state = State::Failed(err.clone());
        self.buffer.clear();
        self.scanned = 0;
        err
    }

    fn fail_on_error<F>(&mut self, f: F) -> StreamingResult<()>
    where
        F: FnOnce(&mut Self) -> Result<(), ParseError>,
    {
        f(self).map_err(|err| self.fail(err.into()))
    }

    fn push_body<F>(&mut self, bytes: &[u8], on_event: &mut F) -> Result<(), ParseError>
    where
        F: FnMut(StreamEvent),
    {
        self.buffer.extend_from_slice(bytes);

        while let Some(pos) = self.next_newline() {
            let line = self.buffer.split_to(pos + 1);
            let Some(value) = decode_line(&line)? else {
                debug!("Skipping keep-alive line");
                continue;
            };
            let event = classify(value);
            debug!(kind = event.kind_name(), "Dispatching stream event");
            self.events_emitted += 1;
            on_event(event);
        }

        Ok(())
    }

    /// Position of the first `\n` in the buffer, searching only bytes not
    /// scanned by an earlier call.
    fn next_newline(&mut self) -> Option<usize> {
        match self.buffer[self.scanned..].iter().position(|&b| b == b'\n') {
            Some(pos) => {
                let found = self.scanned + pos;
                self.scanned = 0;
                Some(found)
            }
            None => {
                self.scanned = self.buffer.len();
                None
            }
        }
    }
}

/// Feeds raw bytes into a pipeline and forwards events to a callback.
///
/// This is the sink a transport writes into for one stream attempt.
pub struct PipelineSink<'a, F: FnMut(StreamEvent)> {
    pipeline: &'a mut ResponsePipeline,
    on_event: F,
}

impl<'a, F: FnMut(StreamEvent)> PipelineSink<'a, F> {
    pub fn new(pipeline: &'a mut ResponsePipeline, on_event: F) -> Self {
        Self { pipeline, on_event }
    }
}

impl<F: FnMut(StreamEvent)> ResponseSink for PipelineSink<'_, F> {
    fn receive(&mut self, chunk: &[u8]) -> StreamingResult<()> {
        self.pipeline.append(chunk, &mut self.on_event)
    }
}

fn check_status(head: &ResponseHead) -> Result<(), ApiError> {
    if head.is_success() {
        return Ok(());
    }
    let rate_limit = RateLimit::from_headers(&head.headers);
    warn!(
        status = head.status,
        reason = %head.reason,
        rate_limited = rate_limit.is_some(),
        "Stream endpoint returned an error status"
    );
    Err(ApiError::new(head.status, head.reason.clone()).with_rate_limit(rate_limit))
}

/// Decode one terminated line; blank lines yield `None`.
fn decode_line(line: &[u8]) -> Result<Option<Value>, ParseError> {
    let text = std::str::from_utf8(line).map_err(|e| ParseError::InvalidJson {
        line: String::from_utf8_lossy(line).into_owned(),
        message: e.to_string(),
    })?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|e| ParseError::InvalidJson {
            line: trimmed.to_string(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiErrorKind;

    fn collect(
        pipeline: &mut ResponsePipeline,
        chunks: &[&[u8]],
    ) -> (Vec<StreamEvent>, StreamingResult<()>) {
        let mut events = Vec::new();
        let mut result = Ok(());
        for chunk in chunks {
            result = pipeline.append(chunk, |event| events.push(event));
            if result.is_err() {
                break;
            }
        }
        (events, result)
    }

    #[test]
    fn test_success_head_does_not_error() {
        let mut pipeline = ResponsePipeline::new();
        let (events, result) =
            collect(&mut pipeline, &[b"HTTP/1.1 200 OK\r\nSome-Header: Woo\r\n\r\n"]);
        assert!(result.is_ok());
        assert!(events.is_empty());
        assert_eq!(pipeline.head().unwrap().headers.get("some-header"), Some("Woo"));
    }

    #[test]
    fn test_error_status_skips_body() {
        let mut pipeline = ResponsePipeline::new();
        let (events, result) = collect(
            &mut pipeline,
            &[b"HTTP/1.1 401 NOK\r\nSome-Header: Woo\r\n\r\n{\"id\":1,\"text\":\"x\"}\n"],
        );
        let err = result.unwrap_err();
        assert_eq!(err.as_api().unwrap().kind, ApiErrorKind::Unauthorized);
        assert!(events.is_empty());
        assert!(pipeline.is_failed());
    }

    #[test]
    fn test_failed_pipeline_rejects_later_bytes() {
        let mut pipeline = ResponsePipeline::new();
        let first = pipeline.append(b"HTTP/1.1 503 NOK\r\n\r\n", |_| {});
        let mut events = Vec::new();
        let second = pipeline.append(b"HTTP/1.1 200 OK\r\n\r\n{\"id\":1,\"text\":\"x\"}\n", |e| {
            events.push(e)
        });
        assert_eq!(first.unwrap_err().as_api().unwrap().status, 503);
        assert_eq!(second.unwrap_err().as_api().unwrap().status, 503);
        assert!(events.is_empty());
    }

    #[test]
    fn test_partial_lines_are_buffered() {
        let mut pipeline = ResponsePipeline::new();
        let (events, result) = collect(
            &mut pipeline,
            &[b"HTTP/1.1 200 OK\r\n\r\n{\"friends\":[1,", b"2]}\r\n{\"warn"],
        );
        assert!(result.is_ok());
        assert_eq!(events, vec![StreamEvent::FollowListSnapshot(vec![1, 2])]);
        assert_eq!(pipeline.buffered_len(), b"{\"warn".len());
    }

    #[test]
    fn test_long_line_across_many_chunks() {
        let text = "a".repeat(1 << 20);
        let line = format!("{{\"id\":1,\"text\":\"{}\"}}\n", text);
        let mut pipeline = ResponsePipeline::new();
        let mut events = Vec::new();
        pipeline.append(b"HTTP/1.1 200 OK\r\n\r\n", |_| {}).unwrap();
        for chunk in line.as_bytes().chunks(1024) {
            pipeline.append(chunk, |event| events.push(event)).unwrap();
            assert_eq!(pipeline.scanned, pipeline.buffered_len());
        }
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], StreamEvent::Tweet(tweet) if tweet.text.len() == 1 << 20));
        assert_eq!(pipeline.buffered_len(), 0);
    }

    #[test]
    fn test_partial_line_resumes_after_complete_line() {
        let mut pipeline = ResponsePipeline::new();
        let (events, result) = collect(
            &mut pipeline,
            &[
                b"HTTP/1.1 200 OK\r\n\r\n{\"friends\":[1]}\n{\"frie",
                b"nds\":[2]",
                b"}\n{\"friends\":[3]}\n",
            ],
        );
        assert!(result.is_ok());
        assert_eq!(
            events,
            vec![
                StreamEvent::FollowListSnapshot(vec![1]),
                StreamEvent::FollowListSnapshot(vec![2]),
                StreamEvent::FollowListSnapshot(vec![3]),
            ]
        );
        assert_eq!(pipeline.buffered_len(), 0);
        assert_eq!(pipeline.scanned, 0);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let mut pipeline = ResponsePipeline::new();
        let (events, result) = collect(
            &mut pipeline,
            &[b"HTTP/1.1 200 OK\r\n\r\n\r\n\n   \r\n{\"friends\":[]}\n\r\n"],
        );
        assert!(result.is_ok());
        assert_eq!(events.len(), 1);
        assert_eq!(pipeline.events_emitted(), 1);
    }

    #[test]
    fn test_invalid_json_is_terminal() {
        let mut pipeline = ResponsePipeline::new();
        let (events, result) = collect(
            &mut pipeline,
            &[b"HTTP/1.1 200 OK\r\n\r\n{\"friends\":[1]}\n{not json\n{\"friends\":[2]}\n"],
        );
        assert_eq!(events, vec![StreamEvent::FollowListSnapshot(vec![1])]);
        assert!(matches!(
            result,
            Err(StreamingError::Parse(ParseError::InvalidJson { .. }))
        ));
        assert!(pipeline.is_failed());
    }

    #[test]
    fn test_malformed_head_is_terminal() {
        let mut pipeline = ResponsePipeline::new();
        let result = pipeline.append(b"garbage\r\n\r\n", |_| {});
        assert!(matches!(
            result,
            Err(StreamingError::Parse(ParseError::MalformedHead { .. }))
        ));
    }

    #[test]
    fn test_pipeline_sink_forwards_events() {
        let mut pipeline = ResponsePipeline::new();
        let mut events = Vec::new();
        {
            let mut sink = PipelineSink::new(&mut pipeline, |event| events.push(event));
            sink.receive(b"HTTP/1.1 200 OK\r\n\r\n").unwrap();
            sink.receive(b"{\"event\":\"follow\"}\n").unwrap();
        }
        assert_eq!(events.len(), 1);
        assert_eq!(pipeline.events_emitted(), 1);
    }
}
