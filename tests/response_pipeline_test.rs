//! Response pipeline behavior on realistic byte streams.

mod common;

use chrono::{TimeZone, Utc};
use common::*;
use twitter_streaming::error::{ApiErrorKind, StreamingError};
use twitter_streaming::response::ResponsePipeline;
use twitter_streaming::StreamEvent;

fn feed(
    pipeline: &mut ResponsePipeline,
    chunks: &[Vec<u8>],
) -> (Vec<StreamEvent>, Result<(), StreamingError>) {
    let mut events = Vec::new();
    for chunk in chunks {
        if let Err(err) = pipeline.append(chunk, |event| events.push(event)) {
            return (events, Err(err));
        }
    }
    (events, Ok(()))
}

fn rate_limited_head(names: [&str; 3], reset: i64) -> Vec<u8> {
    format!(
        "HTTP/1.1 420 NOK\r\n{}: 150\r\n{}: 0\r\n{}: {}\r\n\r\n",
        names[0], names[1], names[2], reset
    )
    .into_bytes()
}

fn assert_rate_limit(head: Vec<u8>, reset: i64, delay: u64) {
    let mut pipeline = ResponsePipeline::new();
    let (events, result) = feed(&mut pipeline, &[head]);
    assert!(events.is_empty());

    let err = result.unwrap_err();
    let api = err.as_api().expect("api error");
    assert_eq!(api.kind, ApiErrorKind::TooManyRequests);
    let rate_limit = api.rate_limit.as_ref().expect("rate limit");
    assert_eq!(rate_limit.limit, 150);
    assert_eq!(rate_limit.remaining, 0);
    assert_eq!(rate_limit.reset_at, Utc.timestamp_opt(reset, 0).unwrap());
    assert!(
        rate_limit.reset_in <= delay && rate_limit.reset_in + 2 >= delay,
        "reset_in {} not near {}",
        rate_limit.reset_in,
        delay
    );
    assert!(err.is_retryable());
}

#[test]
fn test_rate_limit_snapshot_on_420() {
    let reset = Utc::now().timestamp() + 300;
    assert_rate_limit(
        rate_limited_head(
            ["x-rate-limit-limit", "x-rate-limit-remaining", "x-rate-limit-reset"],
            reset,
        ),
        reset,
        300,
    );
}

#[test]
fn test_rate_limit_headers_are_case_insensitive() {
    let reset = Utc::now().timestamp() + 300;
    assert_rate_limit(
        rate_limited_head(
            ["X-Rate-Limit-Limit", "X-Rate-Limit-Remaining", "X-Rate-Limit-Reset"],
            reset,
        ),
        reset,
        300,
    );
}

#[test]
fn test_partial_rate_limit_headers_give_no_snapshot() {
    let mut pipeline = ResponsePipeline::new();
    let head = b"HTTP/1.1 429 Too Many Requests\r\nx-rate-limit-limit: 150\r\nx-rate-limit-remaining: 0\r\n\r\n".to_vec();
    let (_, result) = feed(&mut pipeline, &[head]);
    let err = result.unwrap_err();
    assert_eq!(err.as_api().unwrap().kind, ApiErrorKind::TooManyRequests);
    assert!(err.rate_limit().is_none());
}

#[test]
fn test_lines_dispatch_in_order_for_any_chunking() {
    let mut body = String::from(OK_HEAD);
    for id in 1..=25u64 {
        body.push_str(&format!("{{\"id\":{},\"text\":\"tweet {}\"}}\r\n", id, id));
    }

    for size in [1, 2, 7, 64, 1024, body.len()] {
        let mut pipeline = ResponsePipeline::new();
        let (events, result) = feed(&mut pipeline, &split_every(&body, size));
        assert!(result.is_ok());

        let ids: Vec<u64> = events
            .iter()
            .map(|event| match event {
                StreamEvent::Tweet(tweet) => tweet.id,
                other => panic!("Expected Tweet, got {:?}", other),
            })
            .collect();
        assert_eq!(ids, (1..=25).collect::<Vec<_>>(), "chunk size {}", size);
        assert_eq!(pipeline.events_emitted(), 25);
        assert_eq!(pipeline.buffered_len(), 0);
    }
}

#[test]
fn test_keep_alive_lines_produce_no_events() {
    let mut pipeline = ResponsePipeline::new();
    let chunks = vec![
        OK_HEAD.as_bytes().to_vec(),
        b"\r\n\r\n   \r\n\n".to_vec(),
        format!("{}\r\n\r\n", FRIENDS_LINE).into_bytes(),
    ];
    let (events, result) = feed(&mut pipeline, &chunks);
    assert!(result.is_ok());
    assert_eq!(events, vec![StreamEvent::FollowListSnapshot(vec![488736931, 311444249])]);
}

#[test]
fn test_trailing_partial_line_waits_for_terminator() {
    let mut pipeline = ResponsePipeline::new();
    let partial = &TWEET_LINE[..40];
    let (events, _) = feed(
        &mut pipeline,
        &[OK_HEAD.as_bytes().to_vec(), partial.as_bytes().to_vec()],
    );
    assert!(events.is_empty());
    assert_eq!(pipeline.buffered_len(), partial.len());

    let rest = format!("{}\n", &TWEET_LINE[40..]);
    let (events, result) = feed(&mut pipeline, &[rest.into_bytes()]);
    assert!(result.is_ok());
    assert!(matches!(&events[..], [StreamEvent::Tweet(t)] if t.text == TWEET_TEXT));
}

#[test]
fn test_malformed_json_fails_attempt() {
    let mut pipeline = ResponsePipeline::new();
    let chunks = vec![
        OK_HEAD.as_bytes().to_vec(),
        format!("{}\r\n{{\"id\": oops}}\r\n{}\r\n", TWEET_LINE, SECOND_TWEET_LINE).into_bytes(),
    ];
    let (events, result) = feed(&mut pipeline, &chunks);

    assert_eq!(events.len(), 1);
    assert!(matches!(result, Err(StreamingError::Parse(_))));
    assert!(pipeline.is_failed());
    assert!(pipeline.append(b"{\"id\":3,\"text\":\"x\"}\n", |_| {}).is_err());
}

#[test]
fn test_unknown_shape_is_forwarded_raw() {
    let mut pipeline = ResponsePipeline::new();
    let chunks = vec![
        OK_HEAD.as_bytes().to_vec(),
        b"{\"limit\":{\"track\":1234}}\n".to_vec(),
    ];
    let (events, _) = feed(&mut pipeline, &chunks);
    match &events[..] {
        [StreamEvent::RawUnclassified(value)] => assert_eq!(value["limit"]["track"], 1234),
        other => panic!("Expected one raw event, got {:?}", other),
    }
}

#[test]
fn test_long_tweet_in_socket_sized_chunks() {
    let text = "x".repeat(4 << 20);
    let body = format!("{}{{\"id\":7,\"text\":\"{}\"}}\r\n{}\r\n", OK_HEAD, text, FRIENDS_LINE);
    let mut pipeline = ResponsePipeline::new();
    let (events, result) = feed(&mut pipeline, &split_every(&body, 1024));

    assert!(result.is_ok());
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], StreamEvent::Tweet(t) if t.id == 7 && t.text.len() == 4 << 20));
    assert!(matches!(&events[1], StreamEvent::FollowListSnapshot(_)));
    assert_eq!(pipeline.buffered_len(), 0);
}

#[test]
fn test_sparse_payloads_keep_their_kind() {
    let mut pipeline = ResponsePipeline::new();
    let chunks = vec![
        OK_HEAD.as_bytes().to_vec(),
        b"{\"direct_message\":{\"text\":\"hello bot\"}}\n".to_vec(),
        b"{\"event\":\"follow\",\"source\":{\"screen_name\":\"sferik\"}}\n".to_vec(),
        b"{\"warning\":{\"message\":\"falling behind\"}}\n".to_vec(),
        b"{\"delete\":{\"status\":{\"user_id\":3}}}\n".to_vec(),
    ];
    let (events, result) = feed(&mut pipeline, &chunks);
    assert!(result.is_ok());

    let kinds: Vec<&str> = events.iter().map(StreamEvent::kind_name).collect();
    assert_eq!(
        kinds,
        vec!["direct_message", "named_event", "stall_warning", "raw_unclassified"]
    );
}
