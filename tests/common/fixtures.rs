//! Canned stream bodies.

use crate::common::OK_HEAD;

pub const TWEET_TEXT: &str = "The problem with your code is that it's doing exactly what you told it to do.";

pub const TWEET_LINE: &str = r#"{"created_at":"Wed Jun 06 20:07:10 +0000 2012","id":210462857140252672,"text":"The problem with your code is that it's doing exactly what you told it to do.","user":{"id":7505382,"screen_name":"sferik","name":"Erik Michaels-Ober"},"lang":"en"}"#;

pub const SECOND_TWEET_LINE: &str = r#"{"created_at":"Wed Jun 06 20:07:11 +0000 2012","id":210462857140252673,"text":"Rust streams all the way down","user":{"id":14100886,"screen_name":"pengwynn"}}"#;

pub const FRIENDS_LINE: &str = r#"{"friends":[488736931,311444249]}"#;

pub const DIRECT_MESSAGE_LINE: &str = r#"{"direct_message":{"id":1773478249,"text":"hello bot","created_at":"Sat Jun 22 20:31:34 +0000 2013","sender":{"id":14100886,"screen_name":"pengwynn"},"recipient":{"id":7505382,"screen_name":"sferik"}}}"#;

pub const FOLLOW_EVENT_LINE: &str = r#"{"event":"follow","created_at":"Sat Jun 22 20:31:34 +0000 2013","source":{"id":14100886,"screen_name":"pengwynn"},"target":{"id":7505382,"screen_name":"sferik"}}"#;

pub const DELETE_LINE: &str = r#"{"delete":{"status":{"id":272691609211117568,"id_str":"272691609211117568","user_id":1029,"user_id_str":"1029"}}}"#;

pub const WARNING_LINE: &str = r#"{"warning":{"code":"FALLING_BEHIND","message":"Your connection is falling behind and messages are being queued for delivery to you. Your queue is now over 60% full. You will be disconnected when the queue is full.","percent_full":60}}"#;

/// A filter/sample response carrying two tweets with keep-alive lines.
pub fn track_streaming_response() -> Vec<String> {
    vec![
        OK_HEAD.to_string(),
        format!("{}\r\n", TWEET_LINE),
        "\r\n".to_string(),
        format!("{}\r\n", SECOND_TWEET_LINE),
    ]
}

/// A user-stream response with one message of each kind.
pub fn user_streaming_response() -> Vec<String> {
    let body = [
        FRIENDS_LINE,
        TWEET_LINE,
        DIRECT_MESSAGE_LINE,
        FOLLOW_EVENT_LINE,
        DELETE_LINE,
        WARNING_LINE,
    ]
    .iter()
    .map(|line| format!("{}\r\n", line))
    .collect::<String>();
    vec![OK_HEAD.to_string(), body]
}

/// Split `data` into chunks of `size` bytes, the way a socket might.
pub fn split_every(data: &str, size: usize) -> Vec<Vec<u8>> {
    data.as_bytes().chunks(size).map(<[u8]>::to_vec).collect()
}
