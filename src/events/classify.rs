//! Structural classification of decoded stream messages.
//!
//! Each JSON value from the stream is routed by which distinguishing key it
//! carries. The checks are mutually exclusive and the first match wins. The
//! key alone decides the variant: missing or mistyped fields inside the
//! payload fall back to defaults. A `delete` without a status id cannot name
//! the tweet, so it is forwarded as [`StreamEvent::RawUnclassified`].

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::payloads::{EventPayload, TweetPayload};
use super::types::{DeletedTweet, Event, StreamEvent, Tweet};

/// Classify one decoded message into exactly one event.
pub fn classify(value: Value) -> StreamEvent {
    let Value::Object(map) = &value else {
        return StreamEvent::RawUnclassified(value);
    };

    if let Some(dm) = map.get("direct_message") {
        StreamEvent::DirectMessage(decode(dm, "direct_message"))
    } else if let Some(delete) = map.get("delete") {
        match parse_delete(delete) {
            Some(notice) => StreamEvent::DeletedTweetNotice(notice),
            None => {
                debug!("Forwarding delete notice without a status id");
                StreamEvent::RawUnclassified(value)
            }
        }
    } else if map.contains_key("friends") || map.contains_key("friends_str") {
        StreamEvent::FollowListSnapshot(parse_friends(map))
    } else if map.contains_key("event") {
        StreamEvent::NamedEvent(Event::from(decode::<EventPayload>(&value, "event")))
    } else if let Some(warning) = map.get("warning") {
        StreamEvent::StallWarning(decode(warning, "warning"))
    } else if is_tweet_shaped(map) {
        StreamEvent::Tweet(Tweet::from(decode::<TweetPayload>(&value, "tweet")))
    } else {
        debug!("Forwarding unclassified stream message");
        StreamEvent::RawUnclassified(value)
    }
}

fn is_tweet_shaped(map: &Map<String, Value>) -> bool {
    map.contains_key("id") && (map.contains_key("text") || map.contains_key("full_text"))
}

/// Map a payload onto its type, using defaults when it is not an object.
fn decode<T: DeserializeOwned + Default>(value: &Value, kind: &str) -> T {
    Deserialize::deserialize(value).unwrap_or_else(|e| {
        debug!(kind, "Payload did not map, using defaults: {}", e);
        T::default()
    })
}

fn parse_delete(delete: &Value) -> Option<DeletedTweet> {
    let status = delete.get("status")?;
    Some(DeletedTweet {
        id: status.get("id")?.as_u64()?,
        user_id: status.get("user_id").and_then(Value::as_u64),
    })
}

/// `friends` carries numeric ids, `friends_str` the same ids as strings.
/// Entries that are neither are skipped.
fn parse_friends(map: &Map<String, Value>) -> Vec<u64> {
    map.get("friends")
        .or_else(|| map.get("friends_str"))
        .and_then(Value::as_array)
        .map(|ids| ids.iter().filter_map(friend_id).collect())
        .unwrap_or_default()
}

fn friend_id(id: &Value) -> Option<u64> {
    id.as_u64().or_else(|| id.as_str()?.parse().ok())
}
