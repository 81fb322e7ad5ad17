//! Internal payload deserialization structs.
//!
//! These mirror the wire shape of each message kind and are converted into
//! the public types in `types`. Every field is optional on the wire, so a
//! message with the right key always maps.

use serde::Deserialize;
use serde_json::Value;

use super::types::{lenient, Event, EventName, Tweet, User};

/// Tweets carry their body in `text`, or in `full_text` for extended tweets.
#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct TweetPayload {
    #[serde(default, deserialize_with = "lenient")]
    id: u64,
    #[serde(default, deserialize_with = "lenient")]
    text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    full_text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    user: Option<User>,
    #[serde(default, deserialize_with = "lenient")]
    in_reply_to_status_id: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    lang: Option<String>,
}

impl From<TweetPayload> for Tweet {
    fn from(payload: TweetPayload) -> Self {
        Tweet {
            id: payload.id,
            text: payload.text.or(payload.full_text).unwrap_or_default(),
            created_at: payload.created_at,
            user: payload.user,
            in_reply_to_status_id: payload.in_reply_to_status_id,
            lang: payload.lang,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct EventPayload {
    /// Usually a string; anything else becomes an unknown name
    #[serde(default)]
    event: Value,
    #[serde(default, deserialize_with = "lenient")]
    created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    source: Option<User>,
    #[serde(default, deserialize_with = "lenient")]
    target: Option<User>,
    #[serde(default)]
    target_object: Option<Value>,
}

impl From<EventPayload> for Event {
    fn from(payload: EventPayload) -> Self {
        let name = match payload.event {
            Value::String(name) => EventName::parse(&name),
            other => EventName::Unknown(other.to_string()),
        };
        Event {
            name,
            created_at: payload.created_at,
            source: payload.source,
            target: payload.target,
            target_object: payload.target_object,
        }
    }
}
