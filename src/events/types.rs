//! Stream event types.
//!
//! Contains the `StreamEvent` enum with every kind of message the stream
//! endpoints deliver, and the domain objects each variant carries.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize a field, falling back to its default when the value has the
/// wrong type.
pub(super) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Minimal user object embedded in tweets, messages and events.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct User {
    /// 0 when the payload omits the id
    #[serde(default, deserialize_with = "lenient")]
    pub id: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub screen_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tweet {
    pub id: u64,
    pub text: String,
    pub created_at: Option<String>,
    pub user: Option<User>,
    pub in_reply_to_status_id: Option<u64>,
    pub lang: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DirectMessage {
    #[serde(default, deserialize_with = "lenient")]
    pub id: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub sender: Option<User>,
    #[serde(default, deserialize_with = "lenient")]
    pub recipient: Option<User>,
}

/// A user-stream event such as a follow or a favorite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub name: EventName,
    pub created_at: Option<String>,
    pub source: Option<User>,
    pub target: Option<User>,
    /// The tweet or list the event is about, left undecoded.
    pub target_object: Option<serde_json::Value>,
}

/// Notice that a tweet was deleted and should be removed from local storage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeletedTweet {
    pub id: u64,
    pub user_id: Option<u64>,
}

/// Warning sent when the client is falling behind the stream.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StallWarning {
    #[serde(default, deserialize_with = "lenient")]
    pub code: String,
    #[serde(default, deserialize_with = "lenient")]
    pub message: String,
    #[serde(default, deserialize_with = "lenient")]
    pub percent_full: Option<u32>,
}

/// Event names a user stream can carry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventName {
    AccessRevoked,
    Block,
    Unblock,
    Favorite,
    Unfavorite,
    Follow,
    Unfollow,
    UserUpdate,
    ListCreated,
    ListDestroyed,
    ListUpdated,
    ListMemberAdded,
    ListMemberRemoved,
    ListUserSubscribed,
    ListUserUnsubscribed,
    QuotedTweet,
    FavoritedRetweet,
    RetweetedRetweet,
    Mute,
    Unmute,
    /// A name this client does not know yet.
    Unknown(String),
}

impl EventName {
    pub fn parse(name: &str) -> Self {
        match name {
            "access_revoked" => EventName::AccessRevoked,
            "block" => EventName::Block,
            "unblock" => EventName::Unblock,
            "favorite" => EventName::Favorite,
            "unfavorite" => EventName::Unfavorite,
            "follow" => EventName::Follow,
            "unfollow" => EventName::Unfollow,
            "user_update" => EventName::UserUpdate,
            "list_created" => EventName::ListCreated,
            "list_destroyed" => EventName::ListDestroyed,
            "list_updated" => EventName::ListUpdated,
            "list_member_added" => EventName::ListMemberAdded,
            "list_member_removed" => EventName::ListMemberRemoved,
            "list_user_subscribed" => EventName::ListUserSubscribed,
            "list_user_unsubscribed" => EventName::ListUserUnsubscribed,
            "quoted_tweet" => EventName::QuotedTweet,
            "favorited_retweet" => EventName::FavoritedRetweet,
            "retweeted_retweet" => EventName::RetweetedRetweet,
            "mute" => EventName::Mute,
            "unmute" => EventName::Unmute,
            other => EventName::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EventName::AccessRevoked => "access_revoked",
            EventName::Block => "block",
            EventName::Unblock => "unblock",
            EventName::Favorite => "favorite",
            EventName::Unfavorite => "unfavorite",
            EventName::Follow => "follow",
            EventName::Unfollow => "unfollow",
            EventName::UserUpdate => "user_update",
            EventName::ListCreated => "list_created",
            EventName::ListDestroyed => "list_destroyed",
            EventName::ListUpdated => "list_updated",
            EventName::ListMemberAdded => "list_member_added",
            EventName::ListMemberRemoved => "list_member_removed",
            EventName::ListUserSubscribed => "list_user_subscribed",
            EventName::ListUserUnsubscribed => "list_user_unsubscribed",
            EventName::QuotedTweet => "quoted_tweet",
            EventName::FavoritedRetweet => "favorited_retweet",
            EventName::RetweetedRetweet => "retweeted_retweet",
            EventName::Mute => "mute",
            EventName::Unmute => "unmute",
            EventName::Unknown(name) => name,
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EventName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One classified message from the stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum StreamEvent {
    Tweet(Tweet),
    DirectMessage(DirectMessage),
    /// Ids of the users the authenticated user follows, in stream order.
    FollowListSnapshot(Vec<u64>),
    NamedEvent(Event),
    DeletedTweetNotice(DeletedTweet),
    StallWarning(StallWarning),
    /// A message with no recognized shape, forwarded untouched.
    RawUnclassified(serde_json::Value),
}

impl StreamEvent {
    /// Returns the event kind as a string for logging.
    pub fn kind_name(&self) -> &'static str {
        match self {
            StreamEvent::Tweet(_) => "tweet",
            StreamEvent::DirectMessage(_) => "direct_message",
            StreamEvent::FollowListSnapshot(_) => "follow_list_snapshot",
            StreamEvent::NamedEvent(_) => "named_event",
            StreamEvent::DeletedTweetNotice(_) => "deleted_tweet_notice",
            StreamEvent::StallWarning(_) => "stall_warning",
            StreamEvent::RawUnclassified(_) => "raw_unclassified",
        }
    }
}
