//! Typed stream events and the dispatcher that produces them.
//!
//! # Module structure
//! - `types` - Event type definitions (StreamEvent enum and domain objects)
//! - `payloads` - Internal payload deserialization structs
//! - `classify` - Routing of decoded JSON values onto event variants

mod classify;
mod payloads;
mod types;

// Re-export public types
pub use classify::classify;
pub use types::{
    DeletedTweet, DirectMessage, Event, EventName, StallWarning, StreamEvent, Tweet, User,
};
