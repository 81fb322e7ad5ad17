//! Twitter Streaming - a long-lived client for newline-delimited JSON streams
//!
//! A [`StreamingClient`] opens one TLS connection to a streaming endpoint,
//! validates the HTTP head, splits the body into JSON lines and hands each
//! line to a callback as a typed [`StreamEvent`].

pub mod adapters;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod request;
pub mod response;
pub mod traits;
pub mod transport;

pub use client::StreamingClient;
pub use config::ClientConfig;
pub use error::{StreamingError, StreamingResult};
pub use events::StreamEvent;
pub use request::StreamRequest;
pub use traits::StreamStatus;
