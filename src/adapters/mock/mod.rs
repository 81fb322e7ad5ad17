//! Mock implementations for testing.
//!
//! - [`MockSocket`] - Scripted reads, recorded writes
//! - [`MockSocketFactory`] - Hands out scripted sockets and records connects
//! - [`MockTransport`] - Transport that feeds canned bytes into the sink

pub mod socket;
pub mod transport;

pub use socket::{MockSocket, MockSocketFactory, ReadStep};
pub use transport::MockTransport;
