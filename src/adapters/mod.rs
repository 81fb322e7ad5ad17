//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`OpenSslSocketFactory`] - TCP + OpenSSL TLS sockets for production use
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockSocket`] / [`mock::MockSocketFactory`] - Scripted sockets
//! - [`mock::MockTransport`] - Canned response bytes for client tests

pub mod mock;
pub mod openssl_tls;

pub use mock::{MockSocket, MockSocketFactory, MockTransport};
pub use openssl_tls::{OpenSslSocketFactory, TlsSocket};
