//! Request abstraction consumed by the transports.

use std::io::{self, Write};

/// A request that knows where it goes and how to put itself on the wire.
pub trait ConnectionRequest {
    /// Host to resolve and connect to.
    fn socket_host(&self) -> &str;

    /// Port to connect to.
    fn socket_port(&self) -> u16;

    /// Write the complete HTTP request (request line, headers, body).
    fn write_to(&self, out: &mut dyn Write) -> io::Result<()>;
}
