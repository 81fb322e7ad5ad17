//! Blocking transport: one connection per call.

use std::io::{ErrorKind, Read};
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{NetworkError, StreamingResult};
use crate::traits::{ConnectionRequest, ResponseSink, SocketFactory, StreamStatus, Transport};

use super::{send_request, CHUNK_SIZE};

/// Opens a fresh connection for every `stream` call and reads it until the
/// peer closes it.
///
/// The call does not return while the stream stays open.
pub struct BlockingTransport {
    factory: Arc<dyn SocketFactory>,
}

impl BlockingTransport {
    pub fn new(factory: Arc<dyn SocketFactory>) -> Self {
        Self { factory }
    }
}

impl std::fmt::Debug for BlockingTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingTransport").finish_non_exhaustive()
    }
}

impl Transport for BlockingTransport {
    fn stream(
        &mut self,
        request: &dyn ConnectionRequest,
        sink: &mut dyn ResponseSink,
    ) -> StreamingResult<StreamStatus> {
        let host = request.socket_host();
        let port = request.socket_port();
        let mut socket = self.factory.connect(host, port)?;
        info!("Connected to {}:{} (blocking)", host, port);

        let result = (|| -> StreamingResult<()> {
            send_request(socket.as_mut(), request)?;

            let mut buf = [0u8; CHUNK_SIZE];
            loop {
                match socket.read(&mut buf) {
                    Ok(0) => return Ok(()),
                    Ok(n) => sink.receive(&buf[..n])?,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(NetworkError::read(&e).into()),
                }
            }
        })();

        if let Err(e) = socket.shutdown() {
            debug!("Socket shutdown failed: {}", e);
        }
        info!("Disconnected from {}:{}", host, port);

        result.map(|()| StreamStatus::Closed)
    }

    fn is_connected(&self) -> bool {
        false
    }

    fn close(&mut self) {}
}
