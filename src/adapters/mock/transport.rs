//! Mock transport for client tests.
//!
//! Each `stream` call feeds the next queued batch of chunks into the sink,
//! which keeps client tests free of socket details.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::error::{StreamingError, StreamingResult};
use crate::traits::{ConnectionRequest, ResponseSink, StreamStatus, Transport};

/// A request as the transport saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub host: String,
    pub port: u16,
    pub raw: String,
}

#[derive(Debug, Default)]
struct MockTransportState {
    batches: VecDeque<Vec<Vec<u8>>>,
    failures: VecDeque<StreamingError>,
    stay_connected: bool,
    connected: bool,
    requests: Vec<RecordedRequest>,
    stream_calls: usize,
    close_calls: usize,
}

/// Transport double. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockTransportState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the chunks delivered by the next `stream` call.
    pub fn with_batch<I, C>(self, chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[u8]>,
    {
        self.push_batch(chunks);
        self
    }

    /// Report connected after each `stream` call, like a persistent transport.
    pub fn persistent(self) -> Self {
        self.state.lock().unwrap().stay_connected = true;
        self
    }

    /// Make the next `stream` call fail with `err` before delivering anything.
    pub fn with_failure(self, err: StreamingError) -> Self {
        self.state.lock().unwrap().failures.push_back(err);
        self
    }

    pub fn push_batch<I, C>(&self, chunks: I)
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[u8]>,
    {
        let batch = chunks.into_iter().map(|c| c.as_ref().to_vec()).collect();
        self.state.lock().unwrap().batches.push_back(batch);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn stream_calls(&self) -> usize {
        self.state.lock().unwrap().stream_calls
    }

    pub fn close_calls(&self) -> usize {
        self.state.lock().unwrap().close_calls
    }
}

impl Transport for MockTransport {
    fn stream(
        &mut self,
        request: &dyn ConnectionRequest,
        sink: &mut dyn ResponseSink,
    ) -> StreamingResult<StreamStatus> {
        let mut raw = Vec::new();
        request
            .write_to(&mut raw)
            .map_err(|e| crate::error::NetworkError::write(&e))?;

        let (batch, failure, stay_connected) = {
            let mut state = self.state.lock().unwrap();
            state.stream_calls += 1;
            state.requests.push(RecordedRequest {
                host: request.socket_host().to_string(),
                port: request.socket_port(),
                raw: String::from_utf8_lossy(&raw).into_owned(),
            });
            (
                state.batches.pop_front().unwrap_or_default(),
                state.failures.pop_front(),
                state.stay_connected,
            )
        };

        if let Some(err) = failure {
            self.state.lock().unwrap().connected = false;
            return Err(err);
        }

        self.state.lock().unwrap().connected = stay_connected;
        for chunk in &batch {
            if let Err(err) = sink.receive(chunk) {
                self.state.lock().unwrap().connected = false;
                return Err(err);
            }
        }

        Ok(if stay_connected {
            StreamStatus::Idle
        } else {
            StreamStatus::Closed
        })
    }

    fn is_connected(&self) -> bool {
        self.state.lock().unwrap().connected
    }

    fn close(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.close_calls += 1;
        state.connected = false;
    }
}
