//! Streaming client.
//!
//! [`StreamingClient`] owns one transport and one response session. Each
//! stream operation builds a request, runs the pre-request hook and lets the
//! transport push bytes through the session's pipeline, calling the event
//! callback once per message.

use std::sync::Arc;

use tracing::{debug, info};

use crate::adapters::OpenSslSocketFactory;
use crate::config::ClientConfig;
use crate::error::StreamingResult;
use crate::events::StreamEvent;
use crate::request::StreamRequest;
use crate::response::{PipelineSink, ResponsePipeline};
use crate::traits::{SocketFactory, StreamStatus, Transport};
use crate::transport::{BlockingTransport, NonblockingTransport};

type BeforeRequest = Box<dyn FnMut() + Send>;

/// One request and the pipeline parsing its response.
#[derive(Debug)]
struct Session {
    id: u64,
    request: StreamRequest,
    pipeline: ResponsePipeline,
}

/// Client for the streaming endpoints.
///
/// # Example
///
/// ```ignore
/// use twitter_streaming::{ClientConfig, StreamingClient};
///
/// let mut client = StreamingClient::new(ClientConfig::default())?;
/// client.filter(&[("track", "rust")], |event| println!("{:?}", event))?;
/// ```
pub struct StreamingClient {
    transport: Box<dyn Transport>,
    user_agent: String,
    authorization: Option<String>,
    before_request: Option<BeforeRequest>,
    session: Option<Session>,
    sessions_started: u64,
}

impl StreamingClient {
    /// Build a client with the transport `config` selects.
    ///
    /// Fails only when the default TLS connector cannot be created.
    pub fn new(config: ClientConfig) -> StreamingResult<Self> {
        let factory: Arc<dyn SocketFactory> = match config.socket_factory.clone() {
            Some(factory) => factory,
            None => Arc::new(
                OpenSslSocketFactory::new()?.with_connect_timeout(config.connect_timeout),
            ),
        };

        let transport: Box<dyn Transport> = if config.nonblocking {
            Box::new(
                NonblockingTransport::new(factory)
                    .with_timeout(config.timeout)
                    .with_poll_interval(config.poll_interval),
            )
        } else {
            Box::new(BlockingTransport::new(factory))
        };
        debug!(?config, "Created streaming client");

        Ok(Self::with_transport(transport).with_user_agent(config.user_agent))
    }

    /// Build a client around an existing transport.
    pub fn with_transport(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            user_agent: crate::config::DEFAULT_USER_AGENT.to_string(),
            authorization: None,
            before_request: None,
            session: None,
            sessions_started: 0,
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Send `value` verbatim as the `Authorization` header.
    pub fn with_authorization(mut self, value: impl Into<String>) -> Self {
        self.authorization = Some(value.into());
        self
    }

    /// Register a hook run before every stream operation, replacing any
    /// earlier one.
    pub fn before_request<F>(&mut self, hook: F) -> &mut Self
    where
        F: FnMut() + Send + 'static,
    {
        self.before_request = Some(Box::new(hook));
        self
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Close the connection and drop the current session.
    pub fn close(&mut self) {
        self.transport.close();
        self.session = None;
    }

    /// Identifier of the current session, if one was started.
    ///
    /// Stays the same across calls that resume a persistent connection.
    pub fn session_id(&self) -> Option<u64> {
        self.session.as_ref().map(|s| s.id)
    }

    /// Public statuses matching `track`, `follow` or `locations`.
    pub fn filter<F>(
        &mut self,
        params: &[(&str, &str)],
        on_event: F,
    ) -> StreamingResult<StreamStatus>
    where
        F: FnMut(StreamEvent),
    {
        self.stream(StreamRequest::filter(params), on_event)
    }

    pub fn firehose<F>(
        &mut self,
        params: &[(&str, &str)],
        on_event: F,
    ) -> StreamingResult<StreamStatus>
    where
        F: FnMut(StreamEvent),
    {
        self.stream(StreamRequest::firehose(params), on_event)
    }

    pub fn sample<F>(
        &mut self,
        params: &[(&str, &str)],
        on_event: F,
    ) -> StreamingResult<StreamStatus>
    where
        F: FnMut(StreamEvent),
    {
        self.stream(StreamRequest::sample(params), on_event)
    }

    /// Messages for each user in `follow`.
    pub fn site<F>(
        &mut self,
        follow: &[u64],
        params: &[(&str, &str)],
        on_event: F,
    ) -> StreamingResult<StreamStatus>
    where
        F: FnMut(StreamEvent),
    {
        self.stream(StreamRequest::site(follow, params), on_event)
    }

    /// Messages for the authenticated user.
    pub fn user<F>(&mut self, params: &[(&str, &str)], on_event: F) -> StreamingResult<StreamStatus>
    where
        F: FnMut(StreamEvent),
    {
        self.stream(StreamRequest::user(params), on_event)
    }

    /// Drive `request` through the transport.
    ///
    /// While the transport holds a connection from an earlier call, that
    /// call's request and pipeline are resumed and `request` is ignored.
    pub fn stream<F>(
        &mut self,
        request: StreamRequest,
        mut on_event: F,
    ) -> StreamingResult<StreamStatus>
    where
        F: FnMut(StreamEvent),
    {
        let mut session = match self.session.take() {
            Some(session) if self.transport.is_connected() => {
                debug!(session = session.id, "Resuming stream session");
                session
            }
            _ => self.start_session(request),
        };

        if let Some(hook) = self.before_request.as_mut() {
            hook();
        }

        let result = {
            let mut sink = PipelineSink::new(&mut session.pipeline, &mut on_event);
            self.transport.stream(&session.request, &mut sink)
        };
        debug!(
            session = session.id,
            events = session.pipeline.events_emitted(),
            ok = result.is_ok(),
            "Stream call returned"
        );
        self.session = Some(session);
        result
    }

    fn start_session(&mut self, request: StreamRequest) -> Session {
        self.sessions_started += 1;
        let mut request = request
            .with_header("User-Agent", self.user_agent.clone())
            .with_header("Accept", "*/*");
        if let Some(value) = &self.authorization {
            request = request.with_header("Authorization", value.clone());
        }
        info!(
            session = self.sessions_started,
            path = request.path(),
            "Starting stream session"
        );
        Session {
            id: self.sessions_started,
            request,
            pipeline: ResponsePipeline::new(),
        }
    }
}

impl std::fmt::Debug for StreamingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingClient")
            .field("connected", &self.transport.is_connected())
            .field("user_agent", &self.user_agent)
            .field("session", &self.session_id())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockSocket, MockSocketFactory, MockTransport, ReadStep};
    use crate::error::ApiErrorKind;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const OK_HEAD: &str = "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\r\n";
    const TWEET: &str = r#"{"id":1,"text":"hello","user":{"id":7,"screen_name":"sferik"}}"#;

    fn client(transport: &MockTransport) -> StreamingClient {
        StreamingClient::with_transport(Box::new(transport.clone()))
    }

    #[test]
    fn test_events_reach_callback_in_order() {
        let transport = MockTransport::new().with_batch([
            OK_HEAD.to_string(),
            format!("{}\r\n", TWEET),
            "\r\n{\"friends\":[1,2]}\r\n".to_string(),
        ]);
        let mut client = client(&transport);
        let mut kinds = Vec::new();

        let status = client
            .sample(&[], |event| kinds.push(event.kind_name()))
            .unwrap();

        assert_eq!(status, StreamStatus::Closed);
        assert_eq!(kinds, vec!["tweet", "follow_list_snapshot"]);
    }

    #[test]
    fn test_request_carries_default_headers() {
        let transport = MockTransport::new();
        let mut client = client(&transport)
            .with_user_agent("agent/1.0")
            .with_authorization("Bearer token");

        client.filter(&[("track", "india")], |_| {}).unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].host, "stream.twitter.com");
        assert!(requests[0].raw.starts_with("POST /1.1/statuses/filter.json HTTP/1.1\r\n"));
        assert!(requests[0].raw.contains("User-Agent: agent/1.0\r\n"));
        assert!(requests[0].raw.contains("Accept: */*\r\n"));
        assert!(requests[0].raw.contains("Authorization: Bearer token\r\n"));
        assert!(requests[0].raw.ends_with("track=india"));
    }

    #[test]
    fn test_before_request_runs_on_every_call() {
        let transport = MockTransport::new();
        let mut client = client(&transport);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        client.before_request(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        client.user(&[], |_| {}).unwrap();
        client.user(&[], |_| {}).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_closed_transport_starts_new_session() {
        let transport = MockTransport::new();
        let mut client = client(&transport);

        client.sample(&[], |_| {}).unwrap();
        let first = client.session_id();
        client.sample(&[], |_| {}).unwrap();

        assert_eq!(first, Some(1));
        assert_eq!(client.session_id(), Some(2));
        assert!(!client.is_connected());
    }

    #[test]
    fn test_connected_transport_resumes_session() {
        let transport = MockTransport::new()
            .persistent()
            .with_batch([OK_HEAD.to_string(), "{\"id\":1,".to_string()])
            .with_batch([r#""text":"joined"}"#.to_string() + "\n"]);
        let mut client = client(&transport);
        let mut events = Vec::new();

        let first = client
            .filter(&[("track", "india")], |e| events.push(e))
            .unwrap();
        let id = client.session_id();
        let second = client
            .filter(&[("track", "other")], |e| events.push(e))
            .unwrap();

        assert_eq!(first, StreamStatus::Idle);
        assert_eq!(second, StreamStatus::Idle);
        assert_eq!(client.session_id(), id);
        assert!(transport.requests()[1].raw.ends_with("track=india"));
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], StreamEvent::Tweet(t) if t.text == "joined"));
    }

    #[test]
    fn test_api_error_propagates() {
        let transport = MockTransport::new().with_batch(["HTTP/1.1 401 Unauthorized\r\n\r\n"]);
        let mut client = client(&transport);
        let mut events = 0;

        let err = client.user(&[], |_| events += 1).unwrap_err();

        assert_eq!(err.as_api().unwrap().kind, ApiErrorKind::Unauthorized);
        assert_eq!(events, 0);
    }

    #[test]
    fn test_close_delegates_and_drops_session() {
        let transport = MockTransport::new().persistent();
        let mut client = client(&transport);
        client.sample(&[], |_| {}).unwrap();
        assert!(client.is_connected());

        client.close();

        assert!(!client.is_connected());
        assert!(client.session_id().is_none());
        assert_eq!(transport.close_calls(), 1);
    }

    #[test]
    fn test_new_selects_transport_from_config() {
        let socket = MockSocket::new()
            .with_wait_delay(Duration::from_millis(2))
            .with_step(ReadStep::data(OK_HEAD));
        let factory = MockSocketFactory::new().with_socket(socket.clone());
        let config = ClientConfig::default()
            .with_nonblocking(true)
            .with_timeout(Some(Duration::from_millis(10)))
            .with_poll_interval(Duration::from_millis(2))
            .with_socket_factory(Arc::new(factory.clone()));
        let mut client = StreamingClient::new(config).unwrap();

        let status = client.sample(&[], |_| {}).unwrap();

        assert_eq!(status, StreamStatus::Idle);
        assert!(client.is_connected());
        assert!(socket.written_string().contains("User-Agent: twitter-streaming/"));
        client.close();
        assert!(socket.is_shutdown());
    }
}
