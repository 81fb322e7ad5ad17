//! Stream request building.
//!
//! [`StreamRequest`] is the concrete [`ConnectionRequest`] for the streaming
//! endpoints. It only knows how to lay out an HTTP/1.1 request; signing or
//! authorizing it is up to the caller via [`StreamRequest::with_header`].

use std::fmt;
use std::io::{self, Write};

use crate::traits::ConnectionRequest;

pub const STREAM_HOST: &str = "stream.twitter.com";
pub const SITE_STREAM_HOST: &str = "sitestream.twitter.com";
pub const USER_STREAM_HOST: &str = "userstream.twitter.com";
pub const HTTPS_PORT: u16 = 443;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

/// An HTTP request against a streaming endpoint.
///
/// Parameters go in the query string for GET and in a form-encoded body for
/// POST.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamRequest {
    method: Method,
    host: String,
    port: u16,
    path: String,
    params: Vec<(String, String)>,
    headers: Vec<(String, String)>,
}

impl StreamRequest {
    pub fn new(method: Method, host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method,
            host: host.into(),
            port: HTTPS_PORT,
            path: path.into(),
            params: Vec::new(),
            headers: Vec::new(),
        }
    }

    /// Public statuses matching one or more filter predicates
    /// (`track`, `follow`, `locations`).
    pub fn filter(params: &[(&str, &str)]) -> Self {
        Self::new(Method::Post, STREAM_HOST, "/1.1/statuses/filter.json").with_params(params)
    }

    /// All public statuses.
    pub fn firehose(params: &[(&str, &str)]) -> Self {
        Self::new(Method::Get, STREAM_HOST, "/1.1/statuses/firehose.json").with_params(params)
    }

    /// A small random sample of all public statuses.
    pub fn sample(params: &[(&str, &str)]) -> Self {
        Self::new(Method::Get, STREAM_HOST, "/1.1/statuses/sample.json").with_params(params)
    }

    /// Realtime updates for a set of users.
    pub fn site(follow: &[u64], params: &[(&str, &str)]) -> Self {
        let follow = follow
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        Self::new(Method::Get, SITE_STREAM_HOST, "/1.1/site.json")
            .with_param("follow", follow)
            .with_params(params)
    }

    /// Messages for the authenticated user.
    pub fn user(params: &[(&str, &str)]) -> Self {
        Self::new(Method::Get, USER_STREAM_HOST, "/1.1/user.json").with_params(params)
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    pub fn with_params(mut self, params: &[(&str, &str)]) -> Self {
        self.params
            .extend(params.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        self
    }

    /// Add a header, replacing any earlier header of the same name.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Percent-encoded `name=value` pairs joined with `&`.
    pub fn encoded_params(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Request target for the request line.
    pub fn target(&self) -> String {
        if self.method == Method::Get && !self.params.is_empty() {
            format!("{}?{}", self.path, self.encoded_params())
        } else {
            self.path.clone()
        }
    }

    fn host_header(&self) -> String {
        if self.port == HTTPS_PORT {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl ConnectionRequest for StreamRequest {
    fn socket_host(&self) -> &str {
        &self.host
    }

    fn socket_port(&self) -> u16 {
        self.port
    }

    fn write_to(&self, out: &mut dyn Write) -> io::Result<()> {
        write!(out, "{} {} HTTP/1.1\r\n", self.method, self.target())?;
        write!(out, "Host: {}\r\n", self.host_header())?;
        for (name, value) in &self.headers {
            write!(out, "{}: {}\r\n", name, value)?;
        }

        if self.method == Method::Post {
            let body = self.encoded_params();
            write!(out, "Content-Type: application/x-www-form-urlencoded\r\n")?;
            write!(out, "Content-Length: {}\r\n\r\n", body.len())?;
            out.write_all(body.as_bytes())?;
        } else {
            out.write_all(b"\r\n")?;
        }
        out.flush()
    }
}
