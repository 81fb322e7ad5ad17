//! CLI module for twitter-stream.
//!
//! - Argument parsing
//! - Version display
//! - Dispatch of a parsed stream command onto a [`StreamingClient`]
//!
//! # Usage
//!
//! ```ignore
//! use twitter_streaming::cli::{parse_args, run_stream, CliCommand};
//!
//! if let CliCommand::Stream(args) = parse_args(std::env::args())? {
//!     run_stream(&mut client, &args, |event| println!("{:?}", event))?;
//! }
//! ```

pub mod args;
pub mod version;

pub use args::{parse_args, ArgsError, CliCommand, Endpoint, StreamArgs, USAGE};
pub use version::{handle_version_command, VERSION};

use crate::client::StreamingClient;
use crate::error::StreamingResult;
use crate::events::StreamEvent;
use crate::traits::StreamStatus;

/// Make one stream call for the endpoint in `args`.
pub fn run_stream<F>(
    client: &mut StreamingClient,
    args: &StreamArgs,
    on_event: F,
) -> StreamingResult<StreamStatus>
where
    F: FnMut(StreamEvent),
{
    let params = args.param_pairs();
    match &args.endpoint {
        Endpoint::Sample => client.sample(&params, on_event),
        Endpoint::Firehose => client.firehose(&params, on_event),
        Endpoint::Filter => client.filter(&params, on_event),
        Endpoint::Site(follow) => client.site(follow, &params, on_event),
        Endpoint::User => client.user(&params, on_event),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::MockTransport;

    fn stream_args(args: &[&str]) -> StreamArgs {
        let argv = std::iter::once("twitter-stream")
            .chain(args.iter().copied())
            .map(String::from);
        match parse_args(argv) {
            Ok(CliCommand::Stream(stream)) => stream,
            other => panic!("expected stream command, got {:?}", other),
        }
    }

    #[test]
    fn test_run_stream_hits_selected_endpoint() {
        let cases = [
            (vec!["sample"], "GET /1.1/statuses/sample.json HTTP/1.1"),
            (vec!["firehose"], "GET /1.1/statuses/firehose.json HTTP/1.1"),
            (vec!["filter", "--track", "rust"], "POST /1.1/statuses/filter.json HTTP/1.1"),
            (vec!["site", "--follow", "7505382"], "GET /1.1/site.json?follow=7505382 HTTP/1.1"),
            (vec!["user"], "GET /1.1/user.json HTTP/1.1"),
        ];

        for (argv, request_line) in cases {
            let transport = MockTransport::new();
            let mut client = StreamingClient::with_transport(Box::new(transport.clone()));
            run_stream(&mut client, &stream_args(&argv), |_| {}).unwrap();
            assert!(
                transport.requests()[0].raw.starts_with(request_line),
                "{:?} sent {}",
                argv,
                transport.requests()[0].raw
            );
        }
    }
}
