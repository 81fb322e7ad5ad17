//! Command-line argument parsing for twitter-stream.
//!
//! This module turns `std::env::args()` into a [`CliCommand`]: either a
//! stream to open, or one of the informational flags.

use std::time::Duration;

use thiserror::Error;

/// Stream endpoint picked on the command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    Sample,
    Firehose,
    Filter,
    /// Site stream for the given user ids
    Site(Vec<u64>),
    User,
}

impl Endpoint {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "sample" => Some(Endpoint::Sample),
            "firehose" => Some(Endpoint::Firehose),
            "filter" => Some(Endpoint::Filter),
            "site" => Some(Endpoint::Site(Vec::new())),
            "user" => Some(Endpoint::User),
            _ => None,
        }
    }
}

/// Everything needed to open and poll one stream.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamArgs {
    pub endpoint: Endpoint,
    /// Request parameters in the order given
    pub params: Vec<(String, String)>,
    pub nonblocking: bool,
    /// `Some(None)` disables the timeout; `None` keeps the configured one
    pub timeout: Option<Option<Duration>>,
}

impl StreamArgs {
    fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            params: Vec::new(),
            nonblocking: false,
            timeout: None,
        }
    }

    /// Parameters as borrowed pairs for the client API.
    pub fn param_pairs(&self) -> Vec<(&str, &str)> {
        self.params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Open a stream and print its events
    Stream(StreamArgs),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArgsError {
    #[error("Unknown stream endpoint: {0}")]
    UnknownEndpoint(String),

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Option {0} needs a value")]
    MissingValue(String),

    #[error("Invalid value for {option}: {value}")]
    InvalidValue { option: String, value: String },

    #[error("The site stream needs --follow with at least one user id")]
    MissingFollow,
}

pub const USAGE: &str = "\
Usage: twitter-stream <sample|firehose|filter|site|user> [options]

Options:
  --track <terms>        Comma-separated phrases to track (filter)
  --follow <ids>         Comma-separated user ids (filter, site)
  --locations <boxes>    Comma-separated bounding boxes (filter)
  --param <name=value>   Extra request parameter, repeatable
  --nonblocking          Poll the stream instead of blocking on it
  --timeout <secs>       Poll timeout in seconds, 0 waits forever
  -V, --version          Print version
  -h, --help             Print this help

Environment:
  TWITTER_STREAM_AUTHORIZATION   Sent verbatim as the Authorization header
  TWITTER_STREAM_NONBLOCKING     Same as --nonblocking when 1 or true
  TWITTER_STREAM_TIMEOUT_SECS    Same as --timeout
  RUST_LOG                       Log filter (default: warn)
";

/// Parse command-line arguments and return the appropriate command.
///
/// The first argument is the program name and is skipped. `--version` and
/// `--help` win over everything else.
///
/// # Examples
///
/// ```
/// use twitter_streaming::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["twitter-stream".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), Ok(CliCommand::Version));
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    let args: Vec<String> = args.skip(1).collect();

    for arg in &args {
        match arg.as_str() {
            "--version" | "-V" => return Ok(CliCommand::Version),
            "--help" | "-h" => return Ok(CliCommand::Help),
            _ => {}
        }
    }

    let mut iter = args.into_iter();
    let Some(name) = iter.next() else {
        return Ok(CliCommand::Help);
    };
    let endpoint = Endpoint::from_name(&name).ok_or(ArgsError::UnknownEndpoint(name))?;
    let mut stream = StreamArgs::new(endpoint);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--nonblocking" => stream.nonblocking = true,
            "--timeout" => {
                let value = next_value(&mut iter, &arg)?;
                let secs = value.parse::<u64>().map_err(|_| invalid(&arg, &value))?;
                stream.timeout = Some((secs > 0).then(|| Duration::from_secs(secs)));
            }
            "--track" | "--locations" => {
                let value = next_value(&mut iter, &arg)?;
                stream.params.push((arg[2..].to_string(), value));
            }
            "--follow" => {
                let value = next_value(&mut iter, &arg)?;
                match &mut stream.endpoint {
                    Endpoint::Site(ids) => ids.extend(parse_ids(&arg, &value)?),
                    _ => {
                        parse_ids(&arg, &value)?;
                        stream.params.push(("follow".to_string(), value));
                    }
                }
            }
            "--param" => {
                let value = next_value(&mut iter, &arg)?;
                let (name, val) = value.split_once('=').ok_or_else(|| invalid(&arg, &value))?;
                stream.params.push((name.to_string(), val.to_string()));
            }
            _ => return Err(ArgsError::UnknownOption(arg)),
        }
    }

    if matches!(&stream.endpoint, Endpoint::Site(ids) if ids.is_empty()) {
        return Err(ArgsError::MissingFollow);
    }

    Ok(CliCommand::Stream(stream))
}

fn next_value<I>(iter: &mut I, option: &str) -> Result<String, ArgsError>
where
    I: Iterator<Item = String>,
{
    iter.next()
        .ok_or_else(|| ArgsError::MissingValue(option.to_string()))
}

fn parse_ids(option: &str, value: &str) -> Result<Vec<u64>, ArgsError> {
    value
        .split(',')
        .map(|id| id.trim().parse::<u64>().map_err(|_| invalid(option, value)))
        .collect()
}

fn invalid(option: &str, value: &str) -> ArgsError {
    ArgsError::InvalidValue {
        option: option.to_string(),
        value: value.to_string(),
    }
}
