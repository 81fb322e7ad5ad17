use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use twitter_streaming::cli::{handle_version_command, parse_args, run_stream, CliCommand, USAGE};
use twitter_streaming::{ClientConfig, StreamEvent, StreamStatus, StreamingClient};

/// Env var whose value is sent verbatim as the `Authorization` header.
const AUTHORIZATION_ENV: &str = "TWITTER_STREAM_AUTHORIZATION";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Set up Ctrl+C handler that sets the interrupted flag.
fn setup_interrupt_handler() -> Arc<AtomicBool> {
    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_clone = Arc::clone(&interrupted);

    // Install the handler - ignore errors if already set
    let _ = ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::SeqCst);
    });

    interrupted
}

fn print_event(out: &mut impl Write, event: &StreamEvent) {
    let result = serde_json::to_string(event)
        .map_err(io::Error::from)
        .and_then(|line| writeln!(out, "{}", line))
        .and_then(|_| out.flush());
    if let Err(e) = result {
        warn!(kind = event.kind_name(), "Failed to print event: {}", e);
    }
}

fn main() -> Result<()> {
    let command = parse_args(std::env::args()).map_err(|e| eyre!("{}\n\n{}", e, USAGE))?;
    let args = match command {
        CliCommand::Version => handle_version_command(),
        CliCommand::Help => {
            print!("{}", USAGE);
            return Ok(());
        }
        CliCommand::Stream(args) => args,
    };

    color_eyre::install()?;
    init_tracing();

    let mut config = ClientConfig::from_env();
    if args.nonblocking {
        config.nonblocking = true;
    }
    if let Some(timeout) = args.timeout {
        config.timeout = timeout;
    }
    let nonblocking = config.nonblocking;

    let mut client = StreamingClient::new(config)?;
    if let Ok(authorization) = std::env::var(AUTHORIZATION_ENV) {
        client = client.with_authorization(authorization);
    } else {
        warn!("{} is not set; the endpoint will likely reject the request", AUTHORIZATION_ENV);
    }

    // Blocking reads can't observe a flag, so Ctrl+C keeps its default
    // behavior there.
    let interrupted = if nonblocking {
        setup_interrupt_handler()
    } else {
        Arc::new(AtomicBool::new(false))
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    loop {
        let status = run_stream(&mut client, &args, |event| print_event(&mut out, &event))?;
        match status {
            StreamStatus::Closed => {
                info!("Stream closed by peer");
                break;
            }
            StreamStatus::Idle if interrupted.load(Ordering::SeqCst) => {
                info!("Interrupted, closing stream");
                break;
            }
            StreamStatus::Idle => {}
        }
    }

    client.close();
    Ok(())
}
