//! Version command for twitter-stream.

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Print the version string and exit successfully.
pub fn handle_version_command() -> ! {
    println!("twitter-stream {}", VERSION);
    std::process::exit(0)
}
