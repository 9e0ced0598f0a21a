//! Logging setup shared by both binaries
//!
//! Everything is logged to stderr so stdout stays clean for results
//! (`create-version` prints only the version name, `--json` prints JSON).

use is_terminal::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Default filter for a `-v` count; `RUST_LOG` wins when set
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "cutover=info,cutover_gate=info",
        1 => "cutover=debug,cutover_gate=debug",
        _ => "cutover=trace,cutover_gate=trace",
    }
}

pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}
