//! Logging setup for the `scif` binary
//!
//! Library code only emits `tracing` events; the binary decides where
//! they go.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber on stderr.
///
/// `RUST_LOG` takes precedence over `level`. Calling this more than once
/// keeps the first subscriber.
pub fn init_subscriber(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .compact();

    let _ = subscriber.try_init();
}
