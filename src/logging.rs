use std::io;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs a stderr subscriber. Stdout is left to the CLI output.
///
/// Returns false when a global subscriber was already installed; the existing
/// one stays in place and records the rejected directive.
pub fn init_tracing(directive: &str) -> bool {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("warn"));

    match tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .try_init()
    {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(%err, directive, "tracing subscriber already installed");
            false
        }
    }
}
