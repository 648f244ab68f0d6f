//! Logging initialization for Parley.

use tracing_subscriber::EnvFilter;

/// Initializes logging to stderr.
///
/// Chat output goes to stdout; keeping diagnostics on stderr means exports and
/// piped output stay clean. Controlled via RUST_LOG, defaulting to warn so the
/// REPL is quiet unless asked otherwise.
pub fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}
