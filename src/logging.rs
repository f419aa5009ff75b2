//! tracing subscriber setup for the CLI.
//!
//! Diagnostics always go to stderr so `--json` output on stdout stays
//! machine-parseable. Verbosity is additive (`-v`, `-vv`) and `--quiet`
//! wins over everything except the `RUST_LOG` override.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG`, when set, takes precedence over the flag-derived level.
///
/// # Errors
///
/// Returns an error message if a subscriber is already installed.
pub fn init_logging(verbose: u8, quiet: bool) -> Result<(), String> {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| e.to_string())
}
