//! `issuelens` - Issue analytics CLI library
//!
//! This crate provides the `ilens` CLI tool on top of the
//! `issuelens-lib` analytics engine.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`cli`] - Command-line interface using clap
//! - [`config`] - Configuration management (YAML + env overrides)
//! - [`format`] - Output formatting (text, JSON)
//! - [`logging`] - tracing subscriber setup
//!
//! The analytics engine itself (normalizer, filters, aggregator,
//! trend builder, session cache) lives in `issuelens-lib`.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod format;
pub mod logging;

/// Run the CLI application.
///
/// This is the main entry point called from `main()`.
///
/// # Errors
///
/// Returns an error if command execution fails.
pub fn run() -> anyhow::Result<()> {
    cli::run()
}
