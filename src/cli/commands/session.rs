//! Session command implementation.
//!
//! Inspect and clear session caches. `show` reports metadata even for
//! an expired cache (the analytics commands would refuse it).

use anyhow::Result;

use issuelens_lib::SessionStore;

use crate::cli::{SessionCommand, SessionSubcommand};
use crate::config::Config;

use super::resolve_session;

/// Execute the session command.
///
/// # Errors
///
/// Returns an error on cache I/O failure.
pub fn execute(config: &Config, cmd: &SessionCommand, json: bool) -> Result<()> {
    let store = config.session_store();

    match &cmd.command {
        SessionSubcommand::Show { session } => {
            let session = resolve_session(config, session.as_deref());
            match store.describe(session)? {
                Some(info) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&info)?);
                    } else {
                        let state = if info.expired { "expired" } else { "live" };
                        println!(
                            "Session '{}': {} issue(s), saved {} ({state})",
                            info.session, info.issue_count, info.saved_at
                        );
                    }
                }
                None => println!("No cache for session '{session}'."),
            }
        }
        SessionSubcommand::Clear { session } => {
            let session = resolve_session(config, session.as_deref());
            store.clear(session)?;
            if !json {
                println!("Session '{session}' cleared.");
            }
        }
    }

    Ok(())
}
