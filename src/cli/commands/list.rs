//! List command implementation.
//!
//! Primary inspection interface: the filtered canonical collection,
//! one line per issue (or the full records as JSON).

use anyhow::Result;

use crate::cli::QueryArgs;
use crate::config::Config;
use crate::format::format_issue_line;

use super::load_filtered;

/// Execute the list command.
///
/// # Errors
///
/// Returns an error if the session cache cannot be loaded.
pub fn execute(config: &Config, args: &QueryArgs, json: bool) -> Result<()> {
    let issues = load_filtered(config, args)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&issues)?);
    } else if issues.is_empty() {
        println!("No issues found.");
    } else {
        for issue in &issues {
            println!("{}", format_issue_line(issue));
        }
        println!("\n{} issue(s)", issues.len());
    }

    Ok(())
}
