//! Percentiles command implementation.
//!
//! Nearest-rank cycle-time percentiles over the filtered collection.

use anyhow::Result;

use issuelens_lib::cycle_time_percentiles;

use crate::cli::QueryArgs;
use crate::config::Config;
use crate::format::{PercentileReport, render_percentiles};

use super::load_filtered;

/// Execute the percentiles command.
///
/// # Errors
///
/// Returns an error if the session cache cannot be loaded.
pub fn execute(config: &Config, args: &QueryArgs, json: bool) -> Result<()> {
    let issues = load_filtered(config, args)?;
    let resolved_count = issues.iter().filter(|i| i.has_cycle_time()).count();

    let report = PercentileReport {
        issue_count: issues.len(),
        resolved_count,
        percentiles: cycle_time_percentiles(&issues),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if resolved_count == 0 {
        println!("No resolved issues to measure.");
    } else {
        println!("{}", render_percentiles(&report.percentiles));
        println!("\n{} resolved of {} issue(s)", resolved_count, report.issue_count);
    }

    Ok(())
}
