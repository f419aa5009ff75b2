//! Stats command implementation.
//!
//! Per-dimension rollups over the filtered collection.

use anyhow::Result;

use issuelens_lib::{aggregate_by, sort_rows};

use crate::cli::StatsArgs;
use crate::config::Config;
use crate::format::{StatsReport, render_aggregate_table};

use super::load_filtered;

/// Execute the stats command.
///
/// # Errors
///
/// Returns an error if the session cache cannot be loaded.
pub fn execute(config: &Config, args: &StatsArgs, json: bool) -> Result<()> {
    let issues = load_filtered(config, &args.query)?;

    let mut rows = aggregate_by(&issues, args.by);
    sort_rows(&mut rows, args.sort);

    let report = StatsReport {
        dimension: args.by.to_string(),
        issue_count: issues.len(),
        rows,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.rows.is_empty() {
        println!("No issues found.");
    } else {
        print!("{}", render_aggregate_table(&report.rows));
        println!("\n{} issue(s) across {} group(s)", report.issue_count, report.rows.len());
    }

    Ok(())
}
