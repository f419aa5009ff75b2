//! Trend command implementation.
//!
//! Monthly trend series with month-over-month growth, optionally
//! broken out per tracked assignee.

use anyhow::Result;

use issuelens_lib::build_monthly_trend;

use crate::cli::TrendArgs;
use crate::config::Config;
use crate::format::{TrendReport, render_trend_table};

use super::load_filtered;

/// Execute the trend command.
///
/// # Errors
///
/// Returns an error if the session cache cannot be loaded.
pub fn execute(config: &Config, args: &TrendArgs, json: bool) -> Result<()> {
    let issues = load_filtered(config, &args.query)?;

    let report = TrendReport {
        issue_count: issues.len(),
        buckets: build_monthly_trend(&issues, &args.track),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.buckets.is_empty() {
        println!("No issues with both creation and resolution dates.");
    } else {
        print!("{}", render_trend_table(&report.buckets));
        for (assignee, months) in collect_tracked(&report) {
            println!("\n{assignee}:");
            for (month, trend) in months {
                println!(
                    "  {month}  created {}, resolved {}, avg cycle {:.1}, done {}%",
                    trend.created_in_month,
                    trend.resolved_in_month,
                    trend.avg_cycle_time,
                    trend.completion_rate
                );
            }
        }
    }

    Ok(())
}

/// Regroup the per-bucket assignee maps into per-assignee series for
/// text output.
fn collect_tracked(
    report: &TrendReport,
) -> Vec<(String, Vec<(String, &issuelens_lib::AssigneeTrend)>)> {
    let mut by_assignee: std::collections::BTreeMap<
        String,
        Vec<(String, &issuelens_lib::AssigneeTrend)>,
    > = std::collections::BTreeMap::new();
    for bucket in &report.buckets {
        for (assignee, trend) in &bucket.assignees {
            by_assignee
                .entry(assignee.clone())
                .or_default()
                .push((bucket.month.clone(), trend));
        }
    }
    by_assignee.into_iter().collect()
}
