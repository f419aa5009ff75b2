//! `issuelens` (ilens) - Issue analytics for Jira-style exports
//!
//! Imports raw issue exports, normalizes them into a canonical shape,
//! and answers analytics queries: per-dimension rollups, cycle-time
//! percentiles, monthly trend series.

use issuelens::run;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
