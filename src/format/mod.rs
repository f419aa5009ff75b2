//! Output formatting for `issuelens`.
//!
//! Supports both human-readable text output and machine-parseable
//! JSON (`--json`). Diagnostics go to stderr so stdout stays clean.
//!
//! # JSON Output Types
//!
//! - [`ImportSummary`] - Result of an import run (import)
//! - [`StatsReport`] - Per-dimension rollup (stats)
//! - [`PercentileReport`] - Cycle-time percentiles (percentiles)
//! - [`TrendReport`] - Monthly trend series (trend)

mod output;
mod text;

pub use output::{ImportSummary, PercentileReport, StatsReport, TrendReport};
pub use text::{
    format_issue_line, render_aggregate_table, render_percentiles, render_trend_table,
};
