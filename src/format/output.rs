use serde::{Deserialize, Serialize};

use issuelens_lib::{AggregateRow, CycleTimePercentiles, TrendBucket};

/// Result of an import run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSummary {
    pub session: String,
    pub file: String,
    /// Raw records found in the export, before the cap.
    pub total_records: usize,
    /// Issues that survived normalization and were cached.
    pub imported: usize,
    /// Malformed records dropped by the normalizer.
    pub dropped: usize,
    /// Whether the import cap truncated the export.
    pub capped: bool,
}

/// Per-dimension rollup for the stats view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsReport {
    pub dimension: String,
    /// Issues considered after filtering.
    pub issue_count: usize,
    pub rows: Vec<AggregateRow>,
}

/// Cycle-time percentiles for the percentiles view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PercentileReport {
    /// Issues considered after filtering.
    pub issue_count: usize,
    /// Issues with a positive cycle time that fed the percentiles.
    pub resolved_count: usize,
    #[serde(flatten)]
    pub percentiles: CycleTimePercentiles,
}

/// Monthly trend series for the trend view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendReport {
    /// Issues considered after filtering.
    pub issue_count: usize,
    pub buckets: Vec<TrendBucket>,
}
