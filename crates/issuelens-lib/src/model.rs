//! Core data types for `issuelens-lib`.
//!
//! The canonical [`Issue`] record is produced once per import by the
//! normalizer and never mutated afterwards; everything else here is a
//! derived, disposable projection ([`AggregateRow`], [`TrendBucket`]).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel assignee for issues without one.
pub const UNASSIGNED: &str = "Not assigned";

/// Statuses that count as completed even when the resolution
/// timestamp was never populated by the source system.
pub const COMPLETED_STATUSES: [&str; 3] = ["Done", "Closed", "Resolved"];

/// The canonical issue record.
///
/// `lead_time` is intentionally computed identically to `cycle_time`;
/// the source process does not distinguish the two metrics. Do not
/// invent a separate lead-time definition here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Unique human-readable key (e.g. "PROJ-123"). Uniqueness is
    /// assumed, not enforced.
    pub id: String,

    /// Free-text summary; placeholder when the source omitted it.
    pub summary: String,

    /// Issue type category (Story, Bug, Task, ...); "Unknown" default.
    #[serde(default)]
    pub issue_type: String,

    /// Workflow state. Any string from the source system is valid.
    #[serde(default)]
    pub status: String,

    /// Ordered labels; may be empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,

    /// Estimate resolved from whichever custom field the project uses.
    #[serde(default)]
    pub story_points: f64,

    /// Whole days between creation and resolution; 0 when unresolved.
    #[serde(default)]
    pub cycle_time: i64,

    /// Currently identical to `cycle_time` (see type-level docs).
    #[serde(default)]
    pub lead_time: i64,

    /// Creation timestamp. Always present after normalization.
    pub created: DateTime<Utc>,

    /// Resolution timestamp; `None` means not yet completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved: Option<DateTime<Utc>>,

    /// Assignee display name; [`UNASSIGNED`] when absent.
    #[serde(default)]
    pub assignee: String,

    /// Project key, from the source field or the `id` prefix.
    #[serde(default)]
    pub project: String,
}

impl Issue {
    /// Whether this issue counts as completed.
    ///
    /// Resolution timestamp OR terminal status; some source records
    /// carry a terminal status without a resolution date.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.resolved.is_some() || COMPLETED_STATUSES.contains(&self.status.as_str())
    }

    /// Whether this issue contributes to cycle-time averages.
    #[must_use]
    pub fn has_cycle_time(&self) -> bool {
        self.cycle_time > 0
    }
}

/// Group-by dimension for [`crate::aggregate::aggregate_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dimension {
    Assignee,
    Label,
    IssueType,
    Status,
}

impl Dimension {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assignee => "assignee",
            Self::Label => "label",
            Self::IssueType => "issue-type",
            Self::Status => "status",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = crate::error::LensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "assignee" => Ok(Self::Assignee),
            "label" | "labels" => Ok(Self::Label),
            "issue-type" | "issuetype" | "type" => Ok(Self::IssueType),
            "status" => Ok(Self::Status),
            other => Err(crate::error::LensError::InvalidDimension {
                dimension: other.to_string(),
            }),
        }
    }
}

/// Sort key for aggregate rows. Row computation is sort-independent;
/// each consuming view picks its own key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Count,
    StoryPoints,
    AvgStoryPoints,
    CompletionRate,
}

impl SortKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::StoryPoints => "story-points",
            Self::AvgStoryPoints => "avg-story-points",
            Self::CompletionRate => "completion-rate",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = crate::error::LensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "count" => Ok(Self::Count),
            "story-points" | "points" | "sp" => Ok(Self::StoryPoints),
            "avg-story-points" | "avg-points" => Ok(Self::AvgStoryPoints),
            "completion-rate" | "completion" | "rate" => Ok(Self::CompletionRate),
            other => Err(crate::error::LensError::InvalidSortKey {
                key: other.to_string(),
            }),
        }
    }
}

/// One aggregate row per distinct group-by key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    /// Group identity (assignee name, label, type, or status).
    pub key: String,
    /// Issues in the group.
    pub count: usize,
    pub sum_story_points: f64,
    pub avg_story_points: f64,
    /// Sum over issues with a positive cycle time only.
    pub sum_cycle_time: i64,
    /// Averaged over issues with a positive cycle time only;
    /// unresolved issues stay in `count` but not in this denominator.
    pub avg_cycle_time: f64,
    pub completion_count: usize,
    /// Percentage in [0, 100]; 0 when the group is empty.
    pub completion_rate: f64,
}

/// Nearest-rank cycle-time percentiles over a filtered collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleTimePercentiles {
    pub p50: i64,
    pub p75: i64,
    pub p90: i64,
}

/// Per-assignee metrics nested inside a [`TrendBucket`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AssigneeTrend {
    pub created_in_month: usize,
    pub resolved_in_month: usize,
    pub avg_cycle_time: f64,
    /// Percentage, rounded to nearest integer.
    pub completion_rate: i64,
    pub avg_cycle_time_growth: i64,
    pub completion_rate_growth: i64,
}

/// One calendar-month cohort in the trend series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendBucket {
    /// `"YYYY-MM"` key; the series is sorted ascending on it.
    pub month: String,
    pub created_in_month: usize,
    pub resolved_in_month: usize,
    /// Mean cycle time over issues resolved in this month (positive
    /// cycle times only).
    pub avg_cycle_time: f64,
    /// `resolved / created * 100`, rounded; 0 when nothing was created.
    pub completion_rate: i64,
    /// Percent growth vs the previous bucket; 0 for the first bucket.
    pub avg_cycle_time_growth: i64,
    pub completion_rate_growth: i64,
    /// Per-assignee breakdown, present only when requested.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub assignees: BTreeMap<String, AssigneeTrend>,
}
