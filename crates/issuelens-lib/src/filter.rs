//! Filter layer: pure predicates over the canonical collection.
//!
//! Conjunctive across fields, disjunctive within a multi-value field.
//! An empty `Vec` is the uniform "no constraint" representation, so
//! predicate logic never branches on single-vs-multi value.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Issue;

/// Inclusive date bounds; `None` on either side means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    fn contains(&self, ts: DateTime<Utc>) -> bool {
        let date = ts.date_naive();
        if let Some(start) = self.start {
            if date < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if date > end {
                return false;
            }
        }
        true
    }
}

/// Which timestamps the date range applies to. The consuming views
/// diverge here; the divergence is preserved as an explicit mode
/// rather than unified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateMode {
    /// Range applies to the creation date only.
    #[default]
    Created,
    /// Both creation and resolution must fall in range; an unresolved
    /// issue cannot satisfy a bounded range in this mode.
    CreatedAndResolved,
}

/// User-selected filter configuration. Empty vectors mean
/// "no constraint"; so does an unbounded date range.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Filter {
    #[serde(default)]
    pub issue_types: Vec<String>,
    #[serde(default)]
    pub statuses: Vec<String>,
    #[serde(default)]
    pub assignees: Vec<String>,
    /// ANY-match: the issue passes if it shares at least one label.
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub date_range: DateRange,
    #[serde(default)]
    pub date_mode: DateMode,
}

impl Filter {
    /// Whether a single issue satisfies every constraint.
    #[must_use]
    pub fn matches(&self, issue: &Issue) -> bool {
        if !self.issue_types.is_empty() && !self.issue_types.contains(&issue.issue_type) {
            return false;
        }
        if !self.statuses.is_empty() && !self.statuses.contains(&issue.status) {
            return false;
        }
        if !self.assignees.is_empty() && !self.assignees.contains(&issue.assignee) {
            return false;
        }
        if !self.labels.is_empty()
            && !issue.labels.iter().any(|label| self.labels.contains(label))
        {
            return false;
        }
        if !self.date_range.is_unbounded() {
            match self.date_mode {
                DateMode::Created => {
                    if !self.date_range.contains(issue.created) {
                        return false;
                    }
                }
                DateMode::CreatedAndResolved => {
                    if !self.date_range.contains(issue.created) {
                        return false;
                    }
                    if !issue.resolved.is_some_and(|r| self.date_range.contains(r)) {
                        return false;
                    }
                }
            }
        }
        true
    }
}

/// Apply a filter to a collection.
///
/// Pure: never mutates input, returns a new vector, preserves the
/// input's relative order.
#[must_use]
pub fn apply_filters(issues: &[Issue], filter: &Filter) -> Vec<Issue> {
    issues
        .iter()
        .filter(|issue| filter.matches(issue))
        .cloned()
        .collect()
}
