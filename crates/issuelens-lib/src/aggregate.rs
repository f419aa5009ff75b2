//! Aggregator: per-dimension rollups and cycle-time percentiles.
//!
//! Consumes a (usually pre-filtered) collection and produces one
//! [`AggregateRow`] per distinct key. Rows are recomputed on demand
//! and never persisted.

use std::collections::BTreeMap;

use crate::model::{AggregateRow, CycleTimePercentiles, Dimension, Issue, SortKey};

#[derive(Default)]
struct Accum {
    count: usize,
    sum_story_points: f64,
    sum_cycle_time: i64,
    cycle_time_count: usize,
    completion_count: usize,
}

impl Accum {
    fn add(&mut self, issue: &Issue) {
        self.count += 1;
        self.sum_story_points += issue.story_points;
        if issue.has_cycle_time() {
            self.sum_cycle_time += issue.cycle_time;
            self.cycle_time_count += 1;
        }
        if issue.is_completed() {
            self.completion_count += 1;
        }
    }

    fn into_row(self, key: String) -> AggregateRow {
        let avg_story_points = if self.count == 0 {
            0.0
        } else {
            self.sum_story_points / self.count as f64
        };
        let avg_cycle_time = if self.cycle_time_count == 0 {
            0.0
        } else {
            self.sum_cycle_time as f64 / self.cycle_time_count as f64
        };
        let completion_rate = if self.count == 0 {
            0.0
        } else {
            self.completion_count as f64 / self.count as f64 * 100.0
        };
        AggregateRow {
            key,
            count: self.count,
            sum_story_points: self.sum_story_points,
            avg_story_points,
            sum_cycle_time: self.sum_cycle_time,
            avg_cycle_time,
            completion_count: self.completion_count,
            completion_rate,
        }
    }
}

/// Group issues by a dimension and compute per-group statistics.
///
/// An issue contributes to exactly one row, except for the label
/// dimension where it contributes to every row matching its labels.
/// Rows come back sorted by count descending (ties broken by key
/// ascending for deterministic output); re-sort with [`sort_rows`].
#[must_use]
pub fn aggregate_by(issues: &[Issue], dimension: Dimension) -> Vec<AggregateRow> {
    let mut groups: BTreeMap<String, Accum> = BTreeMap::new();

    for issue in issues {
        match dimension {
            Dimension::Assignee => groups.entry(issue.assignee.clone()).or_default().add(issue),
            Dimension::IssueType => groups
                .entry(issue.issue_type.clone())
                .or_default()
                .add(issue),
            Dimension::Status => groups.entry(issue.status.clone()).or_default().add(issue),
            Dimension::Label => {
                for label in &issue.labels {
                    groups.entry(label.clone()).or_default().add(issue);
                }
            }
        }
    }

    let mut rows: Vec<AggregateRow> = groups
        .into_iter()
        .map(|(key, accum)| accum.into_row(key))
        .collect();
    sort_rows(&mut rows, SortKey::Count);
    rows
}

/// Re-sort aggregate rows by the view's chosen metric, descending,
/// ties broken by key ascending.
pub fn sort_rows(rows: &mut [AggregateRow], key: SortKey) {
    rows.sort_by(|a, b| {
        let ord = match key {
            SortKey::Count => b.count.cmp(&a.count),
            SortKey::StoryPoints => b.sum_story_points.total_cmp(&a.sum_story_points),
            SortKey::AvgStoryPoints => b.avg_story_points.total_cmp(&a.avg_story_points),
            SortKey::CompletionRate => b.completion_rate.total_cmp(&a.completion_rate),
        };
        ord.then_with(|| a.key.cmp(&b.key))
    });
}

/// Nearest-rank percentile: the value at index `floor(N * p / 100)` of
/// the ascending-sorted slice, no interpolation. Returns 0 for an
/// empty slice.
#[must_use]
pub fn percentile(sorted: &[i64], p: u8) -> i64 {
    if sorted.is_empty() {
        return 0;
    }
    let idx = (sorted.len() * usize::from(p) / 100).min(sorted.len() - 1);
    sorted[idx]
}

/// P50/P75/P90 over the positive cycle times in a collection.
/// Unresolved issues (cycle time 0) do not participate.
#[must_use]
pub fn cycle_time_percentiles(issues: &[Issue]) -> CycleTimePercentiles {
    let mut times: Vec<i64> = issues
        .iter()
        .filter(|i| i.has_cycle_time())
        .map(|i| i.cycle_time)
        .collect();
    times.sort_unstable();

    CycleTimePercentiles {
        p50: percentile(&times, 50),
        p75: percentile(&times, 75),
        p90: percentile(&times, 90),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::parse_timestamp;

    fn make_issue(id: &str, assignee: &str, points: f64, cycle: i64, status: &str) -> Issue {
        let created = parse_timestamp("2024-01-01T00:00:00Z").unwrap();
        Issue {
            id: id.to_string(),
            summary: format!("Issue {id}"),
            issue_type: "Story".to_string(),
            status: status.to_string(),
            labels: vec![],
            story_points: points,
            cycle_time: cycle,
            lead_time: cycle,
            created,
            resolved: (cycle > 0).then(|| created + chrono::Duration::days(cycle)),
            assignee: assignee.to_string(),
            project: "P".to_string(),
        }
    }

    #[test]
    fn test_end_to_end_scenario() {
        // One resolved and one open issue for Ana.
        let issues = vec![
            make_issue("P-1", "Ana", 5.0, 10, "Done"),
            make_issue("P-2", "Ana", 3.0, 0, "To Do"),
        ];
        let rows = aggregate_by(&issues, Dimension::Assignee);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.key, "Ana");
        assert_eq!(row.count, 2);
        assert!((row.sum_story_points - 8.0).abs() < f64::EPSILON);
        assert!((row.avg_cycle_time - 10.0).abs() < f64::EPSILON);
        assert_eq!(row.completion_count, 1);
        assert!((row.completion_rate - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_count_conservation_single_membership() {
        let issues = vec![
            make_issue("P-1", "Ana", 1.0, 2, "Done"),
            make_issue("P-2", "Bruno", 2.0, 0, "To Do"),
            make_issue("P-3", "Ana", 3.0, 4, "Done"),
            make_issue("P-4", "Carla", 5.0, 0, "In Progress"),
        ];
        let rows = aggregate_by(&issues, Dimension::Assignee);
        let total: usize = rows.iter().map(|r| r.count).sum();
        assert_eq!(total, issues.len());
    }

    #[test]
    fn test_label_multi_membership() {
        let mut issue = make_issue("P-1", "Ana", 1.0, 2, "Done");
        issue.labels = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let rows = aggregate_by(&[issue], Dimension::Label);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.count == 1));
    }

    #[test]
    fn test_unlabeled_issue_contributes_nowhere_in_label_dimension() {
        let issue = make_issue("P-1", "Ana", 1.0, 2, "Done");
        let rows = aggregate_by(&[issue], Dimension::Label);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_avg_cycle_time_excludes_unresolved() {
        let issues = vec![
            make_issue("P-1", "Ana", 0.0, 6, "Done"),
            make_issue("P-2", "Ana", 0.0, 0, "To Do"),
            make_issue("P-3", "Ana", 0.0, 2, "Done"),
        ];
        let rows = aggregate_by(&issues, Dimension::Assignee);
        assert!((rows[0].avg_cycle_time - 4.0).abs() < f64::EPSILON);
        assert_eq!(rows[0].count, 3);
    }

    #[test]
    fn test_terminal_status_counts_as_completed_without_resolution() {
        let issues = vec![make_issue("P-1", "Ana", 0.0, 0, "Closed")];
        let rows = aggregate_by(&issues, Dimension::Assignee);
        assert_eq!(rows[0].completion_count, 1);
        assert!((rows[0].completion_rate - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_completion_rate_bounds() {
        let issues = vec![
            make_issue("P-1", "Ana", 1.0, 2, "Done"),
            make_issue("P-2", "Ana", 1.0, 0, "To Do"),
            make_issue("P-3", "Bruno", 1.0, 1, "Done"),
        ];
        for dim in [Dimension::Assignee, Dimension::Status, Dimension::IssueType] {
            for row in aggregate_by(&issues, dim) {
                assert!(row.completion_rate >= 0.0 && row.completion_rate <= 100.0);
            }
        }
    }

    #[test]
    fn test_default_sort_count_desc_key_asc() {
        let issues = vec![
            make_issue("P-1", "Bruno", 1.0, 1, "Done"),
            make_issue("P-2", "Ana", 1.0, 1, "Done"),
            make_issue("P-3", "Ana", 1.0, 1, "Done"),
            make_issue("P-4", "Carla", 1.0, 1, "Done"),
        ];
        let rows = aggregate_by(&issues, Dimension::Assignee);
        let keys: Vec<&str> = rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["Ana", "Bruno", "Carla"]);
    }

    #[test]
    fn test_sort_rows_by_story_points() {
        let issues = vec![
            make_issue("P-1", "Ana", 2.0, 1, "Done"),
            make_issue("P-2", "Bruno", 8.0, 1, "Done"),
        ];
        let mut rows = aggregate_by(&issues, Dimension::Assignee);
        sort_rows(&mut rows, SortKey::StoryPoints);
        assert_eq!(rows[0].key, "Bruno");
    }

    #[test]
    fn test_percentile_nearest_rank() {
        let times: Vec<i64> = (1..=10).collect();
        assert_eq!(percentile(&times, 50), 6);
        assert_eq!(percentile(&times, 75), 8);
        assert_eq!(percentile(&times, 90), 10);
    }

    #[test]
    fn test_percentile_empty() {
        assert_eq!(percentile(&[], 50), 0);
    }

    #[test]
    fn test_cycle_time_percentiles_ignore_unresolved() {
        let mut issues: Vec<Issue> = (1..=10)
            .map(|d| make_issue(&format!("P-{d}"), "Ana", 1.0, d, "Done"))
            .collect();
        issues.push(make_issue("P-11", "Ana", 1.0, 0, "To Do"));

        let p = cycle_time_percentiles(&issues);
        assert_eq!(p.p50, 6);
        assert_eq!(p.p90, 10);
    }

    #[test]
    fn test_aggregate_empty_collection() {
        let rows = aggregate_by(&[], Dimension::Assignee);
        assert!(rows.is_empty());
    }
}
