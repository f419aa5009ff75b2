//! Trend builder: calendar-month cohorts with growth rates.
//!
//! An issue with both timestamps contributes twice: once to its
//! creation-month bucket and once to its resolution-month bucket.
//! Issues missing a resolution are excluded from trends entirely.
//! Buckets are keyed `"YYYY-MM"` in UTC; lexicographic order is
//! chronological order for that shape.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};

use crate::model::{AssigneeTrend, Issue, TrendBucket};

#[derive(Default)]
struct Cohort {
    created: usize,
    resolved: usize,
    cycle_sum: i64,
    cycle_count: usize,
}

impl Cohort {
    fn avg_cycle_time(&self) -> f64 {
        if self.cycle_count == 0 {
            0.0
        } else {
            self.cycle_sum as f64 / self.cycle_count as f64
        }
    }

    // Clamped at 100: a month can resolve more than it created when
    // backlog from earlier months lands in it.
    fn completion_rate(&self) -> i64 {
        if self.created == 0 {
            0
        } else {
            (self.resolved as f64 / self.created as f64 * 100.0)
                .round()
                .min(100.0) as i64
        }
    }
}

#[derive(Default)]
struct BucketAccum {
    overall: Cohort,
    per_assignee: BTreeMap<String, Cohort>,
}

/// Format a timestamp as a `"YYYY-MM"` bucket key.
#[must_use]
pub fn month_key(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m").to_string()
}

/// Month-over-month percent growth.
///
/// `previous == 0` with a positive current is defined as exactly 100
/// so neither NaN nor infinity ever reaches a consumer; both zero is 0.
fn growth(previous: f64, current: f64) -> i64 {
    if previous == 0.0 {
        if current > 0.0 { 100 } else { 0 }
    } else {
        ((current - previous) / previous * 100.0).round() as i64
    }
}

/// Build the monthly trend series for a collection.
///
/// When `assignees` is non-empty each bucket carries a per-assignee
/// breakdown with the same base metrics and growths; requested
/// assignees with no activity still appear with zeroed metrics in
/// every bucket.
#[must_use]
pub fn build_monthly_trend(issues: &[Issue], assignees: &[String]) -> Vec<TrendBucket> {
    let tracked: BTreeSet<&String> = assignees.iter().collect();
    let mut buckets: BTreeMap<String, BucketAccum> = BTreeMap::new();

    for issue in issues {
        let Some(resolved) = issue.resolved else {
            continue;
        };

        let created_key = month_key(issue.created);
        let resolved_key = month_key(resolved);
        let track = tracked.contains(&issue.assignee);

        {
            let bucket = buckets.entry(created_key).or_default();
            bucket.overall.created += 1;
            if track {
                bucket
                    .per_assignee
                    .entry(issue.assignee.clone())
                    .or_default()
                    .created += 1;
            }
        }

        let bucket = buckets.entry(resolved_key).or_default();
        bucket.overall.resolved += 1;
        if issue.has_cycle_time() {
            bucket.overall.cycle_sum += issue.cycle_time;
            bucket.overall.cycle_count += 1;
        }
        if track {
            let cohort = bucket
                .per_assignee
                .entry(issue.assignee.clone())
                .or_default();
            cohort.resolved += 1;
            if issue.has_cycle_time() {
                cohort.cycle_sum += issue.cycle_time;
                cohort.cycle_count += 1;
            }
        }
    }

    // Requested assignees appear in every bucket, active or not.
    for bucket in buckets.values_mut() {
        for name in &tracked {
            bucket.per_assignee.entry((*name).clone()).or_default();
        }
    }

    let mut series: Vec<TrendBucket> = Vec::with_capacity(buckets.len());
    let mut prev_overall: Option<(f64, i64)> = None;
    let mut prev_assignee: BTreeMap<String, (f64, i64)> = BTreeMap::new();

    for (month, accum) in buckets {
        let avg_cycle_time = accum.overall.avg_cycle_time();
        let completion_rate = accum.overall.completion_rate();
        let (avg_growth, rate_growth) = prev_overall.map_or((0, 0), |(prev_avg, prev_rate)| {
            (
                growth(prev_avg, avg_cycle_time),
                growth(prev_rate as f64, completion_rate as f64),
            )
        });
        prev_overall = Some((avg_cycle_time, completion_rate));

        let mut per_assignee = BTreeMap::new();
        for (name, cohort) in accum.per_assignee {
            let avg = cohort.avg_cycle_time();
            let rate = cohort.completion_rate();
            let (a_growth, r_growth) =
                prev_assignee
                    .get(&name)
                    .map_or((0, 0), |&(prev_avg, prev_rate)| {
                        (growth(prev_avg, avg), growth(prev_rate as f64, rate as f64))
                    });
            prev_assignee.insert(name.clone(), (avg, rate));
            per_assignee.insert(
                name,
                AssigneeTrend {
                    created_in_month: cohort.created,
                    resolved_in_month: cohort.resolved,
                    avg_cycle_time: avg,
                    completion_rate: rate,
                    avg_cycle_time_growth: a_growth,
                    completion_rate_growth: r_growth,
                },
            );
        }

        series.push(TrendBucket {
            month,
            created_in_month: accum.overall.created,
            resolved_in_month: accum.overall.resolved,
            avg_cycle_time,
            completion_rate,
            avg_cycle_time_growth: avg_growth,
            completion_rate_growth: rate_growth,
            assignees: per_assignee,
        });
    }

    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{cycle_days, parse_timestamp};

    fn make_issue(id: &str, assignee: &str, created: &str, resolved: Option<&str>) -> Issue {
        let created = parse_timestamp(created).unwrap();
        let resolved = resolved.map(|r| parse_timestamp(r).unwrap());
        let cycle_time = resolved.map_or(0, |r| cycle_days(created, r));
        Issue {
            id: id.to_string(),
            summary: format!("Issue {id}"),
            issue_type: "Story".to_string(),
            status: "Done".to_string(),
            labels: vec![],
            story_points: 1.0,
            cycle_time,
            lead_time: cycle_time,
            created,
            resolved,
            assignee: assignee.to_string(),
            project: "P".to_string(),
        }
    }

    #[test]
    fn test_issue_contributes_to_two_buckets() {
        let issues = vec![make_issue(
            "P-1",
            "Ana",
            "2024-01-20T00:00:00Z",
            Some("2024-02-05T00:00:00Z"),
        )];
        let series = build_monthly_trend(&issues, &[]);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].month, "2024-01");
        assert_eq!(series[0].created_in_month, 1);
        assert_eq!(series[0].resolved_in_month, 0);
        assert_eq!(series[1].month, "2024-02");
        assert_eq!(series[1].created_in_month, 0);
        assert_eq!(series[1].resolved_in_month, 1);
    }

    #[test]
    fn test_unresolved_issues_excluded_entirely() {
        let issues = vec![make_issue("P-1", "Ana", "2024-01-20T00:00:00Z", None)];
        let series = build_monthly_trend(&issues, &[]);
        assert!(series.is_empty());
    }

    #[test]
    fn test_buckets_sorted_chronologically() {
        let issues = vec![
            make_issue(
                "P-1",
                "Ana",
                "2024-03-01T00:00:00Z",
                Some("2024-03-02T00:00:00Z"),
            ),
            make_issue(
                "P-2",
                "Ana",
                "2023-11-01T00:00:00Z",
                Some("2023-12-02T00:00:00Z"),
            ),
        ];
        let series = build_monthly_trend(&issues, &[]);
        let months: Vec<&str> = series.iter().map(|b| b.month.as_str()).collect();
        assert_eq!(months, vec!["2023-11", "2023-12", "2024-03"]);
    }

    #[test]
    fn test_completion_rate_rounded_and_guarded() {
        // Three created in January, one of them resolved in January.
        let issues = vec![
            make_issue(
                "P-1",
                "Ana",
                "2024-01-01T00:00:00Z",
                Some("2024-01-10T00:00:00Z"),
            ),
            make_issue(
                "P-2",
                "Ana",
                "2024-01-02T00:00:00Z",
                Some("2024-02-10T00:00:00Z"),
            ),
            make_issue(
                "P-3",
                "Ana",
                "2024-01-03T00:00:00Z",
                Some("2024-02-11T00:00:00Z"),
            ),
        ];
        let series = build_monthly_trend(&issues, &[]);
        let january = &series[0];
        assert_eq!(january.completion_rate, 33); // round(1/3 * 100)
        let february = &series[1];
        // Nothing created in February: rate guarded to 0, not NaN.
        assert_eq!(february.created_in_month, 0);
        assert_eq!(february.completion_rate, 0);
    }

    #[test]
    fn test_growth_from_zero_is_exactly_100() {
        // First month's resolution has cycle time 0 (same-day), the
        // second month's has 5: avg goes 0 -> 5, growth must be 100.
        let issues = vec![
            make_issue(
                "P-1",
                "Ana",
                "2024-01-10T00:00:00Z",
                Some("2024-01-10T00:00:00Z"),
            ),
            make_issue(
                "P-2",
                "Ana",
                "2024-02-05T00:00:00Z",
                Some("2024-02-10T00:00:00Z"),
            ),
        ];
        let series = build_monthly_trend(&issues, &[]);
        assert_eq!(series.len(), 2);
        assert!(series[0].avg_cycle_time.abs() < f64::EPSILON);
        assert!((series[1].avg_cycle_time - 5.0).abs() < f64::EPSILON);
        assert_eq!(series[1].avg_cycle_time_growth, 100);
    }

    #[test]
    fn test_first_bucket_growth_is_zero() {
        let issues = vec![make_issue(
            "P-1",
            "Ana",
            "2024-01-01T00:00:00Z",
            Some("2024-01-06T00:00:00Z"),
        )];
        let series = build_monthly_trend(&issues, &[]);
        assert_eq!(series[0].avg_cycle_time_growth, 0);
        assert_eq!(series[0].completion_rate_growth, 0);
    }

    #[test]
    fn test_growth_regular_computation() {
        // avg cycle time 4 in January, 6 in February: +50%.
        let issues = vec![
            make_issue(
                "P-1",
                "Ana",
                "2024-01-01T00:00:00Z",
                Some("2024-01-05T00:00:00Z"),
            ),
            make_issue(
                "P-2",
                "Ana",
                "2024-02-01T00:00:00Z",
                Some("2024-02-07T00:00:00Z"),
            ),
        ];
        let series = build_monthly_trend(&issues, &[]);
        assert_eq!(series[1].avg_cycle_time_growth, 50);
    }

    #[test]
    fn test_assignee_breakdown() {
        let issues = vec![
            make_issue(
                "P-1",
                "Ana",
                "2024-01-01T00:00:00Z",
                Some("2024-01-05T00:00:00Z"),
            ),
            make_issue(
                "P-2",
                "Bruno",
                "2024-01-02T00:00:00Z",
                Some("2024-01-09T00:00:00Z"),
            ),
        ];
        let series = build_monthly_trend(&issues, &["Ana".to_string()]);
        let bucket = &series[0];
        assert_eq!(bucket.assignees.len(), 1);
        let ana = &bucket.assignees["Ana"];
        assert_eq!(ana.created_in_month, 1);
        assert_eq!(ana.resolved_in_month, 1);
        assert!((ana.avg_cycle_time - 4.0).abs() < f64::EPSILON);
        // Bruno was not requested and has no entry.
        assert!(!bucket.assignees.contains_key("Bruno"));
    }

    #[test]
    fn test_requested_assignee_without_activity_gets_zeroed_entry() {
        let issues = vec![make_issue(
            "P-1",
            "Ana",
            "2024-01-01T00:00:00Z",
            Some("2024-01-05T00:00:00Z"),
        )];
        let series = build_monthly_trend(&issues, &["Ghost".to_string()]);
        let ghost = &series[0].assignees["Ghost"];
        assert_eq!(ghost.created_in_month, 0);
        assert_eq!(ghost.resolved_in_month, 0);
        assert!(ghost.avg_cycle_time.abs() < f64::EPSILON);
        assert_eq!(ghost.completion_rate, 0);
    }

    #[test]
    fn test_no_breakdown_when_not_requested() {
        let issues = vec![make_issue(
            "P-1",
            "Ana",
            "2024-01-01T00:00:00Z",
            Some("2024-01-05T00:00:00Z"),
        )];
        let series = build_monthly_trend(&issues, &[]);
        assert!(series[0].assignees.is_empty());
    }

    #[test]
    fn test_completion_rate_bounds_in_buckets() {
        let issues = vec![
            make_issue(
                "P-1",
                "Ana",
                "2024-01-01T00:00:00Z",
                Some("2024-01-05T00:00:00Z"),
            ),
            make_issue(
                "P-2",
                "Ana",
                "2024-01-02T00:00:00Z",
                Some("2024-01-09T00:00:00Z"),
            ),
        ];
        for bucket in build_monthly_trend(&issues, &[]) {
            assert!(bucket.completion_rate >= 0);
            assert!(bucket.completion_rate <= 100);
        }
    }
}
