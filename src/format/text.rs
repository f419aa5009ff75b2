//! Text formatting functions for `issuelens`.
//!
//! Plain text (non-ANSI) rendering for terminal output: issue lines
//! for the list view and aligned tables for the analytics views.
//! Alignment uses display width, not byte length, so CJK assignee
//! names and labels line up.

use unicode_width::UnicodeWidthStr;

use issuelens_lib::{AggregateRow, CycleTimePercentiles, Issue, TrendBucket};

/// Format a single-line issue summary.
///
/// Format: `{id} [{status}] [{type}] {summary} ({assignee})`
#[must_use]
pub fn format_issue_line(issue: &Issue) -> String {
    format!(
        "{} [{}] [{}] {} ({})",
        issue.id, issue.status, issue.issue_type, issue.summary, issue.assignee,
    )
}

/// Render aggregate rows as an aligned table.
#[must_use]
pub fn render_aggregate_table(rows: &[AggregateRow]) -> String {
    let header = [
        "KEY", "COUNT", "POINTS", "AVG PTS", "AVG CYCLE", "DONE", "DONE %",
    ];
    let body: Vec<[String; 7]> = rows
        .iter()
        .map(|row| {
            [
                row.key.clone(),
                row.count.to_string(),
                format!("{:.1}", row.sum_story_points),
                format!("{:.1}", row.avg_story_points),
                format!("{:.1}", row.avg_cycle_time),
                row.completion_count.to_string(),
                format!("{:.0}%", row.completion_rate),
            ]
        })
        .collect();
    render_table(&header, &body)
}

/// Render the monthly trend series as an aligned table.
#[must_use]
pub fn render_trend_table(buckets: &[TrendBucket]) -> String {
    let header = [
        "MONTH", "CREATED", "RESOLVED", "AVG CYCLE", "DONE %", "CYCLE \u{394}%", "DONE \u{394}%",
    ];
    let body: Vec<[String; 7]> = buckets
        .iter()
        .map(|b| {
            [
                b.month.clone(),
                b.created_in_month.to_string(),
                b.resolved_in_month.to_string(),
                format!("{:.1}", b.avg_cycle_time),
                format!("{}%", b.completion_rate),
                format!("{:+}%", b.avg_cycle_time_growth),
                format!("{:+}%", b.completion_rate_growth),
            ]
        })
        .collect();
    render_table(&header, &body)
}

/// Render cycle-time percentiles as a short block.
#[must_use]
pub fn render_percentiles(p: &CycleTimePercentiles) -> String {
    format!(
        "P50: {} day(s)\nP75: {} day(s)\nP90: {} day(s)",
        p.p50, p.p75, p.p90
    )
}

/// Align columns by display width. First column left-aligned, the
/// rest right-aligned (they are all numeric).
fn render_table<const N: usize>(header: &[&str; N], body: &[[String; N]]) -> String {
    let mut widths: [usize; N] = [0; N];
    for (i, h) in header.iter().enumerate() {
        widths[i] = h.width();
    }
    for row in body {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.width());
        }
    }

    let mut out = String::new();
    render_row(&mut out, header.map(String::from).iter(), &widths);
    for row in body {
        render_row(&mut out, row.iter(), &widths);
    }
    out
}

fn render_row<'a, const N: usize>(
    out: &mut String,
    cells: impl Iterator<Item = &'a String>,
    widths: &[usize; N],
) {
    let mut first = true;
    for (i, cell) in cells.enumerate() {
        if !first {
            out.push_str("  ");
        }
        let pad = widths[i].saturating_sub(cell.width());
        if first {
            out.push_str(cell);
            out.push_str(&" ".repeat(pad));
            first = false;
        } else {
            out.push_str(&" ".repeat(pad));
            out.push_str(cell);
        }
    }
    // Trailing spaces on the last column serve no one.
    while out.ends_with(' ') {
        out.pop();
    }
    out.push('\n');
}
