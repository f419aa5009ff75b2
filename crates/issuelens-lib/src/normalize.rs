//! Normalizer: raw source records to canonical [`Issue`]s.
//!
//! The raw side of the boundary is a loosely-typed bag
//! (`serde_json::Value`); narrowing happens here and nowhere else.
//! A malformed record yields `None` and is silently dropped by the
//! caller so one bad record cannot abort an entire import.

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::model::{Issue, UNASSIGNED};

/// Milliseconds per day, the cycle-time bucket size.
const MS_PER_DAY: i64 = 86_400_000;

/// Known story-point field identifiers, tried in order. Which physical
/// field encodes story points varies per project configuration, hence
/// the list and the heuristic fallback below.
const KNOWN_STORY_POINT_FIELDS: [&str; 6] = [
    "customfield_10016",
    "customfield_10026",
    "customfield_10002",
    "customfield_10004",
    "storyPoints",
    "story_points",
];

/// Heuristic story points must fall in this half-open range.
const HEURISTIC_MAX_POINTS: f64 = 100.0;

static CUSTOM_FIELD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^customfield_\d+$").unwrap_or_else(|_| unreachable!()));

/// Normalize a raw source record into a canonical [`Issue`].
///
/// Returns `None` when the record lacks a string key/id or a fields
/// object. Every other field is defaulted; this function never panics
/// on issue-shaped input.
#[must_use]
pub fn normalize(raw: &Value) -> Option<Issue> {
    let id = raw
        .get("key")
        .and_then(Value::as_str)
        .or_else(|| raw.get("id").and_then(Value::as_str))?
        .to_string();

    let fields = raw.get("fields")?.as_object()?;

    // Unparseable creation timestamp rejects the record; everything
    // downstream assumes `created` is present.
    let created = fields
        .get("created")
        .and_then(Value::as_str)
        .and_then(parse_timestamp)?;

    let resolved = fields
        .get("resolutiondate")
        .or_else(|| fields.get("resolved"))
        .and_then(Value::as_str)
        .and_then(parse_timestamp);

    let cycle_time = resolved.map_or(0, |r| cycle_days(created, r));

    let summary = string_field(fields, "summary").unwrap_or_else(|| "No summary".to_string());
    let issue_type = nested_name(fields, "issuetype").unwrap_or_else(|| "Unknown".to_string());
    let status = nested_name(fields, "status").unwrap_or_else(|| "Unknown".to_string());

    let assignee = fields
        .get("assignee")
        .and_then(|a| a.get("displayName"))
        .and_then(Value::as_str)
        .map_or_else(|| UNASSIGNED.to_string(), ToString::to_string);

    let project = fields
        .get("project")
        .and_then(|p| p.get("key"))
        .and_then(Value::as_str)
        .map_or_else(|| project_from_id(&id), ToString::to_string);

    let labels = fields
        .get("labels")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default();

    Some(Issue {
        id,
        summary,
        issue_type,
        status,
        labels,
        story_points: resolve_story_points(fields),
        cycle_time,
        lead_time: cycle_time,
        created,
        resolved,
        assignee,
        project,
    })
}

/// Resolve story points from a fields bag, first-match-wins:
/// known field identifiers, then a heuristic scan over custom fields.
///
/// The heuristic accepts the first `customfield_N` holding a number in
/// `(0, 100]`. It can misattribute an unrelated numeric custom field;
/// the range bound is what keeps that tolerable.
#[must_use]
pub fn resolve_story_points(fields: &Map<String, Value>) -> f64 {
    for name in KNOWN_STORY_POINT_FIELDS {
        if let Some(points) = fields.get(name).and_then(numeric_value) {
            if points > 0.0 {
                return points;
            }
        }
    }

    for (name, value) in fields {
        if !CUSTOM_FIELD_RE.is_match(name) {
            continue;
        }
        if let Some(points) = numeric_value(value) {
            if points > 0.0 && points <= HEURISTIC_MAX_POINTS {
                tracing::debug!(field = %name, points, "story points resolved heuristically");
                return points;
            }
        }
    }

    0.0
}

/// Whole days between two timestamps, rounded up. Never negative,
/// even when the source carries a resolution before the creation.
#[must_use]
pub fn cycle_days(created: DateTime<Utc>, resolved: DateTime<Utc>) -> i64 {
    let ms = (resolved - created).num_milliseconds().unsigned_abs();
    (ms.div_ceil(MS_PER_DAY as u64) as i64).max(0)
}

/// Parse a source timestamp: RFC 3339, the Jira `+0000` offset
/// variant, or a bare date (midnight UTC).
#[must_use]
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.3f%z", "%Y-%m-%dT%H:%M:%S%z"] {
        if let Ok(ts) = DateTime::parse_from_str(s, fmt) {
            return Some(ts.with_timezone(&Utc));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Coerce a field to an owned string, accepting numbers as well.
fn string_field(fields: &Map<String, Value>, name: &str) -> Option<String> {
    match fields.get(name)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Extract `fields[name].name`, the shape Jira uses for type/status.
/// A plain string is accepted too.
fn nested_name(fields: &Map<String, Value>, name: &str) -> Option<String> {
    match fields.get(name)? {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj
            .get("name")
            .and_then(Value::as_str)
            .map(ToString::to_string),
        _ => None,
    }
}

/// Numeric coercion: JSON numbers, plus numeric strings.
fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn project_from_id(id: &str) -> String {
    id.split('-').next().unwrap_or(id).to_string()
}
