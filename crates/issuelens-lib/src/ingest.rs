//! Raw-export ingestion: the import boundary ahead of the normalizer.
//!
//! The paginated network walk lives outside this crate; what arrives
//! here is its already-fetched output in one of a few shapes — a JSON
//! array of raw issues, a Jira-style search response with an `issues`
//! array, or JSONL pages of either. A cancelled walk produces a
//! partial collection, which is ingested like any other.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{LensError, Result};
use crate::model::Issue;
use crate::normalize::normalize;

/// Safety cap matching the import loop's accumulation limit.
pub const IMPORT_CAP: usize = 1000;

/// Read raw records from an export file.
///
/// # Errors
///
/// Returns `FileNotFound` when the path does not exist, `JsonlParse`
/// for a bad JSONL line, or `ExportFormat` for an unrecognized
/// top-level shape.
pub fn load_raw(path: &Path) -> Result<Vec<Value>> {
    let contents = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LensError::FileNotFound(path.to_path_buf())
        } else {
            LensError::Io(e)
        }
    })?;

    // Whole-document parse first; fall back to line-delimited pages.
    if let Ok(doc) = serde_json::from_str::<Value>(contents.trim()) {
        return flatten_document(doc);
    }

    let mut records = Vec::new();
    for (line_num, line) in contents.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let doc: Value = serde_json::from_str(trimmed).map_err(|e| LensError::JsonlParse {
            line: line_num + 1,
            reason: e.to_string(),
        })?;
        records.extend(flatten_document(doc)?);
    }
    Ok(records)
}

/// Unwrap one export document into raw issue records.
fn flatten_document(doc: Value) -> Result<Vec<Value>> {
    match doc {
        Value::Array(items) => Ok(items),
        Value::Object(mut obj) => {
            if let Some(Value::Array(items)) = obj.remove("issues") {
                Ok(items)
            } else if obj.contains_key("key") || obj.contains_key("id") {
                Ok(vec![Value::Object(obj)])
            } else {
                Err(LensError::ExportFormat {
                    reason: "object has neither an 'issues' array nor a key/id".to_string(),
                })
            }
        }
        other => Err(LensError::ExportFormat {
            reason: format!("expected array or object, got {other}"),
        }),
    }
}

/// Normalize a raw batch, dropping malformed records silently and
/// enforcing [`IMPORT_CAP`].
#[must_use]
pub fn normalize_all(raw: &[Value]) -> Vec<Issue> {
    let capped = if raw.len() > IMPORT_CAP {
        tracing::warn!(
            total = raw.len(),
            cap = IMPORT_CAP,
            "raw export exceeds import cap, truncating"
        );
        &raw[..IMPORT_CAP]
    } else {
        raw
    };

    let issues: Vec<Issue> = capped.iter().filter_map(normalize).collect();
    let dropped = capped.len() - issues.len();
    if dropped > 0 {
        tracing::debug!(dropped, "malformed records dropped during normalization");
    }
    issues
}

/// Convenience: read an export file and normalize it in one step.
///
/// # Errors
///
/// Propagates [`load_raw`] errors; normalization itself never fails.
pub fn ingest_file(path: &Path) -> Result<Vec<Issue>> {
    let raw = load_raw(path)?;
    Ok(normalize_all(&raw))
}
