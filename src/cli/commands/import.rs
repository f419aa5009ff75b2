//! Import command implementation.
//!
//! Reads a raw export, normalizes it, and caches the result under a
//! session name for the analytics commands to query.

use anyhow::Result;

use issuelens_lib::SessionStore;
use issuelens_lib::ingest::{IMPORT_CAP, load_raw, normalize_all};

use crate::cli::ImportArgs;
use crate::config::Config;
use crate::format::ImportSummary;

use super::resolve_session;

/// Execute the import command.
///
/// # Errors
///
/// Returns an error if the export cannot be read or parsed, or the
/// session cache cannot be written.
pub fn execute(config: &Config, args: &ImportArgs, json: bool) -> Result<()> {
    let raw = load_raw(&args.file)?;
    let issues = normalize_all(&raw);

    let session = resolve_session(config, args.session.as_deref());
    let store = config.session_store();
    store.save(session, &issues)?;

    let capped = raw.len() > IMPORT_CAP;
    let summary = ImportSummary {
        session: session.to_string(),
        file: args.file.display().to_string(),
        total_records: raw.len(),
        imported: issues.len(),
        dropped: raw.len().min(IMPORT_CAP) - issues.len(),
        capped,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Imported {} issue(s) into session '{}' ({} record(s) in export, {} dropped)",
            summary.imported, summary.session, summary.total_records, summary.dropped
        );
        if capped {
            println!("Note: export exceeded the {IMPORT_CAP}-record cap and was truncated.");
        }
    }

    Ok(())
}
