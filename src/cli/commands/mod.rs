//! Command implementations.

pub mod import;
pub mod list;
pub mod percentiles;
pub mod session;
pub mod stats;
pub mod trend;
pub mod version;

use anyhow::Result;

use issuelens_lib::{
    DateMode, DateRange, Filter, Issue, LensError, SessionStore, apply_filters,
};

use crate::cli::{FilterArgs, QueryArgs};
use crate::config::Config;

/// Resolve the session name: flag value, else config default.
fn resolve_session<'a>(config: &'a Config, flag: Option<&'a str>) -> &'a str {
    flag.unwrap_or(&config.default_session)
}

/// Load a session's cached issues, failing with a hint when the cache
/// is missing or has expired.
fn load_session(config: &Config, session: &str) -> Result<Vec<Issue>> {
    let store = config.session_store();
    match store.load(session)? {
        Some(issues) => Ok(issues),
        None => Err(LensError::SessionMissing {
            session: session.to_string(),
        }
        .into()),
    }
}

/// Convert CLI filter flags to the engine filter.
fn build_filter(args: &FilterArgs) -> Filter {
    Filter {
        issue_types: args.type_.clone(),
        statuses: args.status.clone(),
        assignees: args.assignee.clone(),
        labels: args.label.clone(),
        date_range: DateRange {
            start: args.from,
            end: args.to,
        },
        date_mode: if args.resolved_in_range {
            DateMode::CreatedAndResolved
        } else {
            DateMode::Created
        },
    }
}

/// Load, then filter: the shared front half of every analytics
/// command.
fn load_filtered(config: &Config, query: &QueryArgs) -> Result<Vec<Issue>> {
    let session = resolve_session(config, query.session.as_deref());
    let issues = load_session(config, session)?;
    Ok(apply_filters(&issues, &build_filter(&query.filter)))
}
