//! `issuelens-lib` — In-process issue analytics engine.
//!
//! Transforms a flat collection of normalized issue records into the
//! derived datasets a dashboard consumes: per-dimension rollups,
//! cycle-time percentiles, and month-bucketed trend series. Every
//! transformation is a pure, stateless function over the same input
//! shape; invocations are independent and idempotent.
//!
//! # Quick Start
//!
//! ```no_run
//! use issuelens_lib::{Dimension, Filter, aggregate_by, apply_filters, ingest};
//!
//! let issues = ingest::ingest_file("export.json".as_ref()).unwrap();
//! let filter = Filter { statuses: vec!["Done".into()], ..Default::default() };
//! let rows = aggregate_by(&apply_filters(&issues, &filter), Dimension::Assignee);
//! ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod ingest;
pub mod model;
pub mod normalize;
pub mod session;
pub mod trend;

pub use aggregate::{aggregate_by, cycle_time_percentiles, percentile, sort_rows};
pub use error::{LensError, Result};
pub use filter::{DateMode, DateRange, Filter, apply_filters};
pub use model::{
    AggregateRow, AssigneeTrend, CycleTimePercentiles, Dimension, Issue, SortKey, TrendBucket,
    UNASSIGNED,
};
pub use normalize::normalize;
pub use session::{FileSessionStore, SessionInfo, SessionStore};
pub use trend::build_monthly_trend;
