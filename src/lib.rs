//! # jresults
//!
//! Aggregates JMeter load-test samples into per-label statistics and keeps a
//! durable history of runs.
//!
//! ## Pipeline
//!
//! 1. **Decode**: `sample` reads a JTL (CSV) export into [`Sample`] records
//! 2. **Aggregate**: `aggregate` groups samples by label and computes mean,
//!    sample standard deviation, median, 95th percentile and error rate for
//!    each label and for the run as a whole
//! 3. **Report**: `report` renders the result as a terminal table
//! 4. **Persist**: `store` upserts the encoded result keyed by the run's start
//!    time (RFC 3339, whole seconds)
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use jresults::{aggregate, ResultStore, Sample};
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let samples = vec![
//!         Sample::new(1_709_287_200_123, 100, "Home", true),
//!         Sample::new(1_709_287_200_456, 200, "Home", false),
//!         Sample::new(1_709_287_201_001, 50, "Login", true),
//!     ];
//!
//!     let result = aggregate(&samples)?;
//!     let store = ResultStore::open(Path::new("/tmp/jresults.db"))?;
//!     store.upsert(&result)?;
//!
//!     let stored = store.get(&result.key())?;
//!     assert_eq!(stored, result);
//!     Ok(())
//! }
//! ```

/// Grouping of samples by label and run-level aggregation
pub mod aggregate;

/// Command-line interface and environment binding
pub mod cli;

pub mod error;

/// Coloured stderr logging and optional log file
pub mod logging;

/// Per-group accumulators, summary statistics and estimators
pub mod metrics;

/// Terminal rendering of runs and stored keys
pub mod report;

/// The run aggregate and its canonical encoding
pub mod results;

/// JTL sample records and CSV decoding
pub mod sample;

/// Durable run history
pub mod store;

pub use aggregate::{aggregate, Aggregator};
pub use error::{Result, StatsError};
pub use metrics::{GroupSeries, GroupStat};
pub use results::RunResult;
pub use sample::Sample;
pub use store::ResultStore;

/// The current version of jresults
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build timestamp, set through `JRESULTS_BUILD_STAMP` at compile time.
pub const BUILD_STAMP: &str = match option_env!("JRESULTS_BUILD_STAMP") {
    Some(stamp) => stamp,
    None => "Not specified",
};

/// Commit the binary was built from, set through `JRESULTS_GIT_HASH` at compile time.
pub const GIT_HASH: &str = match option_env!("JRESULTS_GIT_HASH") {
    Some(hash) => hash,
    None => "Not specified",
};

/// Default configuration values
pub mod defaults {
    /// Default store location. A leading `~` is expanded at startup.
    pub const DB_FILE: &str = "~/.jresults.db";

    /// Name of the tree that holds stored runs
    pub const BUCKET: &str = "results";

    /// Label of the group that aggregates every sample
    pub const TOTALS_LABEL: &str = "Totals";
}
