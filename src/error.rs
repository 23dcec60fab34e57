//! Error types shared by the aggregation, serialization and storage layers.

use thiserror::Error;

/// Convenience alias used by every library operation.
pub type Result<T, E = StatsError> = std::result::Result<T, E>;

/// Every failure the engine can report.
///
/// Aggregation errors are deterministic functions of the input and are never
/// retried. Store errors may be transient (e.g. the database lock is held by
/// another process); callers that want to retry must do so themselves.
#[derive(Debug, Error)]
pub enum StatsError {
    /// No samples were supplied, so there is no start time and nothing to summarize.
    #[error("No samples to aggregate")]
    EmptyInput,

    /// A statistic was requested for a group holding zero observations.
    #[error("Group '{0}' has no samples")]
    DegenerateGroup(String),

    /// A sample timestamp cannot be represented as a calendar time.
    #[error("Timestamp {0}ms is out of range")]
    InvalidTimestamp(i64),

    /// Encoded bytes failed to parse or violate a result invariant.
    #[error("Malformed result data: {0}")]
    MalformedData(String),

    /// The requested run key is not in the store.
    #[error("Run not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] sled::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for StatsError {
    fn from(err: serde_json::Error) -> Self {
        StatsError::MalformedData(err.to_string())
    }
}
