//! # Sample Model and JTL Ingestion
//!
//! A [`Sample`] is one measured request from a JMeter results file (JTL in
//! CSV form). Columns are matched by header name, so the column order in the
//! export does not matter and any columns beyond the seven used here
//! (`threadName`, `dataType`, ...) are ignored.
//!
//! | Column         | Field           | Meaning                              |
//! |----------------|-----------------|--------------------------------------|
//! | `timeStamp`    | `timestamp`     | request start, ms since Unix epoch   |
//! | `elapsed`      | `elapsed`       | total request time in ms             |
//! | `label`        | `label`         | sampler label, the grouping key      |
//! | `responseCode` | `response_code` | e.g. `200`, `404`                    |
//! | `success`      | `success`       | `true` or anything else              |
//! | `bytes`        | `bytes`         | response size                        |
//! | `Latency`      | `latency`       | time to first byte in ms             |

use crate::error::Result;
use serde::{Deserialize, Deserializer};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// One measured request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Sample {
    #[serde(rename = "timeStamp")]
    pub timestamp: i64,
    pub elapsed: u64,
    pub label: String,
    #[serde(rename = "responseCode", default)]
    pub response_code: String,
    #[serde(deserialize_with = "success_flag")]
    pub success: bool,
    #[serde(default)]
    pub bytes: u64,
    #[serde(rename = "Latency", default)]
    pub latency: u64,
}

impl Sample {
    /// Build a sample with only the fields the aggregator reads.
    pub fn new(timestamp: i64, elapsed: u64, label: impl Into<String>, success: bool) -> Self {
        Self {
            timestamp,
            elapsed,
            label: label.into(),
            response_code: String::new(),
            success,
            bytes: 0,
            latency: 0,
        }
    }
}

// JMeter writes the literal `true`; every other value is counted as an error.
fn success_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw == "true")
}

/// Decode samples from any reader producing JTL CSV with a header row.
///
/// Fields are taken verbatim: labels that differ only in whitespace stay distinct.
pub fn parse_samples<R: Read>(reader: R) -> Result<Vec<Sample>> {
    let mut csv_reader = csv::ReaderBuilder::new().from_reader(reader);

    let samples = csv_reader
        .deserialize()
        .collect::<std::result::Result<Vec<Sample>, _>>()?;

    Ok(samples)
}

/// Read and decode a JTL file from disk.
pub fn read_samples(path: &Path) -> Result<Vec<Sample>> {
    let file = File::open(path)?;
    let samples = parse_samples(file)?;
    debug!("Decoded {} samples from {:?}", samples.len(), path);
    Ok(samples)
}
