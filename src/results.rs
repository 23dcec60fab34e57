use crate::{
    aggregate::start_time_from_millis,
    defaults,
    error::{Result, StatsError},
    metrics::GroupStat,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// Complete aggregate for one load-test run.
///
/// `groups` is ordered by each group's earliest timestamp; `totals` covers
/// every sample regardless of label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RunResult {
    pub start_time: DateTime<Utc>,
    pub groups: Vec<GroupStat>,
    pub totals: GroupStat,
}

impl RunResult {
    /// Storage key: the start time as an RFC 3339 string, e.g. `2024-03-01T10:00:00Z`.
    pub fn key(&self) -> String {
        self.start_time.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    /// Canonical JSON encoding, used both for storage and for export.
    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Rebuild a result from [`RunResult::encode`] output.
    ///
    /// Anything that does not parse, or parses into a result that could not
    /// have come out of the aggregator, is rejected with
    /// [`StatsError::MalformedData`].
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let result: RunResult = serde_json::from_slice(bytes)?;
        result.validate()?;
        Ok(result)
    }

    /// Check the invariants every aggregated result satisfies.
    pub fn validate(&self) -> Result<()> {
        if self.groups.is_empty() {
            return Err(malformed("result has no groups"));
        }

        for stat in self.groups.iter().chain(std::iter::once(&self.totals)) {
            validate_stat(stat)?;
        }

        if self.totals.label != defaults::TOTALS_LABEL {
            return Err(malformed(format!(
                "totals labelled '{}' instead of '{}'",
                self.totals.label,
                defaults::TOTALS_LABEL
            )));
        }

        let group_samples: usize = self.groups.iter().map(|g| g.samples).sum();
        if group_samples != self.totals.samples {
            return Err(malformed(format!(
                "group samples sum to {} but totals report {}",
                group_samples, self.totals.samples
            )));
        }

        if self
            .groups
            .windows(2)
            .any(|w| w[0].first_timestamp > w[1].first_timestamp)
        {
            return Err(malformed("groups are not ordered by first timestamp"));
        }

        let mut labels = HashSet::with_capacity(self.groups.len());
        if let Some(dup) = self.groups.iter().find(|g| !labels.insert(g.label.as_str())) {
            return Err(malformed(format!("label '{}' appears more than once", dup.label)));
        }

        // Groups are sorted, so the first one carries the earliest timestamp.
        if self.groups[0].first_timestamp != self.totals.first_timestamp {
            return Err(malformed(format!(
                "totals first timestamp {}ms differs from earliest group at {}ms",
                self.totals.first_timestamp, self.groups[0].first_timestamp
            )));
        }

        let earliest = start_time_from_millis(self.totals.first_timestamp)
            .map_err(|e| malformed(e.to_string()))?;
        if earliest != self.start_time {
            return Err(malformed(format!(
                "start time {} does not match earliest sample at {}ms",
                self.key(),
                self.totals.first_timestamp
            )));
        }

        Ok(())
    }

    /// Write the encoded result to `path`, replacing any existing file.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        info!("Results written to: {:?}", path);
        Ok(())
    }

    /// Per-group stats as a JSON string, in report order.
    pub fn groups_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.groups)?)
    }
}

fn validate_stat(stat: &GroupStat) -> Result<()> {
    if stat.samples == 0 {
        return Err(malformed(format!("group '{}' has zero samples", stat.label)));
    }

    let values = [
        stat.mean,
        stat.standard_deviation,
        stat.median,
        stat.percentile95,
        stat.error_percent,
    ];
    if values.iter().any(|v| !v.is_finite()) {
        return Err(malformed(format!(
            "group '{}' has a non-finite statistic",
            stat.label
        )));
    }
    if stat.standard_deviation < 0.0 {
        return Err(malformed(format!(
            "group '{}' has negative standard deviation",
            stat.label
        )));
    }
    if !(0.0..=100.0).contains(&stat.error_percent) {
        return Err(malformed(format!(
            "group '{}' has error rate {} outside 0..=100",
            stat.label, stat.error_percent
        )));
    }
    Ok(())
}

fn malformed(reason: impl Into<String>) -> StatsError {
    StatsError::MalformedData(reason.into())
}
