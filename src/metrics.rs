use crate::error::{Result, StatsError};
use serde::{Deserialize, Serialize};

/// Summary statistics for one label, or for every sample combined ("Totals").
///
/// All time values are in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GroupStat {
    pub label: String,
    pub samples: usize,
    pub mean: f64,
    pub standard_deviation: f64,
    pub median: f64,
    pub percentile95: f64,
    pub error_percent: f64,
    /// Earliest timestamp observed for this group, ms since Unix epoch.
    pub first_timestamp: i64,
}

/// Accumulator for the observations of a single group.
///
/// `elapsed[i]` was measured at `timestamps[i]`.
#[derive(Debug, Clone, Default)]
pub struct GroupSeries {
    label: String,
    elapsed: Vec<u64>,
    timestamps: Vec<i64>,
    successes: usize,
    errors: usize,
}

impl GroupSeries {
    /// Create an empty series
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    /// Record one observation
    pub fn record(&mut self, timestamp: i64, elapsed: u64, success: bool) {
        self.elapsed.push(elapsed);
        self.timestamps.push(timestamp);
        if success {
            self.successes += 1;
        } else {
            self.errors += 1;
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn len(&self) -> usize {
        self.elapsed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elapsed.is_empty()
    }

    pub fn successes(&self) -> usize {
        self.successes
    }

    pub fn errors(&self) -> usize {
        self.errors
    }

    /// Earliest timestamp in the series, regardless of recording order.
    pub fn first_timestamp(&self) -> Option<i64> {
        self.timestamps.iter().copied().min()
    }

    /// Derive the summary statistics, consuming the series.
    ///
    /// Per-label groups and the Totals group both go through here.
    pub fn summarize(self) -> Result<GroupStat> {
        let first_timestamp = match self.first_timestamp() {
            Some(ts) => ts,
            None => return Err(StatsError::DegenerateGroup(self.label)),
        };

        let mut sorted = self.elapsed;
        sorted.sort_unstable();

        let samples = sorted.len();
        let mean = utils::mean(&sorted);

        Ok(GroupStat {
            samples,
            mean,
            standard_deviation: utils::sample_std_dev(&sorted, mean),
            median: utils::percentile(&sorted, 50.0),
            percentile95: utils::percentile(&sorted, 95.0),
            error_percent: utils::error_percent(self.errors, samples),
            first_timestamp,
            label: self.label,
        })
    }
}

/// Estimators used by [`GroupSeries::summarize`].
///
/// Callers guarantee a non-empty slice; `percentile` additionally expects it sorted.
pub mod utils {
    /// Arithmetic mean.
    pub fn mean(values: &[u64]) -> f64 {
        let sum: f64 = values.iter().map(|&v| v as f64).sum();
        sum / values.len() as f64
    }

    /// Sample standard deviation (N - 1 denominator). A single observation has zero spread.
    pub fn sample_std_dev(values: &[u64], mean: f64) -> f64 {
        if values.len() < 2 {
            return 0.0;
        }
        let sum_sq: f64 = values
            .iter()
            .map(|&v| {
                let d = v as f64 - mean;
                d * d
            })
            .sum();
        (sum_sq / (values.len() - 1) as f64).sqrt()
    }

    /// Percentile by linear interpolation between the closest ranks.
    ///
    /// The rank is `p / 100 * (n - 1)`, so p0 is the minimum and p100 the maximum.
    pub fn percentile(sorted: &[u64], p: f64) -> f64 {
        let last = sorted.len() - 1;
        let rank = (p / 100.0).clamp(0.0, 1.0) * last as f64;
        let lower = rank.floor() as usize;
        let upper = rank.ceil() as usize;
        let lo = sorted[lower] as f64;
        let hi = sorted[upper.min(last)] as f64;
        lo + (hi - lo) * (rank - lower as f64)
    }

    /// Share of failed samples, as a percentage.
    pub fn error_percent(errors: usize, samples: usize) -> f64 {
        errors as f64 / samples as f64 * 100.0
    }

    /// Format a millisecond value for the report
    pub fn format_millis(ms: f64) -> String {
        if ms < 1_000.0 {
            format!("{:.2}ms", ms)
        } else if ms < 60_000.0 {
            format!("{:.2}s", ms / 1_000.0)
        } else {
            format!("{:.2}m", ms / 60_000.0)
        }
    }
}
