//! # Aggregation Engine
//!
//! Groups samples by label and turns each group into a [`GroupStat`].
//!
//! ## Ordering
//!
//! Groups are kept in first-seen order (a `Vec` plus a label→index map) while
//! samples are recorded. Once every series is summarized, the groups are stably
//! sorted by their earliest timestamp. Labels whose earliest timestamps tie
//! keep their first-seen order, so the output never depends on hash iteration
//! order.
//!
//! ## Totals
//!
//! Every sample is also recorded in a separate Totals series. The Totals stat
//! is produced by the same routine as the per-label stats, errors included.

use crate::{
    defaults,
    error::{Result, StatsError},
    metrics::{GroupSeries, GroupStat},
    results::RunResult,
    sample::Sample,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

/// Single-pass accumulator over a batch of samples.
#[derive(Debug)]
pub struct Aggregator {
    index: HashMap<String, usize>,
    groups: Vec<GroupSeries>,
    totals: GroupSeries,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            groups: Vec::new(),
            totals: GroupSeries::new(defaults::TOTALS_LABEL),
        }
    }

    /// Record one sample in its label group and in the Totals series.
    pub fn add(&mut self, sample: &Sample) {
        let slot = match self.index.get(&sample.label) {
            Some(&slot) => slot,
            None => {
                let slot = self.groups.len();
                self.groups.push(GroupSeries::new(sample.label.clone()));
                self.index.insert(sample.label.clone(), slot);
                slot
            }
        };

        self.groups[slot].record(sample.timestamp, sample.elapsed, sample.success);
        self.totals
            .record(sample.timestamp, sample.elapsed, sample.success);
    }

    /// Number of distinct labels seen so far.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Summarize every group and build the run result.
    pub fn finish(self) -> Result<RunResult> {
        if self.totals.is_empty() {
            return Err(StatsError::EmptyInput);
        }

        for series in &self.groups {
            debug!(
                "{}: {} ok, {} failed",
                series.label(),
                series.successes(),
                series.errors()
            );
        }

        let mut groups = self
            .groups
            .into_iter()
            .map(GroupSeries::summarize)
            .collect::<Result<Vec<GroupStat>>>()?;
        // Vec::sort_by_key is stable; ties keep first-seen order.
        groups.sort_by_key(|g| g.first_timestamp);

        // Minimum over the per-label groups, which must agree with the raw input minimum.
        let earliest = groups
            .iter()
            .map(|g| g.first_timestamp)
            .min()
            .ok_or(StatsError::EmptyInput)?;
        let start_time = start_time_from_millis(earliest)?;

        let totals = self.totals.summarize()?;
        debug_assert_eq!(totals.first_timestamp, earliest);

        for group in &groups {
            debug!(
                "{}: \t {:.3} ({})",
                group.label, group.mean, group.samples
            );
        }

        Ok(RunResult {
            start_time,
            groups,
            totals,
        })
    }
}

/// Aggregate a batch of samples into a [`RunResult`].
///
/// Fails with [`StatsError::EmptyInput`] when `samples` is empty.
pub fn aggregate(samples: &[Sample]) -> Result<RunResult> {
    let mut aggregator = Aggregator::new();
    for sample in samples {
        aggregator.add(sample);
    }
    debug!(
        "Grouped {} samples into {} labels",
        samples.len(),
        aggregator.group_count()
    );
    aggregator.finish()
}

/// Convert an epoch-millisecond timestamp to whole seconds, dropping the remainder.
pub fn start_time_from_millis(millis: i64) -> Result<DateTime<Utc>> {
    let secs = millis.div_euclid(1000);
    DateTime::<Utc>::from_timestamp(secs, 0).ok_or(StatsError::InvalidTimestamp(millis))
}
