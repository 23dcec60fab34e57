//! Terminal rendering of a [`RunResult`].

use crate::{
    metrics::{utils::format_millis, GroupStat},
    results::RunResult,
};
use colored::*;
use std::fmt;

const LABEL_WIDTH: usize = 32;

/// Renders a run as a fixed-width table: one row per label in report order,
/// then the Totals row.
pub struct ReportTable<'a> {
    result: &'a RunResult,
}

impl<'a> ReportTable<'a> {
    pub fn new(result: &'a RunResult) -> Self {
        Self { result }
    }
}

impl<'a> fmt::Display for ReportTable<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(LABEL_WIDTH + 70);

        writeln!(f, "{}", rule)?;
        writeln!(
            f,
            "{} {}",
            "Run started:".bold(),
            self.result.key()
        )?;
        writeln!(f, "{}", rule)?;
        writeln!(
            f,
            "{:<width$} {:>8} {:>11} {:>11} {:>11} {:>11} {:>9}",
            "Label",
            "Samples",
            "Mean",
            "Std Dev",
            "Median",
            "95th %",
            "Error %",
            width = LABEL_WIDTH
        )?;

        for stat in &self.result.groups {
            write_row(f, stat)?;
        }

        writeln!(f, "{}", rule)?;
        write_row(f, &self.result.totals)?;
        writeln!(f, "{}", rule)
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, stat: &GroupStat) -> fmt::Result {
    let error_percent = format!("{:.2}", stat.error_percent);
    // Colour is applied after padding so escape codes don't skew the columns.
    let error_percent = if stat.error_percent > 0.0 {
        format!("{:>9}", error_percent).red()
    } else {
        format!("{:>9}", error_percent).green()
    };

    writeln!(
        f,
        "{:<width$} {:>8} {:>11} {:>11} {:>11} {:>11} {}",
        truncate_label(&stat.label),
        stat.samples,
        format_millis(stat.mean),
        format_millis(stat.standard_deviation),
        format_millis(stat.median),
        format_millis(stat.percentile95),
        error_percent,
        width = LABEL_WIDTH
    )
}

fn truncate_label(label: &str) -> String {
    if label.chars().count() <= LABEL_WIDTH {
        label.to_string()
    } else {
        let mut short: String = label.chars().take(LABEL_WIDTH - 1).collect();
        short.push('…');
        short
    }
}

/// Plain listing of stored run keys, one per line.
pub struct KeyListing<'a> {
    keys: &'a [String],
}

impl<'a> KeyListing<'a> {
    pub fn new(keys: &'a [String]) -> Self {
        Self { keys }
    }
}

impl<'a> fmt::Display for KeyListing<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.keys.is_empty() {
            return writeln!(f, "No stored runs");
        }
        for key in self.keys {
            writeln!(f, "{}", key)?;
        }
        Ok(())
    }
}
