//! Series building: flatten a parsed log into index-aligned values per implementation.

use crate::log::{Implementation, Measurements, ParsedLog, Phase};
use std::collections::BTreeSet;

/// Quantity plotted against thread count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Metric {
    Insert,
    Retrieve,
    /// insert + retrieve
    Total,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Insert, Metric::Retrieve, Metric::Total];

    /// Cell value, NaN when absent. Total is NaN if either phase is.
    fn cell(self, m: Option<&Measurements>) -> f64 {
        let phase = |p: Phase| m.and_then(|m| m.get(&p)).copied().unwrap_or(f64::NAN);
        match self {
            Metric::Insert => phase(Phase::Insert),
            Metric::Retrieve => phase(Phase::Retrieve),
            Metric::Total => phase(Phase::Insert) + phase(Phase::Retrieve),
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Metric::Insert => "insert",
            Metric::Retrieve => "retrieve",
            Metric::Total => "total",
        }
    }

    /// Word used in the log lines ("Inserted", "Retrieved").
    pub fn keyword(self) -> &'static str {
        match self {
            Metric::Insert => "Inserted",
            Metric::Retrieve => "Retrieved",
            Metric::Total => "Total",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Metric::Insert => "Insertion time vs. threads",
            Metric::Retrieve => "Retrieval time vs. threads",
            Metric::Total => "Total time (insert+retrieve) vs. threads",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Strictly increasing.
    pub threads: Vec<u32>,
    /// One line per requested implementation, in request order, each `threads.len()` long.
    pub lines: Vec<(Implementation, Vec<f64>)>,
}

impl Series {
    #[cfg(test)]
    pub fn values(&self, implementation: Implementation) -> Option<&[f64]> {
        self.lines
            .iter()
            .find(|(i, _)| *i == implementation)
            .map(|(_, v)| v.as_slice())
    }
}

/// Sorted union of thread counts across `implementations`, `None` when there are none.
pub fn thread_axis(log: &ParsedLog, implementations: &[Implementation]) -> Option<Vec<u32>> {
    let axis: BTreeSet<u32> = implementations
        .iter()
        .flat_map(|i| log.threads(*i))
        .collect();
    if axis.is_empty() {
        return None;
    }
    Some(axis.into_iter().collect())
}

/// `None` when no requested implementation has data; callers report that as
/// [`PlotError::EmptyData`](crate::error::PlotError::EmptyData) for their log file.
pub fn build_series(
    log: &ParsedLog,
    implementations: &[Implementation],
    metric: Metric,
) -> Option<Series> {
    let threads = thread_axis(log, implementations)?;

    let lines = implementations
        .iter()
        .map(|&imp| {
            let values = threads
                .iter()
                .map(|&t| metric.cell(log.get(imp, t)))
                .collect();
            (imp, values)
        })
        .collect();

    Some(Series { threads, lines })
}
