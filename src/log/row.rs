use serde::Serialize;
use std::collections::BTreeMap;

/// Hash table variant named in a section header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Implementation {
    Original,
    Mutex,
    Spinlock,
}

impl Implementation {
    pub const ALL: [Implementation; 3] = [
        Implementation::Original,
        Implementation::Mutex,
        Implementation::Spinlock,
    ];

    /// Token as it appears in `--- <name> t=<n> ---`.
    pub fn token(self) -> &'static str {
        match self {
            Implementation::Original => "original",
            Implementation::Mutex => "mutex",
            Implementation::Spinlock => "spinlock",
        }
    }

    pub fn from_token(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.token() == s)
    }

    pub fn label(self) -> &'static str {
        match self {
            Implementation::Original => "Original",
            Implementation::Mutex => "Mutex",
            Implementation::Spinlock => "Spinlock",
        }
    }
}

/// A timed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Insert,
    Retrieve,
}

/// The (implementation, threads) pair of the most recent header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub implementation: Implementation,
    pub threads: u32,
}

/// Seconds per phase for one run.
pub type Measurements = BTreeMap<Phase, f64>;

/// implementation -> threads -> measurements.
///
/// A thread entry only exists once at least one measurement was recorded under it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParsedLog {
    runs: BTreeMap<Implementation, BTreeMap<u32, Measurements>>,
}

impl ParsedLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutable measurement set for a section, created on first use.
    pub(crate) fn entry(&mut self, section: Section) -> &mut Measurements {
        self.runs
            .entry(section.implementation)
            .or_default()
            .entry(section.threads)
            .or_default()
    }

    pub fn get(&self, implementation: Implementation, threads: u32) -> Option<&Measurements> {
        self.runs.get(&implementation)?.get(&threads)
    }

    #[cfg(test)]
    pub fn value(&self, implementation: Implementation, threads: u32, phase: Phase) -> Option<f64> {
        self.get(implementation, threads)?.get(&phase).copied()
    }

    /// Thread counts recorded for one implementation, ascending.
    pub fn threads(&self, implementation: Implementation) -> impl Iterator<Item = u32> + '_ {
        self.runs
            .get(&implementation)
            .into_iter()
            .flat_map(|by_threads| by_threads.keys().copied())
    }

    /// Number of (implementation, threads) entries.
    pub fn len(&self) -> usize {
        self.runs.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
