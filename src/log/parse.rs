use crate::Result;
use crate::error::PlotError;
use crate::log::row::{Implementation, Measurements, ParsedLog, Phase, Section};
use anyhow::Context;
use regex::Regex;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// How a repeated (implementation, threads, phase) measurement is folded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Last value wins.
    Overwrite,
    /// Values are summed.
    Accumulate,
}

impl MergeStrategy {
    fn apply(self, slot: &mut Measurements, phase: Phase, seconds: f64) {
        match self {
            MergeStrategy::Overwrite => {
                slot.insert(phase, seconds);
            }
            MergeStrategy::Accumulate => {
                *slot.entry(phase).or_insert(0.0) += seconds;
            }
        }
    }
}

// Header lines are matched after trimming.
const HEADER_RE: &str = r"^--- (original|mutex|spinlock) t=(\d+) ---$";

// The captured number sits immediately before " seconds".
const INSERT_RE: &str = r"Inserted \d+ keys in ([0-9]+(?:\.[0-9]*)?|\.[0-9]+) seconds";
const RETRIEVE_RE: &str = r"Retrieved \d+/\d+ keys in ([0-9]+(?:\.[0-9]*)?|\.[0-9]+) seconds";

/// Parse a benchmark log file into per-implementation, per-thread-count timings.
///
/// Fails with [`PlotError::MissingInput`] before reading anything if `path` does not exist.
/// Unreadable files and invalid UTF-8 are propagated as-is.
pub fn parse_log_file(path: &Path, strategy: MergeStrategy) -> Result<ParsedLog> {
    if !path.exists() {
        return Err(PlotError::MissingInput {
            path: path.to_path_buf(),
        }
        .into());
    }

    let text = fs::read_to_string(path)
        .with_context(|| format!("read log file {}", path.display()))?;

    let parsed = parse_log_str(&text, strategy)
        .with_context(|| format!("parse log file {}", path.display()))?;

    if parsed.is_empty() {
        warn!(path = %path.display(), "no measurements attributed to any section");
    }

    info!(
        path = %path.display(),
        entries = parsed.len(),
        ?strategy,
        "parsed benchmark log"
    );
    Ok(parsed)
}

/// Parse log text.
///
/// Expected lines:
/// --- mutex t=4 ---
/// Inserted 100 keys in 0.20 seconds
/// Retrieved 100/100 keys in 0.08 seconds
///
/// Anything else is skipped.
pub fn parse_log_str(text: &str, strategy: MergeStrategy) -> Result<ParsedLog> {
    let header = Regex::new(HEADER_RE)?;
    let phases = [
        (Phase::Insert, Regex::new(INSERT_RE)?),
        (Phase::Retrieve, Regex::new(RETRIEVE_RE)?),
    ];

    let mut out = ParsedLog::new();
    let mut current: Option<Section> = None;

    for (lineno, line) in text.lines().enumerate() {
        let lno = lineno + 1;

        if let Some(caps) = header.captures(line.trim()) {
            current = section_from_header(&caps[1], &caps[2]);
            if current.is_none() {
                debug!(line = lno, "ignoring header with unusable thread count: {:?}", line);
            }
            continue;
        }

        for (phase, re) in &phases {
            let Some(caps) = re.captures(line) else {
                continue;
            };

            let Some(section) = current else {
                debug!(line = lno, "measurement before first header: {:?}", line);
                continue;
            };

            let seconds: f64 = caps[1]
                .parse()
                .with_context(|| format!("bad seconds value at line {}: {:?}", lno, &caps[1]))?;

            if !seconds.is_finite() {
                debug!(line = lno, "ignoring out-of-range seconds value: {:?}", line);
                continue;
            }

            strategy.apply(out.entry(section), *phase, seconds);
        }
    }

    Ok(out)
}

/// `None` for a zero or out-of-range thread count.
fn section_from_header(name: &str, threads: &str) -> Option<Section> {
    let implementation = Implementation::from_token(name)?;
    let threads: u32 = threads.parse().ok().filter(|t| *t > 0)?;
    Some(Section {
        implementation,
        threads,
    })
}
