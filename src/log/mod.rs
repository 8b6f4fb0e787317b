//! Log parsing for hash table benchmark runs.

pub mod parse;
pub mod row;

pub use parse::{MergeStrategy, parse_log_file};
pub use row::{Implementation, Measurements, ParsedLog, Phase};
