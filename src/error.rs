//! Failures callers may want to tell apart. Everything else travels as plain `anyhow` context.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("Missing log file: {}", .path.display())]
    MissingInput { path: PathBuf },

    #[error("No timing data found in log file: {}", .path.display())]
    EmptyData { path: PathBuf },
}
