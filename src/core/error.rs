//! Caller-facing failures of an analysis run.
//!
//! Only these propagate out of the pipeline. Per-file parse failures,
//! unresolvable references and ambiguous matches are absorbed into the
//! result instead (see [`crate::core::model::FileFailure`]).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The codebase path is missing or not a readable directory.
    #[error("invalid or missing codebase path: {}", .0.display())]
    InvalidRoot(PathBuf),

    /// The change intent is empty or whitespace.
    #[error("missing change intent")]
    EmptyIntent,

    /// The graph has no intent match and no module to fall back on.
    #[error("could not identify starting node from intent")]
    NoStartingPoint,

    /// Walking the source tree failed outright.
    #[error("scan failed: {0:#}")]
    Scan(anyhow::Error),
}

pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;
