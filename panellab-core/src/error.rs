//! Structured error types for panel construction and estimation.

use thiserror::Error;

/// Errors from panel preprocessing and model fitting.
///
/// The pipeline is fail-fast: none of these are caught or retried anywhere
/// in the workspace, they propagate to the binary and terminate that
/// dataset's run.
#[derive(Debug, Error)]
pub enum PanelError {
    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("duplicate panel index ({entity}, {year}) — (entity, year) pairs must be unique")]
    DuplicateIndex { entity: String, year: i32 },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("estimation error: {0}")]
    Estimation(String),
}

/// Convenience alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, PanelError>;
