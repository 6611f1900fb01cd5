//! Error types for the region-eval library.

use thiserror::Error;

/// Result type for region-eval operations.
pub type Result<T> = std::result::Result<T, RegionEvalError>;

/// Error types that can occur during region evaluation.
#[derive(Error, Debug)]
pub enum RegionEvalError {
    /// A class label that is not part of the matrix label set.
    #[error("Invalid label: {0} does not exist in the confusion matrix")]
    InvalidLabel(String),

    /// A class label given more than once when building a matrix.
    #[error("Duplicate label: {0}")]
    DuplicateLabel(String),

    /// Two matrices with different label sequences were combined.
    #[error("Label mismatch: {0}")]
    LabelMismatch(String),

    /// Serialized matrix rows do not form a square over the labels.
    #[error("Invalid matrix shape: {0}")]
    InvalidShape(String),

    /// A count update would take the matrix total past `u64::MAX`.
    #[error("Count overflow: {0}")]
    CountOverflow(String),

    /// A serialized evaluation whose present regions contradict its outcome.
    #[error("Invalid evaluation: {0}")]
    InvalidEvaluation(String),

    /// Invalid overlap threshold.
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    /// Error during JSON parsing of configuration.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error during I/O operations.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
