/// Error types for figure data preparation
use ar6_frame::FrameError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    /// Failure inside a scenario frame operation
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// A column required by the plot data is absent
    #[error("Missing column in plot data: {0}")]
    MissingColumn(String),

    /// Two rows pivot into the same cell
    #[error("Index contains duplicate entries: {0}")]
    DuplicateEntry(String),

    /// Exclusion filter names a column the data does not have
    #[error("Unknown filter column: {0}")]
    UnknownFilterColumn(String),

    /// Failed to parse configuration JSON
    #[error("Failed to parse configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Type alias for Results using DataError
pub type Result<T> = std::result::Result<T, DataError>;
