/// Error types for figure rendering
use ar6_data::DataError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlotError {
    /// Failure while preparing the plotted data
    #[error(transparent)]
    Data(#[from] DataError),

    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Unknown colormap: {0}")]
    UnknownColormap(String),

    #[error("Invalid colour: {0}")]
    InvalidColor(String),

    /// Failed to parse chart style JSON
    #[error("Failed to parse chart style: {0}")]
    Config(#[from] serde_json::Error),
}

/// Type alias for Results using PlotError
pub type Result<T> = std::result::Result<T, PlotError>;
