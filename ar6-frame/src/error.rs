/// Error types for scenario frame operations
use thiserror::Error;

/// Main error type for [`ScenarioFrame`](crate::ScenarioFrame) operations
#[derive(Error, Debug)]
pub enum FrameError {
    /// The operation needs at least one data point
    #[error("Operation requires a non-empty scenario frame: {0}")]
    Empty(&'static str),

    /// Quantiles are computed for a single variable at a time
    #[error("Quantiles support only one variable, found {count}: {variables:?}")]
    MultipleVariables { count: usize, variables: Vec<String> },

    /// A variable referenced by an operation is not in the frame
    #[error("Variable not found: {0}")]
    MissingVariable(String),

    /// Units cannot be combined without an explicit override
    #[error("Incompatible units for {op}: '{left}' and '{right}'")]
    IncompatibleUnits {
        op: &'static str,
        left: String,
        right: String,
    },

    /// Two data points share the same index
    #[error("Duplicate index entry: {0}")]
    DuplicateIndex(String),

    /// Metadata was assigned to a scenario that has no data
    #[error("Unknown scenario: {model} / {scenario}")]
    UnknownScenario { model: String, scenario: String },

    /// Quantile level outside of [0, 1]
    #[error("Quantile level must be within [0, 1], got {0}")]
    InvalidQuantile(f64),

    /// Failed to parse CSV data
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

/// Type alias for Results using FrameError
pub type Result<T> = std::result::Result<T, FrameError>;
