use thiserror::Error;

/// Boxed error produced by an external objective function.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for the SPSA optimizer
#[derive(Error, Debug)]
pub enum SpsaError {
    #[error("Invalid configuration: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Dimension mismatch: {what} has length {got}, expected {expected}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Initial point is required but was not supplied")]
    MissingInitialPoint,

    #[error("Gradient function is required but was not supplied")]
    MissingGradient,

    #[error("Variable bounds are required but were not supplied")]
    MissingBounds,

    #[error("Unsupported input: {0} is not supported by this optimizer")]
    Unsupported(&'static str),

    /// The objective showed no change along any calibration direction, so
    /// no finite step-size coefficient can be derived from it.
    #[error("Degenerate calibration: objective was flat across {samples} sampled directions")]
    DegenerateCalibration { samples: usize },

    #[error("Objective returned {got} cost values, expected {expected}")]
    ObjectiveArity { expected: usize, got: usize },

    /// Error raised by the objective function, passed through untouched.
    #[error(transparent)]
    Objective(BoxError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SpsaError {
    pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type alias for SPSA operations
pub type Result<T> = std::result::Result<T, SpsaError>;
