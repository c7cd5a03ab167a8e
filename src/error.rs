//! Error types for the pursuit crate

use thiserror::Error;

/// Main error type for the pursuit crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid grid {width}x{height}: both dimensions must be at least 1")]
    InvalidGrid { width: i32, height: i32 },

    #[error("position ({x}, {y}) is outside the {width}x{height} grid")]
    PositionOutOfBounds {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },

    #[error("temperature {value} must be strictly positive and finite")]
    InvalidTemperature { value: f64 },

    #[error("theta {value} must lie in (0, 1]")]
    InvalidTheta { value: f64 },

    #[error("invalid hyperparameter {name}={value}: {reason}")]
    InvalidHyperparameter {
        name: String,
        value: f64,
        reason: String,
    },

    #[error("softmax over {context} produced a non-finite distribution")]
    DegenerateDistribution { context: String },

    #[error("hunter {hunter} requested an action before the controller began a tick")]
    TickNotStarted { hunter: usize },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("invalid agent kind '{input}'. Expected one of: {expected}")]
    ParseAgentKind { input: String, expected: String },

    #[error("invalid capture policy '{input}'. Expected one of: {expected}")]
    ParseCapturePolicy { input: String, expected: String },

    #[error("invalid scenario preset '{input}'. Expected one of: {expected}")]
    ParsePreset { input: String, expected: String },

    #[error("unsupported experiment record version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("experiment record not found at '{path}'")]
    RecordNotFound { path: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
