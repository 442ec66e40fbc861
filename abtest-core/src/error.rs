use thiserror::Error;

/// Errors raised by the computation core.
///
/// Every variant carries enough context for a caller to render a
/// user-facing message; the core itself never logs or recovers.
#[derive(Debug, Error)]
pub enum AbTestError {
    /// A parameter is out of its valid range.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// Summary statistics were requested for a sample with no observations.
    #[error("cannot summarize an empty sample")]
    EmptySample,

    /// A sample is too small for the requested test.
    #[error("{group} sample has {got} observations, at least {min} required")]
    InsufficientData {
        group: &'static str,
        got: usize,
        min: usize,
    },

    /// Uploaded data is malformed. `row` is the 1-based data row, or 0 for
    /// problems with the header.
    #[error("validation error at row {row}: {message}")]
    Validation { row: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl AbTestError {
    pub(crate) fn invalid(name: &'static str, value: impl ToString, reason: impl Into<String>) -> Self {
        AbTestError::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AbTestError>;
