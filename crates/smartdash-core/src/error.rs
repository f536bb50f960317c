//! Error types for SmartDash

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Need at least {required} data points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("No valid numerical data found in document")]
    NoDataExtracted,

    #[error("Failed to parse document: {0}")]
    ParseFailure(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Whether this error was caused by the caller's data rather than the
    /// environment. These are safe to show verbatim to API clients.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::InsufficientData { .. }
                | Error::NoDataExtracted
                | Error::ParseFailure(_)
                | Error::InvalidInput(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_are_user_facing() {
        assert!(Error::NoDataExtracted.is_user_facing());
        assert!(Error::InvalidInput("x".into()).is_user_facing());
        assert!(Error::ParseFailure("x".into()).is_user_facing());
        assert!(Error::InsufficientData {
            required: 2,
            actual: 1
        }
        .is_user_facing());
        assert!(!Error::Config("bad".into()).is_user_facing());
    }

    #[test]
    fn test_insufficient_data_message() {
        let err = Error::InsufficientData {
            required: 2,
            actual: 1,
        };
        assert_eq!(err.to_string(), "Need at least 2 data points, got 1");
    }
}
