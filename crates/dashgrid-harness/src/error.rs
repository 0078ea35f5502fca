use std::path::PathBuf;

use dashgrid_layout::{ConfigError, DocumentError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarnessError>;

/// Exit code for inputs that parsed but were rejected.
pub const EXIT_INVALID_INPUT: i32 = 2;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("layout document rejected: {0}")]
    Document(#[from] DocumentError),

    #[error("configuration rejected: {0}")]
    Config(#[from] ConfigError),

    #[error("required path does not exist: {path}")]
    MissingPath { path: PathBuf },

    #[error("trace step {index} failed: {message}")]
    TraceStep { index: usize, message: String },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl HarnessError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) | Self::Json(_) | Self::MissingPath { .. } => 1,
            Self::Document(_) | Self::Config(_) | Self::TraceStep { .. } | Self::InvalidArgument { .. } => {
                EXIT_INVALID_INPUT
            }
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_inputs_exit_with_two() {
        assert_eq!(HarnessError::invalid("nope").exit_code(), EXIT_INVALID_INPUT);
        assert_eq!(
            HarnessError::from(DocumentError::MissingComponents).exit_code(),
            EXIT_INVALID_INPUT
        );
        assert_eq!(
            HarnessError::from(ConfigError::Validation(vec!["bad".into()])).exit_code(),
            EXIT_INVALID_INPUT
        );
    }

    #[test]
    fn io_failures_exit_with_one() {
        let error = HarnessError::from(std::io::Error::other("disk"));
        assert_eq!(error.exit_code(), 1);
        assert_eq!(error.to_string(), "I/O error: disk");
    }

    #[test]
    fn invalid_constructor_formats_message() {
        assert_eq!(
            HarnessError::invalid("--chart must be positive").to_string(),
            "invalid argument: --chart must be positive"
        );
    }
}
