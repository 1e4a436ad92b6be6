//! Error types for mapper operations

use thiserror::Error;

/// Boxed cause carried by failures raised inside user-registered closures
/// (constructors, getters, writers, selection accessors).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while introspecting, resolving or generating
#[derive(Debug, Error)]
pub enum MapperError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Instantiation error: {message}")]
    Instantiation {
        message: String,
        #[source]
        source: BoxError,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MapperError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn instantiation(msg: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Instantiation {
            message: msg.into(),
            source: source.into(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, MapperError>;

/// Argument errors raised while a constructor or writer unpacks its values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArgError {
    #[error("missing argument at position {0}")]
    Missing(usize),

    #[error("argument {position} is {found}, expected {expected}")]
    Mismatch {
        position: usize,
        expected: &'static str,
        found: String,
    },
}

impl ArgError {
    /// Re-anchor the error at `position`
    pub fn at(self, position: usize) -> Self {
        match self {
            ArgError::Missing(_) => ArgError::Missing(position),
            ArgError::Mismatch {
                expected, found, ..
            } => ArgError::Mismatch {
                position,
                expected,
                found,
            },
        }
    }
}
