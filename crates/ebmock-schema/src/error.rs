use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stable error codes reported by the service. Callers branch on these, so the
/// string forms must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    MissingRequiredParameter,
    MissingParameter,
    UnexpectedParameter,
    InvalidParameterType,
    InvalidParameterValue,
    InvalidParameterCombination,
    ValidationError,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 7] = [
        ErrorCode::MissingRequiredParameter,
        ErrorCode::MissingParameter,
        ErrorCode::UnexpectedParameter,
        ErrorCode::InvalidParameterType,
        ErrorCode::InvalidParameterValue,
        ErrorCode::InvalidParameterCombination,
        ErrorCode::ValidationError,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingRequiredParameter => "MissingRequiredParameter",
            ErrorCode::MissingParameter => "MissingParameter",
            ErrorCode::UnexpectedParameter => "UnexpectedParameter",
            ErrorCode::InvalidParameterType => "InvalidParameterType",
            ErrorCode::InvalidParameterValue => "InvalidParameterValue",
            ErrorCode::InvalidParameterCombination => "InvalidParameterCombination",
            ErrorCode::ValidationError => "ValidationError",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A service error as delivered to callers.
///
/// Immutable once built: the creation time is captured by the constructor and
/// there are no setters.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct ApiError {
    code: ErrorCode,
    message: String,
    time: DateTime<Utc>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::at(code, message, Utc::now())
    }

    /// Build an error stamped with an explicit creation time.
    pub fn at(code: ErrorCode, message: impl Into<String>, time: DateTime<Utc>) -> Self {
        Self {
            code,
            message: message.into(),
            time,
        }
    }

    /// The same error, stamped with `time` instead.
    #[must_use]
    pub fn with_time(self, time: DateTime<Utc>) -> Self {
        Self { time, ..self }
    }

    pub fn missing_required(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MissingRequiredParameter, message)
    }

    pub fn missing_parameter(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MissingParameter, message)
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnexpectedParameter, message)
    }

    pub fn invalid_type(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidParameterType, message)
    }

    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidParameterValue, message)
    }

    pub fn invalid_combination(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidParameterCombination, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }
}
