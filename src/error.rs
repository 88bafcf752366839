//! Error types for loading, filtering and configuring the dashboard.
//!
//! - [`DataError`] - dataset loading and schema errors
//! - [`FilterError`] - invalid filter constraints
//! - [`ConfigError`] - configuration file errors
//!
//! The UI layer wraps these in `anyhow` and shows them as a status message.

use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// Dataset Errors
// =============================================================================

/// Errors while reading the employee dataset.
#[derive(Debug, Error)]
pub enum DataError {
    /// File missing, unreadable or malformed.
    #[error("Failed to load data from {path}: {reason}")]
    DataLoad { path: PathBuf, reason: String },

    /// A required raw column is absent from the file.
    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

impl DataError {
    pub fn load(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        DataError::DataLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

// =============================================================================
// Filter Errors
// =============================================================================

/// Errors raised by the filter engine.
#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    /// Numeric range whose lower bound exceeds its upper bound.
    #[error("Invalid range for '{field}': min {min} exceeds max {max}")]
    InvalidRange { field: String, min: f64, max: f64 },

    /// Constraint targets a field that is not part of the filter set.
    #[error("Unknown filter field: {0}")]
    UnknownField(String),

    /// Categorical values given for a numeric field or vice versa.
    #[error("Constraint kind does not match field '{0}'")]
    KindMismatch(String),
}

// =============================================================================
// Config Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type DataResult<T> = Result<T, DataError>;

pub type FilterResult<T> = Result<T, FilterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_culprit() {
        let err = DataError::MissingColumn("PerformanceRating".into());
        assert!(err.to_string().contains("PerformanceRating"));

        let err = FilterError::InvalidRange {
            field: "Age".into(),
            min: 40.0,
            max: 30.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("Age"));
        assert!(msg.contains("40"));

        let err = DataError::load("hr.csv", "no such file");
        assert!(err.to_string().contains("hr.csv"));
    }
}
