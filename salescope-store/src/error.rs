//! Error types for record loading

use salescope_core::Error as CoreError;
use thiserror::Error;

/// Result type for load operations
pub type LoadResult<T> = Result<T, LoadError>;

/// Errors that can occur while loading records
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    /// A query result lacks a column the records require
    #[error("Missing column '{column}' in {record} rows")]
    MissingColumn {
        /// Record kind
        record: &'static str,
        /// Column name
        column: String,
    },

    /// A value could not be turned into a record field
    #[error("Invalid {record} row: {message}")]
    InvalidRow {
        /// Record kind
        record: &'static str,
        /// What was wrong
        message: String,
    },

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl LoadError {
    /// Attach the record kind to a query error
    pub fn from_query(record: &'static str, error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::ColumnNotFound(column) => Self::MissingColumn { record, column },
            other => Self::Database(other),
        }
    }

    /// Create an invalid row error
    pub fn invalid_row(record: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidRow {
            record,
            message: message.into(),
        }
    }
}

impl From<LoadError> for CoreError {
    fn from(error: LoadError) -> Self {
        match error {
            LoadError::MissingColumn { record, column } => CoreError::missing_field(record, column),
            LoadError::Configuration(msg) => CoreError::Configuration(msg),
            other => CoreError::Storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_maps_to_missing_field() {
        let err = LoadError::from_query("sale", sqlx::Error::ColumnNotFound("created_at".into()));
        assert_eq!(err.to_string(), "Missing column 'created_at' in sale rows");

        match CoreError::from(err) {
            CoreError::MissingField { record, field } => {
                assert_eq!(record, "sale");
                assert_eq!(field, "created_at");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_other_errors_map_to_storage() {
        let err = LoadError::from_query("line item", sqlx::Error::PoolTimedOut);
        assert!(matches!(CoreError::from(err), CoreError::Storage(_)));

        let err = LoadError::invalid_row("line item", "negative quantity -2");
        assert!(matches!(CoreError::from(err), CoreError::Storage(_)));
    }
}
