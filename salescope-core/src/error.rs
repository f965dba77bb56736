//! Error types for Salescope

use chrono::NaiveDate;
use std::error::Error as StdError;
use std::fmt;

/// The main error type for all Salescope operations
///
/// Aggregations never produce "no data" errors: an empty period or a zero
/// denominator yields zero-valued output. Errors come from the edges: a record
/// source that breaks the schema, an invalid period, or a failing summarizer.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// A record source returned rows without a required column
    MissingField {
        /// Record kind (e.g., "sale", "line item")
        record: &'static str,
        /// Name of the missing column
        field: String,
    },

    /// An analysis period whose start falls after its end
    InvalidPeriod {
        /// Requested start date
        start: NaiveDate,
        /// Requested end date
        end: NaiveDate,
    },

    /// Network-related errors
    Network {
        /// Error message
        message: String,
        /// Underlying error if available
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// Summarization provider errors
    Provider {
        /// Provider name (e.g., "gemini")
        provider: String,
        /// Error message
        message: String,
        /// HTTP status returned by the provider, if any
        status: Option<u16>,
    },

    /// Serialization/deserialization errors
    Serialization {
        /// Error message
        message: String,
        /// Underlying error if available
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// Configuration errors
    Configuration(String),

    /// Storage errors raised while loading records
    Storage(String),
}

impl Error {
    /// Create a missing-field error
    pub fn missing_field(record: &'static str, field: impl Into<String>) -> Self {
        Error::MissingField {
            record,
            field: field.into(),
        }
    }

    /// Whether this error came from the external summarization service
    pub fn is_external_service(&self) -> bool {
        matches!(
            self,
            Error::Network { .. } | Error::Provider { .. } | Error::Serialization { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingField { record, field } => {
                write!(f, "Missing field '{}' in {} records", field, record)
            }
            Error::InvalidPeriod { start, end } => {
                write!(f, "Invalid period: start {} is after end {}", start, end)
            }
            Error::Network { message, .. } => write!(f, "Network error: {}", message),
            Error::Provider {
                provider, message, ..
            } => write!(f, "Provider error ({}): {}", provider, message),
            Error::Serialization { message, .. } => write!(f, "Serialization error: {}", message),
            Error::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            Error::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Network { source, .. } | Error::Serialization { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn StdError + 'static)),
            _ => None,
        }
    }
}

/// Result type alias for Salescope operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = Error::missing_field("sale", "total_amount");
        assert_eq!(
            error.to_string(),
            "Missing field 'total_amount' in sale records"
        );

        let error = Error::InvalidPeriod {
            start: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid period: start 2024-02-01 is after end 2024-01-01"
        );

        let error = Error::Provider {
            provider: "gemini".into(),
            message: "HTTP 429: quota exceeded".into(),
            status: Some(429),
        };
        assert_eq!(
            error.to_string(),
            "Provider error (gemini): HTTP 429: quota exceeded"
        );

        let error = Error::Configuration("GEMINI_API_KEY is not set".into());
        assert_eq!(
            error.to_string(),
            "Configuration error: GEMINI_API_KEY is not set"
        );

        let error = Error::Storage("connection refused".into());
        assert_eq!(error.to_string(), "Storage error: connection refused");
    }

    #[test]
    fn test_error_source() {
        let error = Error::Network {
            message: "Connection failed".into(),
            source: None,
        };
        assert!(error.source().is_none());

        let io_error = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let error = Error::Network {
            message: "Connection failed".into(),
            source: Some(Box::new(io_error)),
        };
        assert!(error.source().is_some());

        assert!(Error::Storage("x".into()).source().is_none());
    }

    #[test]
    fn test_error_from_serde_json_error() {
        let json_error = serde_json::from_str::<String>("invalid json").unwrap_err();
        let error: Error = json_error.into();

        match error {
            Error::Serialization { message, source } => {
                assert!(!message.is_empty());
                assert!(source.is_some());
            }
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_external_service_classification() {
        assert!(Error::Provider {
            provider: "gemini".into(),
            message: "boom".into(),
            status: Some(500),
        }
        .is_external_service());
        assert!(!Error::missing_field("line item", "quantity").is_external_service());
        assert!(!Error::Configuration("bad".into()).is_external_service());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
