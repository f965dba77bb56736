//! Provider-specific error helpers

use salescope_core::Error as CoreError;

/// Build a provider error
pub fn provider_error(
    provider: impl Into<String>,
    message: impl Into<String>,
    status: Option<u16>,
) -> CoreError {
    CoreError::Provider {
        provider: provider.into(),
        message: message.into(),
        status,
    }
}

/// Attribute a provider error raised by a shared component to `provider`
pub fn attribute(error: CoreError, provider: &str) -> CoreError {
    match error {
        CoreError::Provider {
            message, status, ..
        } => provider_error(provider, message, status),
        other => other,
    }
}

/// Convert network errors to core errors
///
/// The request URL is stripped from the error before it is rendered.
pub fn network_error(error: reqwest::Error) -> CoreError {
    let error = error.without_url();
    CoreError::Network {
        message: error.to_string(),
        source: Some(Box::new(error)),
    }
}

/// Convert serialization errors to core errors
pub fn serialization_error(error: serde_json::Error) -> CoreError {
    CoreError::Serialization {
        message: error.to_string(),
        source: Some(Box::new(error)),
    }
}
