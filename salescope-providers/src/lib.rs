//! Summarizer providers for Salescope

#![warn(missing_docs)]

pub mod builder;
pub mod constants;
pub mod error;
pub mod http;
pub mod traits;

// Provider implementations
pub mod gemini;

// Re-export provider types
pub use gemini::Gemini;

// Re-export common traits
pub use builder::{GeminiBuilder, ProviderBuilder};
pub use http::{HttpClient, ReqwestClient};
pub use traits::{RequestConverter, ResponseParser};
