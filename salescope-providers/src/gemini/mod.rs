//! Google Gemini provider implementation

mod config;
pub(crate) mod converter;
pub(crate) mod parser;
mod provider;

pub use config::GeminiConfig;
pub use provider::Gemini;
