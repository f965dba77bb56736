//! Gemini provider configuration

use crate::constants::{GEMINI_DEFAULT_BASE_URL, GEMINI_DEFAULT_MODEL};
use std::fmt;

/// Configuration for the Gemini provider
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key, sent in the `x-goog-api-key` header
    pub api_key: String,
    /// Base URL up to and including the API version
    pub base_url: String,
    /// Model used when a request does not name one
    pub default_model: String,
    /// Enable the `google_search` grounding tool on every request
    pub web_search: bool,
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .field("web_search", &self.web_search)
            .finish()
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("GEMINI_API_KEY").unwrap_or_default(),
            base_url: GEMINI_DEFAULT_BASE_URL.to_string(),
            default_model: GEMINI_DEFAULT_MODEL.to_string(),
            web_search: false,
        }
    }
}

impl GeminiConfig {
    /// Create a new configuration with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Set the base URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the default model
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Enable or disable web search grounding
    pub fn with_web_search(mut self, enabled: bool) -> Self {
        self.web_search = enabled;
        self
    }
}
