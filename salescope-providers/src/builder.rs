//! Builder pattern for provider construction
//!
//! Builders follow a fluent interface: configuration methods return `self`
//! and `build()` constructs the provider.
//!
//! # Examples
//!
//! ```no_run
//! use salescope_providers::builder::GeminiBuilder;
//!
//! let provider = GeminiBuilder::new("api-key")
//!     .default_model("gemini-2.5-pro")
//!     .web_search(true)
//!     .build()
//!     .expect("Failed to build provider");
//! ```

use crate::gemini::{Gemini, GeminiConfig};
use crate::http::{HttpClient, ReqwestClient};
use salescope_core::Error;
use std::sync::Arc;

/// Common builder trait for all providers
pub trait ProviderBuilder: Sized {
    /// The provider type being built
    type Provider;

    /// Set a custom HTTP client
    ///
    /// This allows injecting a custom HTTP client implementation,
    /// useful for testing or special networking requirements.
    fn with_client(self, client: Arc<dyn HttpClient>) -> Self;

    /// Build the provider
    fn build(self) -> Result<Self::Provider, Error>;
}

/// Builder for constructing Gemini providers
pub struct GeminiBuilder {
    api_key: String,
    base_url: Option<String>,
    default_model: Option<String>,
    web_search: bool,
    client: Option<Arc<dyn HttpClient>>,
}

impl GeminiBuilder {
    /// Create a new Gemini builder with API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            default_model: None,
            web_search: false,
            client: None,
        }
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the default model
    pub fn default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = Some(model.into());
        self
    }

    /// Enable the web search grounding tool
    pub fn web_search(mut self, enabled: bool) -> Self {
        self.web_search = enabled;
        self
    }

    /// Set a custom HTTP client
    pub fn with_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the Gemini provider
    pub fn build(self) -> Result<Gemini, Error> {
        if self.api_key.trim().is_empty() {
            return Err(Error::Configuration("Gemini API key is empty".into()));
        }

        let mut config = GeminiConfig::new(self.api_key).with_web_search(self.web_search);
        if let Some(base_url) = self.base_url {
            config = config.with_base_url(base_url);
        }
        if let Some(model) = self.default_model {
            config = config.with_default_model(model);
        }

        let client: Arc<dyn HttpClient> = match self.client {
            Some(client) => client,
            None => Arc::new(ReqwestClient::new()?),
        };

        Ok(Gemini::new(config, client))
    }
}

impl ProviderBuilder for GeminiBuilder {
    type Provider = Gemini;

    fn with_client(self, client: Arc<dyn HttpClient>) -> Self {
        Self {
            client: Some(client),
            ..self
        }
    }

    fn build(self) -> Result<Self::Provider, Error> {
        GeminiBuilder::build(self)
    }
}
