//! Dashboard configuration loaded from the environment

use chrono_tz::Tz;
use salescope_analytics::{ContextLimits, CurrencyFormat};
use salescope_core::{Error, Result};
use salescope_middleware::cache::{DEFAULT_MAX_SOURCES, DEFAULT_TTL};
use salescope_middleware::{
    CacheLayer, CachedSource, LoggingLayer, LoggingSummarizer, SourceExt, SummarizerExt,
};
use salescope_providers::constants::{GEMINI_DEFAULT_BASE_URL, GEMINI_DEFAULT_MODEL};
use salescope_providers::{Gemini, GeminiBuilder};
use salescope_store::config::DEFAULT_TIMEZONE;
use salescope_store::{parse_timezone, DatabaseConfig, PostgresSource};
use std::fmt;
use std::time::Duration;

/// Settings for the summarization provider
///
/// `Debug` masks the API key.
#[derive(Clone)]
pub struct ProviderConfig {
    /// Gemini API key
    pub api_key: String,
    /// Model name
    pub model: String,
    /// API base URL
    pub base_url: String,
    /// Ground answers with web search
    pub web_search: bool,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"***")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("web_search", &self.web_search)
            .finish()
    }
}

impl ProviderConfig {
    /// Create a provider configuration with default model and URL
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: GEMINI_DEFAULT_MODEL.to_string(),
            base_url: GEMINI_DEFAULT_BASE_URL.to_string(),
            web_search: true,
        }
    }

    /// Set the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the base URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Enable or disable web search
    pub fn with_web_search(mut self, enabled: bool) -> Self {
        self.web_search = enabled;
        self
    }

    /// Build the Gemini provider
    pub fn build(&self) -> Result<Gemini> {
        GeminiBuilder::new(&self.api_key)
            .base_url(&self.base_url)
            .default_model(&self.model)
            .web_search(self.web_search)
            .build()
    }
}

/// Settings for the record cache
#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    /// How long loaded records stay fresh
    pub ttl: Duration,
    /// How many sources the cache holds
    pub max_sources: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            max_sources: DEFAULT_MAX_SOURCES,
        }
    }
}

impl CacheConfig {
    /// Set the TTL
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// The cache layer these settings describe
    pub fn layer(&self) -> CacheLayer {
        CacheLayer::with_capacity(self.max_sources, self.ttl)
    }
}

/// How results are presented
#[derive(Debug, Clone)]
pub struct ReportingConfig {
    /// Timezone sale timestamps are reported in
    pub timezone: Tz,
    /// Currency formatting for display documents
    pub currency: CurrencyFormat,
    /// Ranking sizes in the analysis context
    pub limits: ContextLimits,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE,
            currency: CurrencyFormat::default(),
            limits: ContextLimits::default(),
        }
    }
}

impl ReportingConfig {
    /// Set the timezone
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    /// Set the currency format
    pub fn with_currency(mut self, currency: CurrencyFormat) -> Self {
        self.currency = currency;
        self
    }

    /// Set the ranking sizes
    pub fn with_limits(mut self, limits: ContextLimits) -> Self {
        self.limits = limits;
        self
    }
}

/// Everything the dashboard needs to run
///
/// # Example
///
/// ```no_run
/// use salescope_client::DashboardConfig;
///
/// let config = DashboardConfig::from_env().expect("configuration");
/// let source = config.source();
/// ```
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Database connection
    pub database: DatabaseConfig,
    /// Summarization provider
    pub provider: ProviderConfig,
    /// Record cache
    pub cache: CacheConfig,
    /// Presentation settings
    pub reporting: ReportingConfig,
}

impl DashboardConfig {
    /// Create a configuration with default cache and reporting settings
    pub fn new(database: DatabaseConfig, provider: ProviderConfig) -> Self {
        let reporting = ReportingConfig::default().with_timezone(database.timezone);
        Self {
            database,
            provider,
            cache: CacheConfig::default(),
            reporting,
        }
    }

    /// Load `.env` if present, then read the process environment
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenv::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the settings through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let database = DatabaseConfig::from_lookup(&lookup)?;

        let api_key = get("GEMINI_API_KEY")
            .ok_or_else(|| Error::Configuration("GEMINI_API_KEY is not set".into()))?;
        let mut provider = ProviderConfig::new(api_key);
        if let Some(model) = get("GEMINI_MODEL") {
            provider = provider.with_model(model);
        }
        if let Some(url) = get("GEMINI_BASE_URL") {
            provider = provider.with_base_url(url);
        }

        let mut config = Self::new(database, provider);

        if let Some(ttl) = get("SALESCOPE_CACHE_TTL_SECS") {
            let secs = ttl.parse::<u64>().map_err(|_| {
                Error::Configuration(format!("Invalid SALESCOPE_CACHE_TTL_SECS: {}", ttl))
            })?;
            config.cache = config.cache.with_ttl(Duration::from_secs(secs));
        }
        if let Some(name) = get("SALESCOPE_TIMEZONE") {
            config = config.with_timezone(parse_timezone(&name)?);
        }
        Ok(config)
    }

    /// Set the reporting timezone for both loading and presentation
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.database.timezone = timezone;
        self.reporting.timezone = timezone;
        self
    }

    /// Set the cache settings
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// Set the presentation settings
    pub fn with_reporting(mut self, reporting: ReportingConfig) -> Self {
        self.reporting = reporting;
        self.database.timezone = self.reporting.timezone;
        self
    }

    /// A cached PostgreSQL source; connections open on first load
    pub fn source(&self) -> CachedSource<PostgresSource> {
        PostgresSource::connect_lazy(&self.database).layer(self.cache.layer())
    }

    /// The Gemini provider wrapped in request logging
    pub fn summarizer(&self) -> Result<LoggingSummarizer<Gemini>> {
        Ok(self.provider.build()?.layer(LoggingLayer::new()))
    }
}
