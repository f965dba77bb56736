//! Gemini provider implementation
//!
//! Sends the conversation to the `generateContent` endpoint and returns the
//! first candidate's text along with any web grounding sources.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use salescope_core::{Error, Request, Response, Summarizer};
use std::sync::Arc;
use url::Url;

use crate::constants::{GEMINI_API_KEY_HEADER, GEMINI_PROVIDER};
use crate::error;
use crate::gemini::{config::GeminiConfig, converter::GeminiConverter, parser::GeminiParser};
use crate::http::{json_headers, HttpClient, ReqwestClient};
use crate::traits::{RequestConverter, ResponseParser};

/// Google Gemini provider
///
/// # Example
///
/// ```no_run
/// use salescope_providers::Gemini;
///
/// let provider = Gemini::with_api_key("your-api-key").expect("client");
/// ```
#[derive(Clone)]
pub struct Gemini {
    config: GeminiConfig,
    client: Arc<dyn HttpClient>,
    converter: GeminiConverter,
    parser: GeminiParser,
}

impl Gemini {
    /// Create a new Gemini provider with the given configuration and client
    pub fn new(config: GeminiConfig, client: Arc<dyn HttpClient>) -> Self {
        let converter = GeminiConverter {
            web_search: config.web_search,
        };
        Self {
            config,
            client,
            converter,
            parser: GeminiParser,
        }
    }

    /// Create a new Gemini provider with just an API key
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self, Error> {
        let client = Arc::new(ReqwestClient::new()?);
        Ok(Self::new(GeminiConfig::new(api_key), client))
    }

    /// The provider configuration
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// `{base_url}/models/{model}:generateContent`
    pub fn endpoint(&self, model: &str) -> Result<Url, Error> {
        let model = if model.is_empty() {
            self.config.default_model.as_str()
        } else {
            model
        };
        let base = self.config.base_url.trim_end_matches('/');
        Url::parse(&format!("{}/models/{}:generateContent", base, model))
            .map_err(|e| Error::Configuration(format!("Invalid Gemini base URL: {}", e)))
    }

    /// JSON headers carrying the API key
    ///
    /// The key never goes into the URL, so transport errors cannot echo it.
    pub fn headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = json_headers();
        let mut key = HeaderValue::from_str(&self.config.api_key)
            .map_err(|_| Error::Configuration("Gemini API key is not a valid header value".into()))?;
        key.set_sensitive(true);
        headers.insert(GEMINI_API_KEY_HEADER, key);
        Ok(headers)
    }
}

#[async_trait]
impl Summarizer for Gemini {
    async fn request(&self, request: Request) -> Result<Response, Error> {
        let url = self.endpoint(&request.model.0)?;
        let headers = self.headers()?;
        let messages = request.messages.len();
        let body = self.converter.convert_request(request).await?;

        tracing::trace!(messages, "sending generateContent request");

        let value = self
            .client
            .post(url.as_str(), headers, body)
            .await
            .map_err(|e| error::attribute(e, GEMINI_PROVIDER))?;

        self.parser.parse_response(value).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use salescope_core::Message;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingClient {
        calls: Mutex<Vec<(String, HeaderMap, Value)>>,
        reply: Option<Value>,
    }

    #[async_trait]
    impl HttpClient for RecordingClient {
        async fn post(&self, url: &str, headers: HeaderMap, body: Value) -> Result<Value, Error> {
            self.calls.lock().unwrap().push((url.to_string(), headers, body));
            match &self.reply {
                Some(reply) => Ok(reply.clone()),
                None => Err(error::provider_error("http", "HTTP 429: quota", Some(429))),
            }
        }
    }

    fn config() -> GeminiConfig {
        GeminiConfig::new("secret").with_base_url("https://gemini.test/v1beta/")
    }

    #[test]
    fn test_endpoint() {
        let provider = Gemini::new(config(), Arc::new(RecordingClient::default()));
        assert_eq!(
            provider.endpoint("gemini-2.5-flash").unwrap().as_str(),
            "https://gemini.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert!(provider
            .endpoint("")
            .unwrap()
            .path()
            .ends_with("gemini-2.5-flash:generateContent"));
    }

    #[tokio::test]
    async fn test_request_round_trip() {
        let client = Arc::new(RecordingClient {
            reply: Some(json!({
                "candidates": [{"content": {"parts": [{"text": "All good."}]}}]
            })),
            ..Default::default()
        });
        let provider = Gemini::new(config().with_web_search(true), client.clone());

        let request = Request::builder()
            .message(Message::user("Summarize"))
            .system_instruction("context")
            .build();
        let response = provider.request(request).await.unwrap();
        assert_eq!(response.content, "All good.");

        let calls = client.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].0.ends_with(":generateContent"));
        assert!(!calls[0].0.contains("secret"));
        assert_eq!(calls[0].1[GEMINI_API_KEY_HEADER], "secret");
        assert!(calls[0].1[GEMINI_API_KEY_HEADER].is_sensitive());
        assert_eq!(calls[0].2["tools"], json!([{"google_search": {}}]));
    }

    #[test]
    fn test_invalid_api_key_header_is_configuration_error() {
        let provider = Gemini::new(
            GeminiConfig::new("bad\nkey"),
            Arc::new(RecordingClient::default()),
        );
        assert!(matches!(provider.headers(), Err(Error::Configuration(_))));
    }

    #[tokio::test]
    async fn test_error_status_is_attributed() {
        let provider = Gemini::new(config(), Arc::new(RecordingClient::default()));
        let err = provider
            .request(Request::new(vec![Message::user("hi")]))
            .await
            .unwrap_err();
        match err {
            Error::Provider {
                provider, status, ..
            } => {
                assert_eq!(provider, GEMINI_PROVIDER);
                assert_eq!(status, Some(429));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
