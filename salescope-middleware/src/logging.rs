//! Logging middleware for summarizer calls

use crate::Layer;
use async_trait::async_trait;
use salescope_core::{Request, Response, Result, Summarizer};
use std::time::Instant;
use tracing::{debug, info, trace, warn};

/// Logging middleware layer
#[derive(Debug, Clone, Default)]
pub struct LoggingLayer {
    /// Log level for the middleware
    pub level: LogLevel,
    /// Whether to log request/response content
    pub log_content: bool,
}

/// Log level for the middleware
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Trace level logging
    Trace,
    /// Debug level logging
    #[default]
    Debug,
    /// Info level logging
    Info,
}

impl LoggingLayer {
    /// Create a new logging layer with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with specific log level
    pub fn with_level(level: LogLevel) -> Self {
        Self {
            level,
            log_content: false,
        }
    }

    /// Enable content logging
    pub fn with_content(mut self) -> Self {
        self.log_content = true;
        self
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = LoggingSummarizer<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LoggingSummarizer {
            inner,
            level: self.level,
            log_content: self.log_content,
        }
    }
}

/// A summarizer that logs every request and its outcome
pub struct LoggingSummarizer<S> {
    inner: S,
    level: LogLevel,
    log_content: bool,
}

impl<S> LoggingSummarizer<S> {
    fn log_request(&self, request: &Request) {
        let instruction_len = request
            .system_instruction
            .as_ref()
            .map_or(0, String::len);
        match self.level {
            LogLevel::Trace => trace!(
                messages = request.messages.len(),
                model = %request.model,
                instruction_len,
                web_search = request.web_search,
                "Sending summarizer request"
            ),
            LogLevel::Debug => debug!(
                messages = request.messages.len(),
                model = %request.model,
                web_search = request.web_search,
                "Sending summarizer request"
            ),
            LogLevel::Info => info!(
                messages = request.messages.len(),
                model = %request.model,
                "Sending summarizer request"
            ),
        }

        if self.log_content {
            if let Some(question) = request.messages.last() {
                debug!(role = ?question.role, content = %question.content, "Question");
            }
            if self.level == LogLevel::Trace {
                if let Some(instruction) = &request.system_instruction {
                    trace!(content = %instruction, "System instruction");
                }
            }
        }
    }

    fn log_response(&self, response: &Response, duration_ms: u128) {
        match self.level {
            LogLevel::Trace => trace!(
                content_length = response.content.len(),
                sources = response.sources.len(),
                model = ?response.metadata.model,
                usage = ?response.metadata.usage,
                finish_reason = ?response.metadata.finish_reason,
                duration_ms,
                "Received summarizer response"
            ),
            LogLevel::Debug => debug!(
                content_length = response.content.len(),
                sources = response.sources.len(),
                usage = ?response.metadata.usage,
                duration_ms,
                "Received summarizer response"
            ),
            LogLevel::Info => info!(
                content_length = response.content.len(),
                sources = response.sources.len(),
                duration_ms,
                "Received summarizer response"
            ),
        }

        if self.log_content && self.level == LogLevel::Trace {
            trace!(content = %response.content, "Response content");
        }
    }
}

#[async_trait]
impl<S: Summarizer> Summarizer for LoggingSummarizer<S> {
    async fn request(&self, request: Request) -> Result<Response> {
        self.log_request(&request);

        let start_time = Instant::now();
        let result = self.inner.request(request).await;
        let duration_ms = start_time.elapsed().as_millis();

        match &result {
            Ok(response) => self.log_response(response, duration_ms),
            Err(error) => warn!(%error, duration_ms, "Summarizer request failed"),
        }
        result
    }
}
