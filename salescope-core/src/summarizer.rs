//! Summarizer trait for the external language-model call

use crate::error::Result;
use crate::types::request::Request;
use crate::types::response::Response;
use async_trait::async_trait;
use std::sync::Arc;

/// The external summarization collaborator
///
/// Failures (network errors, non-success statuses) are returned to the
/// caller as-is; implementations do not retry.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Send a request and get a complete response
    async fn request(&self, request: Request) -> Result<Response>;
}

#[async_trait]
impl<S: Summarizer + ?Sized> Summarizer for Arc<S> {
    async fn request(&self, request: Request) -> Result<Response> {
        (**self).request(request).await
    }
}
