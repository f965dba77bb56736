//! Layers that wrap Salescope's external seams
//!
//! A [`Layer`] wraps a [`RecordSource`] or a [`Summarizer`] and returns a
//! value implementing the same trait, so wrapped and bare collaborators are
//! interchangeable.

#![warn(missing_docs)]

use salescope_core::{RecordSource, Summarizer};

pub mod cache;
pub mod logging;

// Re-export middleware implementations
pub use cache::{CacheKey, CacheLayer, CachedSource, SourceCache};
pub use logging::{LogLevel, LoggingLayer, LoggingSummarizer};

/// Layer trait for composing middleware
pub trait Layer<S> {
    /// The wrapped service
    type Service;

    /// Wrap a service with this layer
    fn layer(&self, service: S) -> Self::Service;
}

/// Extension trait to apply layers to record sources
pub trait SourceExt: RecordSource + Sized {
    /// Apply a layer to this source
    fn layer<L>(self, layer: L) -> L::Service
    where
        L: Layer<Self>,
    {
        layer.layer(self)
    }
}

impl<S: RecordSource> SourceExt for S {}

/// Extension trait to apply layers to summarizers
pub trait SummarizerExt: Summarizer + Sized {
    /// Apply a layer to this summarizer
    fn layer<L>(self, layer: L) -> L::Service
    where
        L: Layer<Self>,
    {
        layer.layer(self)
    }
}

impl<S: Summarizer> SummarizerExt for S {}
