//! High-level Salescope API
//!
//! [`DashboardConfig`] reads the environment and wires the record source
//! and summarizer; [`Assistant`] answers questions about a period using the
//! analysis context.

#![warn(missing_docs)]

mod assistant;
pub mod config;
pub mod prompt;

pub use assistant::Assistant;
pub use config::{CacheConfig, DashboardConfig, ProviderConfig, ReportingConfig};
pub use prompt::PromptTemplate;

/// Prelude module for convenient imports
pub mod prelude {
    pub use super::{Assistant, DashboardConfig};
    pub use salescope_core::{AnalysisPeriod, Message, Response, Role};
}
