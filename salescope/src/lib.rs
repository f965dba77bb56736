//! Salescope - sales analytics for multi-store food businesses
//!
//! Loads sales and line items, computes KPIs, customer segmentation and
//! store, product, channel and state rankings over a period, and feeds the
//! resulting analysis context to a language-model assistant.
//!
//! # Quick Start
//!
//! ```no_run
//! # use salescope::prelude::*;
//! # #[tokio::main]
//! # async fn main() -> Result<(), salescope::Error> {
//! #     #[cfg(feature = "client")]
//! #     {
//!     let config = DashboardConfig::from_env()?;
//!     let mut assistant = Assistant::from_config(&config)?;
//!
//!     if let Some(period) = assistant.default_period().await? {
//!         let response = assistant.ask("Which stores are falling behind?", &period).await?;
//!         println!("{}", response.with_references());
//!     }
//! #     }
//! #     Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Re-export core types
pub use salescope_core::*;

#[cfg(feature = "analytics")]
#[cfg_attr(docsrs, doc(cfg(feature = "analytics")))]
pub mod analytics {
    //! KPI, segmentation and ranking aggregations
    pub use salescope_analytics::*;
}

#[cfg(feature = "store")]
#[cfg_attr(docsrs, doc(cfg(feature = "store")))]
pub mod store {
    //! Record sources
    pub use salescope_store::*;
}

#[cfg(feature = "middleware")]
#[cfg_attr(docsrs, doc(cfg(feature = "middleware")))]
pub mod middleware {
    //! Caching and logging layers
    pub use salescope_middleware::*;
}

#[cfg(feature = "providers")]
#[cfg_attr(docsrs, doc(cfg(feature = "providers")))]
pub mod providers {
    //! Summarizer implementations
    pub use salescope_providers::*;
}

#[cfg(feature = "client")]
#[cfg_attr(docsrs, doc(cfg(feature = "client")))]
pub mod client {
    //! Configuration and the analysis assistant
    pub use salescope_client::*;
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use salescope_core::{
        AnalysisPeriod, Error, LineItem, Message, RecordSet, RecordSource, Request, Response,
        Role, Sale, SaleStatus, Summarizer,
    };

    #[cfg(feature = "analytics")]
    pub use salescope_analytics::{build_context, AnalysisContext, ContextBuilder};

    #[cfg(feature = "client")]
    pub use salescope_client::{Assistant, DashboardConfig};
}
