//! Aggregations over Salescope sale records
//!
//! Everything here is synchronous and pure: functions borrow the loaded
//! records and return new values.

pub mod context;
pub mod customers;
pub mod filter;
pub mod format;
pub mod kpi;
pub mod ranking;
pub mod views;

pub use context::{build_context, AnalysisContext, ContextBuilder, ContextLimits};
pub use customers::{
    classify_customers, classify_customers_in_period, first_purchases, segment_customers,
    CustomerSegmentation, CustomerType, SegmentCounts, SegmentationStrategy,
};
pub use filter::{filter_by_period, filter_to_period, Dated};
pub use format::CurrencyFormat;
pub use kpi::{compute_general_kpis, GeneralKpis};
pub use ranking::{
    group_by, rank, rank_by, rank_channels, rank_products, rank_states, rank_stores, Direction,
    Group, Measure,
};
