//! Series and tables for the dashboard screens
//!
//! Every view takes completed, period-filtered sales and is pure.

pub mod brand;
pub mod customers;
pub mod stores;

pub use brand::{brand_overview, BrandOverview, ChannelRevenue, DailyPoint, HourlyPoint};
pub use customers::{customer_analytics, CustomerAnalytics, CustomerKpis, LoyaltyBucket, TopCustomer};
pub use stores::{
    available_states, available_stores, store_leaderboard, unit_detail, ChannelNames,
    StoreLeaderboard, UnitDetail, UnitFilter,
};
