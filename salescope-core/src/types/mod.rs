//! Core types used throughout Salescope

pub mod message;
pub mod period;
pub mod record;
pub mod request;
pub mod response;

/// A sale identifier
pub type SaleId = i64;

/// A customer identifier
pub type CustomerId = i64;
