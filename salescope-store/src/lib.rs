//! Record sources for Salescope
//!
//! [`PostgresSource`] loads the sales and line-item record sets from the
//! operational database; [`MemorySource`] serves records that are already
//! in memory. Both implement [`salescope_core::RecordSource`].

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod queries;
mod rows;

pub use config::{parse_timezone, DatabaseConfig};
pub use error::{LoadError, LoadResult};
pub use memory::MemorySource;
pub use postgres::PostgresSource;
