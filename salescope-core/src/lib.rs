//! Core records, errors and collaborator traits for Salescope
//!
//! This crate holds the value types every other Salescope crate shares: the
//! sale and line-item records produced by a load, the analysis period, the
//! summarizer request/response types, and the two traits that mark the
//! external seams ([`RecordSource`] and [`Summarizer`]).

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod source;
pub mod summarizer;
pub mod types;

// Re-export commonly used items
pub use error::{Error, Result};
pub use source::RecordSource;
pub use summarizer::Summarizer;
pub use types::{
    message::{Message, Role},
    period::AnalysisPeriod,
    record::{LineItem, RecordSet, Sale, SaleStatus},
    request::{Model, Parameters, Request, RequestBuilder},
    response::{Response, ResponseMetadata, Source, Usage},
};
