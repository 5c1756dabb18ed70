//! Storage layer for Outlay
//!
//! This module owns everything that talks to MongoDB:
//!
//! - `connection`: one shared, exactly-once-initialized client handle
//! - `repository`: generic CRUD over a named collection
//! - `aggregate`: the cross-collection project-details pipeline

pub mod aggregate;
pub mod connection;
pub mod repository;

pub use aggregate::ProjectDetailsAggregator;
pub use connection::{ConnectionManager, StoreConfig};
pub use repository::{Persist, Repository};

/// Errors produced by the storage layer.
///
/// `Clone` is required because a failed connection attempt is recorded once
/// and handed back to every caller, past and future (see
/// [`connection::ConnectionManager`]).
#[derive(Debug, Clone, thiserror::Error)]
pub enum DbError {
    /// No document matched the given filter, or an update/delete affected
    /// zero documents.
    #[error("document not found")]
    NotFound,

    /// Establishing the storage connection failed (connect or ping).
    #[error("storage connection failed: {0}")]
    Connection(#[source] mongodb::error::Error),

    /// The driver reported an error during an otherwise-valid operation.
    #[error("storage operation failed: {0}")]
    Driver(#[from] mongodb::error::Error),

    /// A document came back in a shape we could not decode.
    #[error("failed to decode document: {0}")]
    Decode(String),
}
