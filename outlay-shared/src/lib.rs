//! # Outlay Shared Library
//!
//! This crate contains the data layer shared by the Outlay API server:
//! entity models, storage connection management, the generic collection
//! repository, query-filter builders, and the project-details aggregation
//! pipeline.
//!
//! ## Module Organization
//!
//! - `db`: MongoDB connection management, generic repository, aggregation
//! - `models`: Entity structs mapped to collections
//! - `query`: Query-parameter filter builders and date-window helpers

pub mod db;
pub mod models;
pub mod query;

/// Current version of the Outlay shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
