//! # Outlay API Server Library
//!
//! HTTP surface of the Outlay expense-tracking service.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and envelope mapping
//! - `response`: The uniform response envelope
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod response;
pub mod routes;
