//! REST API client module for the warehouse backend.
//!
//! This module provides the `ApiClient` for fetching the product catalog,
//! stock movements, operator accounts and write-off acts, posting new
//! movements, and running the advisory external barcode lookup.
//!
//! Requests authenticate with the operator id established at login.

pub mod client;
pub mod error;

pub use client::{ApiClient, Endpoints};
pub use error::ApiError;
