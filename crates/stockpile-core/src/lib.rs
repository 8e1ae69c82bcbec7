//! Core library for stockpile - a warehouse stock console that works offline.
//!
//! This crate contains everything below the terminal UI:
//!
//! - `models`: products, movements, users, write-off acts
//! - `api`: the `ApiClient` for the warehouse REST endpoints
//! - `cache`: the connectivity flag and the persisted offline snapshot
//! - `store`: the refresh protocol joining network and cache
//! - `scan`: barcode scan buffering and the receiving session
//! - `report`: printable write-off act documents
//! - `auth`: operator sessions and credential storage
//! - `config`: application configuration

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod models;
pub mod report;
pub mod scan;
pub mod store;

pub use api::{ApiClient, ApiError};
pub use cache::{CachedSnapshot, Connectivity, SnapshotPatch, SnapshotStore};
pub use config::Config;
pub use store::{DataSource, RefreshOutcome, RemoteCatalog, StockStore};
