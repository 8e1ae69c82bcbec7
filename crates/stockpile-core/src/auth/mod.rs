//! Authentication module for managing operator sessions and credentials.
//!
//! This module provides:
//! - `Session`: file-backed operator session with expiry
//! - `CredentialStore`: secure OS-level credential storage via keyring
//!
//! Sessions are persisted to disk and expire after 12 hours.

pub mod credentials;
pub mod session;

pub use credentials::CredentialStore;
pub use session::{Session, SessionData};
