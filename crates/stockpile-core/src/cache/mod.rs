//! Local caching module for offline data access.
//!
//! This module provides the `SnapshotStore` for mirroring the last
//! successfully fetched product and movement lists to disk, and the
//! `Connectivity` flag the refresh protocol consults before touching the
//! network. Snapshots persist as JSON and are considered stale after 60
//! minutes.

pub mod connectivity;
pub mod snapshot;

pub use connectivity::Connectivity;
pub use snapshot::{CachedSnapshot, SnapshotPatch, SnapshotStore};
