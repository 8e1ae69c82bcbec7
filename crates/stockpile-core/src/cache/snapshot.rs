//! Persisted offline snapshot of the remote product and movement lists.
//!
//! The snapshot is a wholesale mirror: each field is replaced in full on a
//! successful refresh, never merged element-wise, and the file is only
//! rewritten through `SnapshotStore::save`. A missing or unreadable file is
//! the empty snapshot, never an error.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{Movement, Product};

/// Snapshot file name inside the data directory
const SNAPSHOT_FILE: &str = "offline_stock.json";

/// Consider the snapshot stale after 1 hour.
/// Balances freshness with reducing unnecessary refreshes of slowly-changing stock data.
const SNAPSHOT_STALE_MINUTES: i64 = 60;

/// The last known-good view of the remote lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedSnapshot {
    pub products: Vec<Product>,
    pub movements: Vec<Movement>,
    pub last_sync: DateTime<Utc>,
}

impl CachedSnapshot {
    pub fn empty() -> Self {
        Self {
            products: Vec::new(),
            movements: Vec::new(),
            last_sync: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && self.movements.is_empty()
    }

    /// Merge a patch onto this snapshot: supplied fields replace their
    /// counterparts in full, absent fields survive, and `last_sync` is
    /// stamped with `now`. Total, no other side effects.
    pub fn apply(mut self, patch: SnapshotPatch, now: DateTime<Utc>) -> Self {
        if let Some(products) = patch.products {
            self.products = products;
        }
        if let Some(movements) = patch.movements {
            self.movements = movements;
        }
        self.last_sync = now;
        self
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.last_sync).num_minutes()
    }

    pub fn is_stale(&self) -> bool {
        self.age_minutes() > SNAPSHOT_STALE_MINUTES
    }

    pub fn age_display(&self) -> String {
        if self.is_empty() {
            return "never".to_string();
        }
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew (negative ages)
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        }
    }
}

impl Default for CachedSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// Partial update applied through `CachedSnapshot::apply`.
#[derive(Debug, Clone, Default)]
pub struct SnapshotPatch {
    pub products: Option<Vec<Product>>,
    pub movements: Option<Vec<Movement>>,
}

impl SnapshotPatch {
    pub fn products(products: Vec<Product>) -> Self {
        Self {
            products: Some(products),
            movements: None,
        }
    }

    pub fn both(products: Vec<Product>, movements: Vec<Movement>) -> Self {
        Self {
            products: Some(products),
            movements: Some(movements),
        }
    }
}

/// Owns the persisted mirror and its in-memory copy.
pub struct SnapshotStore {
    data_dir: PathBuf,
    current: CachedSnapshot,
}

impl SnapshotStore {
    /// Open the store, loading any persisted snapshot. Fails soft: an
    /// absent or unparsable file yields the empty snapshot.
    pub fn open(data_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;
        let current = Self::load_from(&data_dir);
        Ok(Self { data_dir, current })
    }

    fn load_from(data_dir: &PathBuf) -> CachedSnapshot {
        let path = data_dir.join(SNAPSHOT_FILE);
        if !path.exists() {
            return CachedSnapshot::empty();
        }
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(error = %e, "Failed to read snapshot file, starting empty");
                return CachedSnapshot::empty();
            }
        };
        match serde_json::from_str(&contents) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Snapshot file unreadable, starting empty");
                CachedSnapshot::empty()
            }
        }
    }

    pub fn snapshot(&self) -> &CachedSnapshot {
        &self.current
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Apply a patch to the in-memory snapshot, persist the result, and
    /// return the new snapshot. The only mutator of the persisted mirror.
    pub fn save(&mut self, patch: SnapshotPatch) -> Result<&CachedSnapshot> {
        let updated = self.current.clone().apply(patch, Utc::now());
        let contents = serde_json::to_string_pretty(&updated)?;
        std::fs::write(self.snapshot_path(), contents)
            .context("Failed to write snapshot file")?;
        debug!(
            products = updated.products.len(),
            movements = updated.movements.len(),
            "Snapshot saved"
        );
        self.current = updated;
        Ok(&self.current)
    }

    /// Delete the persisted mirror and reset to empty. For explicit
    /// "reset offline data" actions only.
    pub fn clear(&mut self) -> Result<()> {
        let path = self.snapshot_path();
        if path.exists() {
            std::fs::remove_file(&path).context("Failed to remove snapshot file")?;
        }
        self.current = CachedSnapshot::empty();
        Ok(())
    }

    fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(SNAPSHOT_FILE)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MovementKind;
    use chrono::Duration;

    fn product(id: i64, quantity: f64) -> Product {
        Product {
            id,
            name: format!("Product {}", id),
            inventory_number: format!("P-{:03}", id),
            quantity,
            min_stock: 10.0,
            price: 5.0,
            batch: None,
            unit: None,
        }
    }

    fn movement(product_name: &str) -> Movement {
        Movement {
            created_at: "2024-10-03T09:12:00".to_string(),
            product_name: product_name.to_string(),
            kind: MovementKind::Incoming,
            quantity: 20.0,
            user_name: "operator".to_string(),
        }
    }

    #[test]
    fn test_apply_replaces_patched_fields_keeps_rest() {
        let base = CachedSnapshot::empty().apply(
            SnapshotPatch::both(vec![product(1, 5.0)], vec![movement("Product 1")]),
            Utc::now(),
        );

        let now = Utc::now();
        let patched = base.clone().apply(SnapshotPatch::products(vec![product(2, 7.0)]), now);

        assert_eq!(patched.products.len(), 1);
        assert_eq!(patched.products[0].id, 2);
        // Movements were not in the patch and survive wholesale
        assert_eq!(patched.movements, base.movements);
        assert_eq!(patched.last_sync, now);
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SnapshotStore::open(dir.path().to_path_buf()).expect("open store");
        assert!(store.is_empty());
    }

    #[test]
    fn test_open_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(SNAPSHOT_FILE), "{not valid json").expect("write");
        let store = SnapshotStore::open(dir.path().to_path_buf()).expect("open store");
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_then_reload_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = SnapshotStore::open(dir.path().to_path_buf()).expect("open store");
        store
            .save(SnapshotPatch::both(
                vec![product(1, 5.0), product(2, 12.0)],
                vec![movement("Product 1")],
            ))
            .expect("save");
        let saved = store.snapshot().clone();

        // Simulate a restart: a fresh store over the same directory
        let reloaded = SnapshotStore::open(dir.path().to_path_buf()).expect("reopen store");
        assert_eq!(*reloaded.snapshot(), saved);
        assert_eq!(reloaded.snapshot().last_sync, saved.last_sync);
    }

    #[test]
    fn test_clear_removes_file_and_resets() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = SnapshotStore::open(dir.path().to_path_buf()).expect("open store");
        store
            .save(SnapshotPatch::products(vec![product(1, 5.0)]))
            .expect("save");
        assert!(!store.is_empty());

        store.clear().expect("clear");
        assert!(store.is_empty());
        assert!(!dir.path().join(SNAPSHOT_FILE).exists());

        let reloaded = SnapshotStore::open(dir.path().to_path_buf()).expect("reopen store");
        assert!(reloaded.is_empty());
    }

    #[test]
    fn test_age_display() {
        let mut snapshot = CachedSnapshot::empty();
        assert_eq!(snapshot.age_display(), "never");

        snapshot = snapshot.apply(SnapshotPatch::products(vec![product(1, 5.0)]), Utc::now());
        assert_eq!(snapshot.age_display(), "just now");
        assert!(!snapshot.is_stale());

        snapshot.last_sync = Utc::now() - Duration::minutes(90);
        assert_eq!(snapshot.age_display(), "1h ago");
        assert!(snapshot.is_stale());
    }
}
