//! The refresh protocol: one read path for "current products and
//! movements" that degrades to the offline snapshot when the network is
//! unreachable or the fetch fails.
//!
//! The store never lets a failure escape `refresh`; every outcome is a
//! `RefreshOutcome` with a `DataSource` telling the UI what to announce.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::cache::{Connectivity, SnapshotPatch, SnapshotStore};
use crate::models::{Movement, Product};

/// The remote side of the refresh protocol. `ApiClient` implements it; the
/// seam exists so the protocol can be driven against a stub.
#[async_trait]
pub trait RemoteCatalog {
    async fn fetch_products(&self) -> Result<Vec<Product>>;
    async fn fetch_movements(&self) -> Result<Vec<Movement>>;
}

#[async_trait]
impl RemoteCatalog for ApiClient {
    async fn fetch_products(&self) -> Result<Vec<Product>> {
        ApiClient::fetch_products(self).await
    }

    async fn fetch_movements(&self) -> Result<Vec<Movement>> {
        ApiClient::fetch_movements(self).await
    }
}

/// Where the data in a `RefreshOutcome` came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// Fresh from the network; the snapshot was updated.
    Network,
    /// Served from the snapshot without attempting the network (offline).
    CachedOffline,
    /// The network was attempted and failed; served from the snapshot.
    CachedFallback,
    /// The network failed and no snapshot exists; nothing to show.
    Unavailable,
}

impl DataSource {
    /// Non-blocking notice for the status bar, if this source warrants one.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            DataSource::Network => None,
            DataSource::CachedOffline => Some("Offline - showing cached data"),
            DataSource::CachedFallback => Some("Connection error - showing cached data"),
            DataSource::Unavailable => Some("Connection error - no cached data available"),
        }
    }
}

/// Result of one refresh. Never an error: failures degrade to a cached or
/// empty view, with the underlying message kept for diagnostics.
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub products: Vec<Product>,
    pub movements: Vec<Movement>,
    pub source: DataSource,
    pub error: Option<String>,
}

/// Joins the remote catalog, the offline snapshot and the connectivity
/// flag behind a single refresh entry point.
///
/// Refreshes take `&mut self`, so overlapping invocations serialize at the
/// borrow (or at the `tokio::sync::Mutex` wrapping the store in the UI)
/// rather than racing.
pub struct StockStore<A: RemoteCatalog> {
    remote: A,
    snapshots: SnapshotStore,
    connectivity: Arc<Connectivity>,
}

impl<A: RemoteCatalog> StockStore<A> {
    pub fn new(remote: A, snapshots: SnapshotStore, connectivity: Arc<Connectivity>) -> Self {
        Self {
            remote,
            snapshots,
            connectivity,
        }
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    pub fn snapshots(&self) -> &SnapshotStore {
        &self.snapshots
    }

    /// The view available before any refresh: whatever the snapshot holds.
    pub fn cached_view(&self) -> RefreshOutcome {
        let snapshot = self.snapshots.snapshot();
        RefreshOutcome {
            products: snapshot.products.clone(),
            movements: snapshot.movements.clone(),
            source: DataSource::CachedOffline,
            error: None,
        }
    }

    /// Run the refresh protocol.
    ///
    /// Offline with a non-empty snapshot: serve the snapshot, no network
    /// call. Otherwise fetch products and movements concurrently; both must
    /// succeed before the snapshot is replaced. Any failure after
    /// attempting the network degrades to the snapshot when one exists,
    /// or to an empty `Unavailable` outcome when it does not.
    pub async fn refresh(&mut self) -> RefreshOutcome {
        if !self.connectivity.is_online() && !self.snapshots.is_empty() {
            info!("Offline - serving cached snapshot");
            return self.cached_view();
        }

        let (products_res, movements_res) =
            tokio::join!(self.remote.fetch_products(), self.remote.fetch_movements());

        match (products_res, movements_res) {
            (Ok(products), Ok(movements)) => {
                if let Err(e) = self
                    .snapshots
                    .save(SnapshotPatch::both(products.clone(), movements.clone()))
                {
                    // The fetch still succeeded; the mirror is just behind.
                    warn!(error = %e, "Failed to persist snapshot");
                }
                debug!(
                    products = products.len(),
                    movements = movements.len(),
                    "Refresh complete"
                );
                RefreshOutcome {
                    products,
                    movements,
                    source: DataSource::Network,
                    error: None,
                }
            }
            (products_res, movements_res) => {
                let message = [products_res.err(), movements_res.err()]
                    .into_iter()
                    .flatten()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("; ");
                warn!(error = %message, "Refresh failed");

                if self.snapshots.is_empty() {
                    RefreshOutcome {
                        products: Vec::new(),
                        movements: Vec::new(),
                        source: DataSource::Unavailable,
                        error: Some(message),
                    }
                } else {
                    let mut outcome = self.cached_view();
                    outcome.source = DataSource::CachedFallback;
                    outcome.error = Some(message);
                    outcome
                }
            }
        }
    }

    /// Explicit "reset offline data" action.
    pub fn clear_snapshot(&mut self) -> Result<()> {
        self.snapshots.clear()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MovementKind;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct StubRemote {
        products: Option<Vec<Product>>,
        movements: Option<Vec<Movement>>,
        calls: Arc<AtomicUsize>,
    }

    impl StubRemote {
        fn succeeding(products: Vec<Product>, movements: Vec<Movement>) -> Self {
            Self {
                products: Some(products),
                movements: Some(movements),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing() -> Self {
            Self {
                products: None,
                movements: None,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl RemoteCatalog for StubRemote {
        async fn fetch_products(&self) -> Result<Vec<Product>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.products
                .clone()
                .ok_or_else(|| anyhow::anyhow!("connection refused"))
        }

        async fn fetch_movements(&self) -> Result<Vec<Movement>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.movements
                .clone()
                .ok_or_else(|| anyhow::anyhow!("connection refused"))
        }
    }

    fn product(id: i64) -> Product {
        Product {
            id,
            name: format!("Product {}", id),
            inventory_number: format!("P-{:03}", id),
            quantity: 4.0,
            min_stock: 10.0,
            price: 2.5,
            batch: None,
            unit: None,
        }
    }

    fn movement() -> Movement {
        Movement {
            created_at: "2024-10-01T08:00:00".to_string(),
            product_name: "Product 1".to_string(),
            kind: MovementKind::Outgoing,
            quantity: -3.0,
            user_name: "operator".to_string(),
        }
    }

    fn store_with(
        dir: &tempfile::TempDir,
        remote: StubRemote,
        online: bool,
    ) -> StockStore<StubRemote> {
        let snapshots = SnapshotStore::open(dir.path().to_path_buf()).expect("open store");
        StockStore::new(remote, snapshots, Arc::new(Connectivity::new(online)))
    }

    #[tokio::test]
    async fn test_refresh_online_replaces_snapshot() {
        let dir = tempfile::tempdir().expect("tempdir");
        let remote = StubRemote::succeeding(vec![product(1)], vec![movement()]);
        let mut store = store_with(&dir, remote, true);

        let outcome = store.refresh().await;
        assert_eq!(outcome.source, DataSource::Network);
        assert_eq!(outcome.products.len(), 1);
        assert!(!store.snapshots().is_empty());
    }

    #[tokio::test]
    async fn test_offline_with_cache_skips_network() {
        let dir = tempfile::tempdir().expect("tempdir");

        // Seed the snapshot through a successful online refresh
        let seed = StubRemote::succeeding(vec![product(1)], vec![movement()]);
        let mut store = store_with(&dir, seed, true);
        let seeded = store.refresh().await;

        // Go offline with a remote that counts calls
        let remote = StubRemote::failing();
        let calls = Arc::clone(&remote.calls);
        let snapshots = SnapshotStore::open(dir.path().to_path_buf()).expect("reopen");
        let mut store = StockStore::new(remote, snapshots, Arc::new(Connectivity::new(false)));

        let outcome = store.refresh().await;
        assert_eq!(calls.load(Ordering::SeqCst), 0, "no network call while offline");
        assert_eq!(outcome.source, DataSource::CachedOffline);
        assert_eq!(outcome.products, seeded.products);
        assert_eq!(outcome.movements, seeded.movements);
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_snapshot_unchanged() {
        let dir = tempfile::tempdir().expect("tempdir");
        let seed = StubRemote::succeeding(vec![product(1), product(2)], vec![movement()]);
        let mut store = store_with(&dir, seed, true);
        store.refresh().await;

        let path = dir.path().join("offline_stock.json");
        let before = std::fs::read_to_string(&path).expect("read snapshot");

        let snapshots = SnapshotStore::open(dir.path().to_path_buf()).expect("reopen");
        let mut store = StockStore::new(StubRemote::failing(), snapshots, Arc::new(Connectivity::new(true)));
        let outcome = store.refresh().await;

        assert_eq!(outcome.source, DataSource::CachedFallback);
        assert!(outcome.error.is_some());
        let after = std::fs::read_to_string(&path).expect("read snapshot");
        assert_eq!(before, after, "failed fetch must not touch the persisted snapshot");
    }

    #[tokio::test]
    async fn test_partial_failure_degrades_to_cache() {
        let dir = tempfile::tempdir().expect("tempdir");
        let seed = StubRemote::succeeding(vec![product(1)], vec![movement()]);
        let mut store = store_with(&dir, seed, true);
        store.refresh().await;

        // Products succeed, movements fail: the whole refresh is a failure
        let remote = StubRemote {
            products: Some(vec![product(9)]),
            movements: None,
            calls: Arc::new(AtomicUsize::new(0)),
        };
        let snapshots = SnapshotStore::open(dir.path().to_path_buf()).expect("reopen");
        let mut store = StockStore::new(remote, snapshots, Arc::new(Connectivity::new(true)));

        let outcome = store.refresh().await;
        assert_eq!(outcome.source, DataSource::CachedFallback);
        assert_eq!(outcome.products[0].id, 1, "cached products, not the half-fetched ones");
    }

    #[tokio::test]
    async fn test_failure_without_cache_is_unavailable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = store_with(&dir, StubRemote::failing(), true);

        let outcome = store.refresh().await;
        assert_eq!(outcome.source, DataSource::Unavailable);
        assert!(outcome.products.is_empty());
        assert!(outcome.error.is_some());
        assert!(outcome.source.notice().is_some());
    }

    #[tokio::test]
    async fn test_offline_without_cache_still_attempts_network() {
        let dir = tempfile::tempdir().expect("tempdir");
        let remote = StubRemote::succeeding(vec![product(1)], vec![]);
        let calls = Arc::clone(&remote.calls);
        let mut store = store_with(&dir, remote, false);

        // No snapshot to serve, so the fetch is attempted even offline
        let outcome = store.refresh().await;
        assert!(calls.load(Ordering::SeqCst) > 0);
        assert_eq!(outcome.source, DataSource::Network);
    }
}
