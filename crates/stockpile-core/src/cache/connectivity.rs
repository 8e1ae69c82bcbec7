//! Network reachability flag.
//!
//! The runtime has no portable reachability probe, so connectivity is an
//! observed signal: whoever notices a transition (the offline-mode toggle,
//! a failed request, a platform notifier) reports it through
//! `set_online`. Interested parties subscribe to the watch channel instead
//! of polling.

use tokio::sync::watch;
use tracing::info;

/// Current online/offline state with asynchronous change notification.
pub struct Connectivity {
    state: watch::Sender<bool>,
}

impl Connectivity {
    pub fn new(online: bool) -> Self {
        let (state, _) = watch::channel(online);
        Self { state }
    }

    pub fn is_online(&self) -> bool {
        *self.state.borrow()
    }

    /// Report a connectivity transition. Subscribers are notified only on
    /// actual changes.
    pub fn set_online(&self, online: bool) {
        let changed = self.state.send_if_modified(|current| {
            if *current != online {
                *current = online;
                true
            } else {
                false
            }
        });
        if changed {
            info!(online, "Connectivity changed");
        }
    }

    /// Subscribe to connectivity changes.
    pub fn watch(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }
}

impl Default for Connectivity {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_read() {
        let connectivity = Connectivity::new(true);
        assert!(connectivity.is_online());

        connectivity.set_online(false);
        assert!(!connectivity.is_online());

        // Idempotent
        connectivity.set_online(false);
        assert!(!connectivity.is_online());
    }

    #[tokio::test]
    async fn test_watch_notified_on_change() {
        let connectivity = Connectivity::new(true);
        let mut rx = connectivity.watch();

        connectivity.set_online(false);
        rx.changed().await.expect("watch channel alive");
        assert!(!*rx.borrow());
    }
}
