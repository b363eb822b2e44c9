use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};

use crate::connectivity::source::{ReachabilityEvent, ReachabilitySource};
use crate::connectivity::tracker::{ConnectivitySnapshot, ConnectivityTracker, RECOVERY_WINDOW_MS};

/// Connectivity monitor that keeps a tracker current from a source
///
/// Subscribes to the source's transition events on start and holds the
/// subscription until `shutdown` (or drop), which releases it on every
/// path, including mid-offline. One expiry task is spawned per recovery
/// window; stale expiries are filtered by the tracker's epoch check, so
/// callbacks never need to be ordered against each other.
pub struct ConnectivityMonitor {
    state: Arc<Mutex<ConnectivityTracker>>,
    /// Keep-alive for the event task; taking it ends the subscription
    shutdown_tx: Option<mpsc::Sender<()>>,
}

impl ConnectivityMonitor {
    /// Start watching a reachability source
    ///
    /// The tracker's initial state comes from the source's synchronously
    /// readable reachability; an unreadable signal means assume online.
    pub fn start<S>(mut source: S) -> Self
    where
        S: ReachabilitySource + 'static,
    {
        let state = Arc::new(Mutex::new(ConnectivityTracker::new(source.current())));
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let task_state = state.clone();
        tokio::spawn(async move {
            info!("Connectivity monitor watching source: {}", source.name());

            loop {
                tokio::select! {
                    event = source.next_event() => {
                        match event {
                            Some(ReachabilityEvent::Offline) => {
                                debug!("Reachability lost");
                                task_state.lock().await.mark_offline();
                            }
                            Some(ReachabilityEvent::Online) => {
                                let epoch = task_state.lock().await.mark_online(Utc::now());
                                debug!("Reachability restored (recovery: {})", epoch.is_some());
                                if let Some(epoch) = epoch {
                                    Self::schedule_recovery_expiry(task_state.clone(), epoch);
                                }
                            }
                            None => break,
                        }
                    }
                    _ = shutdown_rx.recv() => break,
                }
            }

            info!("Connectivity monitor stopped");
        });

        Self {
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Spawn the one-shot task that ends a recovery window
    fn schedule_recovery_expiry(state: Arc<Mutex<ConnectivityTracker>>, epoch: u64) {
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(RECOVERY_WINDOW_MS)).await;
            if state.lock().await.expire_recovery(epoch) {
                debug!("Recovery window ended");
            }
        });
    }

    /// Current connectivity for the presentation layer
    pub async fn snapshot(&self) -> ConnectivitySnapshot {
        self.state.lock().await.snapshot()
    }

    /// Stop watching the source. Idempotent; dropping the monitor has the
    /// same effect.
    pub fn shutdown(&mut self) {
        if self.shutdown_tx.take().is_some() {
            debug!("Connectivity monitor shutting down");
        }
    }
}

impl Drop for ConnectivityMonitor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectivity::mock::MockReachability;

    /// Let spawned monitor tasks run to quiescence
    async fn settle() {
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovery_window_expires_after_five_seconds() {
        let (source, handle) = MockReachability::new(Some(true));
        let monitor = ConnectivityMonitor::start(source);

        handle.go_offline();
        settle().await;
        assert!(!monitor.snapshot().await.is_online);

        handle.go_online();
        settle().await;
        let snap = monitor.snapshot().await;
        assert!(snap.is_online);
        assert!(snap.was_offline);
        assert!(snap.last_online_at.is_some());

        // Just short of the window the flag is still up
        tokio::time::advance(Duration::from_millis(RECOVERY_WINDOW_MS - 100)).await;
        settle().await;
        assert!(monitor.snapshot().await.was_offline);

        tokio::time::advance(Duration::from_millis(200)).await;
        settle().await;
        let snap = monitor.snapshot().await;
        assert!(snap.is_online);
        assert!(!snap.was_offline);
    }

    #[tokio::test(start_paused = true)]
    async fn test_online_without_offline_raises_no_recovery() {
        let (source, handle) = MockReachability::new(Some(true));
        let monitor = ConnectivityMonitor::start(source);

        handle.go_online();
        settle().await;

        let snap = monitor.snapshot().await;
        assert!(snap.is_online);
        assert!(!snap.was_offline);
        assert!(snap.last_online_at.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reentrant_recovery_gets_a_fresh_window() {
        let (source, handle) = MockReachability::new(Some(true));
        let monitor = ConnectivityMonitor::start(source);

        handle.go_offline();
        handle.go_online();
        settle().await;

        // Second cycle 3 s into the first window
        tokio::time::advance(Duration::from_millis(3000)).await;
        handle.go_offline();
        handle.go_online();
        settle().await;

        // 6 s after the first recovery its timer has fired, but the second
        // window is still open
        tokio::time::advance(Duration::from_millis(3000)).await;
        settle().await;
        assert!(monitor.snapshot().await.was_offline);

        tokio::time::advance(Duration::from_millis(2100)).await;
        settle().await;
        assert!(!monitor.snapshot().await.was_offline);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unreadable_signal_assumes_online() {
        let (source, _handle) = MockReachability::new(None);
        let monitor = ConnectivityMonitor::start(source);

        settle().await;
        assert!(monitor.snapshot().await.is_online);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_mid_offline_is_idempotent() {
        let (source, handle) = MockReachability::new(Some(true));
        let mut monitor = ConnectivityMonitor::start(source);

        handle.go_offline();
        settle().await;
        assert!(!monitor.snapshot().await.is_online);

        monitor.shutdown();
        monitor.shutdown();
        settle().await;

        // Events after teardown are no longer observed, but the last
        // snapshot stays readable
        handle.go_online();
        settle().await;
        let snap = monitor.snapshot().await;
        assert!(!snap.is_online);
        assert!(!snap.was_offline);
    }

    #[tokio::test(start_paused = true)]
    async fn test_source_closing_ends_the_subscription() {
        let (source, handle) = MockReachability::new(Some(true));
        let monitor = ConnectivityMonitor::start(source);

        handle.go_offline();
        drop(handle);
        settle().await;

        assert!(!monitor.snapshot().await.is_online);
    }
}
