use chrono::{DateTime, Utc};

/// How long the just-recovered flag stays visible after reconnection
pub const RECOVERY_WINDOW_MS: u64 = 5000;

/// Read-only view of the tracker for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectivitySnapshot {
    pub is_online: bool,
    pub was_offline: bool,
    pub last_online_at: Option<DateTime<Utc>>,
}

/// Perceived network reachability state machine
///
/// Two observable states, online and offline, plus a transient
/// just-recovered flag that is raised when an online transition follows an
/// offline period and lowered once the recovery window expires. The tracker
/// holds no timers itself; `mark_online` hands the caller a recovery epoch
/// and the caller schedules `expire_recovery` for it. Expiry is keyed by
/// epoch so a stale timer from an earlier recovery cannot clear the flag
/// raised by a later one: the most recent recovery always gets a full
/// window.
#[derive(Debug)]
pub struct ConnectivityTracker {
    is_online: bool,
    was_offline: bool,
    last_online_at: Option<DateTime<Utc>>,
    /// Latched when an offline period occurs, consumed on the next online
    /// transition
    pending_offline: bool,
    recovery_epoch: u64,
}

impl ConnectivityTracker {
    /// Create a tracker from the platform's current reachability
    ///
    /// `None` means the signal is unreadable; the tracker then assumes
    /// online.
    pub fn new(initial: Option<bool>) -> Self {
        Self {
            is_online: initial.unwrap_or(true),
            was_offline: false,
            last_online_at: None,
            pending_offline: false,
            recovery_epoch: 0,
        }
    }

    pub fn is_online(&self) -> bool {
        self.is_online
    }

    pub fn was_offline(&self) -> bool {
        self.was_offline
    }

    pub fn last_online_at(&self) -> Option<DateTime<Utc>> {
        self.last_online_at
    }

    pub fn snapshot(&self) -> ConnectivitySnapshot {
        ConnectivitySnapshot {
            is_online: self.is_online,
            was_offline: self.was_offline,
            last_online_at: self.last_online_at,
        }
    }

    /// Record a went-offline transition
    pub fn mark_offline(&mut self) {
        self.is_online = false;
        self.pending_offline = true;
    }

    /// Record a came-online transition
    ///
    /// Returns the recovery epoch to schedule an expiry for when this
    /// transition ends a genuine offline period, None otherwise. Each
    /// returned epoch supersedes all earlier ones.
    pub fn mark_online(&mut self, now: DateTime<Utc>) -> Option<u64> {
        self.is_online = true;
        self.last_online_at = Some(now);

        if !self.pending_offline {
            return None;
        }

        self.pending_offline = false;
        self.was_offline = true;
        self.recovery_epoch += 1;
        Some(self.recovery_epoch)
    }

    /// Lower the just-recovered flag at the end of a recovery window
    ///
    /// Only the epoch returned by the most recent `mark_online` takes
    /// effect; expiries for superseded windows are no-ops. Returns whether
    /// the flag was lowered.
    pub fn expire_recovery(&mut self, epoch: u64) -> bool {
        if epoch != self.recovery_epoch {
            return false;
        }

        self.was_offline = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_defaults_to_online() {
        let tracker = ConnectivityTracker::new(None);
        assert!(tracker.is_online());
        assert!(!tracker.was_offline());
        assert!(tracker.last_online_at().is_none());

        let tracker = ConnectivityTracker::new(Some(false));
        assert!(!tracker.is_online());
    }

    #[test]
    fn test_offline_then_online_raises_recovery() {
        let mut tracker = ConnectivityTracker::new(Some(true));

        tracker.mark_offline();
        assert!(!tracker.is_online());
        assert!(!tracker.was_offline());

        let now = Utc::now();
        let epoch = tracker.mark_online(now);
        assert!(tracker.is_online());
        assert!(tracker.was_offline());
        assert_eq!(tracker.last_online_at(), Some(now));

        let epoch = epoch.expect("recovery epoch");
        assert!(tracker.expire_recovery(epoch));
        assert!(!tracker.was_offline());
    }

    #[test]
    fn test_online_without_prior_offline_is_not_a_recovery() {
        let mut tracker = ConnectivityTracker::new(Some(true));

        let epoch = tracker.mark_online(Utc::now());
        assert!(epoch.is_none());
        assert!(!tracker.was_offline());
        assert!(tracker.last_online_at().is_some());
    }

    #[test]
    fn test_stale_epoch_expiry_is_a_noop() {
        let mut tracker = ConnectivityTracker::new(Some(true));

        tracker.mark_offline();
        let first = tracker.mark_online(Utc::now()).unwrap();

        // A second cycle before the first window expires supersedes it
        tracker.mark_offline();
        let second = tracker.mark_online(Utc::now()).unwrap();
        assert_ne!(first, second);

        assert!(!tracker.expire_recovery(first));
        assert!(tracker.was_offline());

        assert!(tracker.expire_recovery(second));
        assert!(!tracker.was_offline());
    }

    #[test]
    fn test_repeated_offline_keeps_latch() {
        let mut tracker = ConnectivityTracker::new(Some(true));

        tracker.mark_offline();
        tracker.mark_offline();
        assert!(!tracker.is_online());

        assert!(tracker.mark_online(Utc::now()).is_some());
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut tracker = ConnectivityTracker::new(Some(true));
        tracker.mark_offline();

        let snap = tracker.snapshot();
        assert!(!snap.is_online);
        assert!(!snap.was_offline);
        assert!(snap.last_online_at.is_none());
    }
}
