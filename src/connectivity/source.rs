use async_trait::async_trait;

/// A reachability transition reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReachabilityEvent {
    /// The network became reachable
    Online,
    /// The network became unreachable
    Offline,
}

/// Trait for platform reachability signals
///
/// This trait provides a common interface for whatever the host platform
/// exposes about network connectivity:
/// - OS-level connectivity notifications
/// - Browser online/offline events behind a bridge
/// - Mock sources for testing
#[async_trait]
pub trait ReachabilitySource: Send {
    /// Get the name/identifier of this source
    fn name(&self) -> &str;

    /// Synchronously readable current reachability
    ///
    /// Returns None when the platform exposes no such signal; consumers
    /// then assume online.
    fn current(&self) -> Option<bool>;

    /// Wait for the next reachability transition
    ///
    /// Returns None when the source has closed and no more events will
    /// arrive.
    async fn next_event(&mut self) -> Option<ReachabilityEvent>;
}
