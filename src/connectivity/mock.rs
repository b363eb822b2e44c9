use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::connectivity::source::{ReachabilityEvent, ReachabilitySource};

/// Mock reachability source for testing without a platform signal
///
/// Transitions are injected through a cloneable handle; the source replays
/// them in order from `next_event`.
pub struct MockReachability {
    name: String,
    initial: Option<bool>,
    events: mpsc::UnboundedReceiver<ReachabilityEvent>,
}

/// Injection side of a `MockReachability`
#[derive(Clone)]
pub struct MockReachabilityHandle {
    sender: mpsc::UnboundedSender<ReachabilityEvent>,
}

impl MockReachability {
    /// Create a mock source and its injection handle
    ///
    /// `initial` is what `current()` reports; None simulates a platform
    /// with no readable reachability signal.
    pub fn new(initial: Option<bool>) -> (Self, MockReachabilityHandle) {
        let (sender, events) = mpsc::unbounded_channel();
        let source = Self {
            name: "mock".to_string(),
            initial,
            events,
        };
        (source, MockReachabilityHandle { sender })
    }
}

impl MockReachabilityHandle {
    /// Inject a became-unreachable transition
    pub fn go_offline(&self) {
        let _ = self.sender.send(ReachabilityEvent::Offline);
    }

    /// Inject a became-reachable transition
    pub fn go_online(&self) {
        let _ = self.sender.send(ReachabilityEvent::Online);
    }
}

#[async_trait]
impl ReachabilitySource for MockReachability {
    fn name(&self) -> &str {
        &self.name
    }

    fn current(&self) -> Option<bool> {
        self.initial
    }

    async fn next_event(&mut self) -> Option<ReachabilityEvent> {
        self.events.recv().await
    }
}
