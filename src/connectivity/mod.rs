pub mod mock;
pub mod monitor;
pub mod source;
pub mod tracker;

pub use mock::{MockReachability, MockReachabilityHandle};
pub use monitor::ConnectivityMonitor;
pub use source::{ReachabilityEvent, ReachabilitySource};
pub use tracker::{ConnectivitySnapshot, ConnectivityTracker};
