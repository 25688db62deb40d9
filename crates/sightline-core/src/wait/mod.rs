//! Wait system: network-idle tracking and navigation settling.

pub mod idle;
pub mod navigation;

pub use idle::NetworkIdleTracker;
pub use navigation::{NavigationWaiter, SettleSignal, Settled, WaitOptions};
