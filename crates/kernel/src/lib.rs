pub mod action;
pub mod clock;
pub mod decision;
pub mod device;
mod error;
pub mod event;
pub mod store;
pub mod uptime;
pub mod watchdog;

pub use decision::{Decision, Thresholds};
pub use error::Error;
pub use event::WatchdogEvent;
pub use watchdog::{Report, Services, Watchdog};
