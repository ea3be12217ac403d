//! Serial link logic
//!
//! - [`LinkStateMachine`]: inbound frames → confirmed remote state
//! - [`LinkWatchdog`]: Up/Down classification from frame timing
//! - [`PeriodicTransmitter`]: outbound report schedule

pub mod machine;
pub mod transmitter;
pub mod watchdog;

pub use machine::{LinkStateMachine, RxOutcome};
pub use transmitter::PeriodicTransmitter;
pub use watchdog::{LinkEvent, LinkWatchdog};
