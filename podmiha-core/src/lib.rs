//! Board-agnostic core logic for the Podmiha button node
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Local request state (toggles and action counters)
//! - Button debouncing
//! - Link watchdog and periodic report transmitter
//! - Status indicator colour mapping
//! - Configuration type definitions
//! - The device context that ties them together

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod context;
pub mod indicator;
pub mod input;
pub mod link;
pub mod state;
pub mod traits;

pub use context::{DeviceContext, Iteration, RunFaults};
