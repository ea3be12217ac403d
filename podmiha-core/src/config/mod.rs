//! Configuration types
//!
//! Board-agnostic settings. The firmware reads them from `device.toml` at
//! build time.

pub mod types;

pub use types::*;
