//! Hardware abstraction traits
//!
//! Serial and button pins go through `embedded-io` and `embedded-hal`; the
//! status LED has its own trait here.

pub mod indicator;

pub use indicator::StatusIndicator;
