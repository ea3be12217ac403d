//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod indicator;
pub mod input;
pub mod link;

pub use indicator::indicator_task;
pub use input::input_task;
pub use link::link_task;

/// Milliseconds since boot
pub fn now_ms() -> u64 {
    embassy_time::Instant::now().as_millis()
}
