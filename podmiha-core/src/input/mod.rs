//! Button input
//!
//! Five active-low buttons with pull-ups, debounced without blocking.

pub mod button;
pub mod debounce;
pub mod panel;

pub use button::{Button, BUTTON_COUNT};
pub use debounce::{ButtonSampler, Debouncer, Edge};
pub use panel::ButtonPanel;
