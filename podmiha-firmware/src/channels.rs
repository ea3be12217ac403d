//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use podmiha_core::indicator::Color;
use podmiha_core::input::Button;

/// Channel capacity for debounced button presses
const BUTTON_CHANNEL_SIZE: usize = 8;

/// Debounced button presses from the input task
pub static BUTTON_CHANNEL: Channel<CriticalSectionRawMutex, Button, BUTTON_CHANNEL_SIZE> =
    Channel::new();

/// Indicator colour published by the link task
pub static INDICATOR_COLOR: Signal<CriticalSectionRawMutex, Color> = Signal::new();
