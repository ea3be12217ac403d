//! Local request state
//!
//! What the button node asks the host to do. Only confirmed button presses
//! change it; the periodic transmitter snapshots it into a [`DeviceReport`].

use podmiha_protocol::{DeviceReport, COUNTER_WRAP};

use crate::input::Button;

/// Rolling action counter in `0..=253`
///
/// Incrementing 253 wraps to 0, so the reserved wire values 254 and 255 are
/// unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActionCounter(u8);

impl ActionCounter {
    pub const fn new() -> Self {
        Self(0)
    }

    /// Current counter value
    pub fn value(self) -> u8 {
        self.0
    }

    /// Advance by one, wrapping at [`COUNTER_WRAP`]
    pub fn increment(&mut self) {
        self.0 = (self.0 + 1) % COUNTER_WRAP;
    }
}

/// Toggle requests and action counters tracked by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LocalRequestState {
    pub camera_requested: bool,
    pub microphone_requested: bool,
    pub plus_count: ActionCounter,
    pub minus_count: ActionCounter,
    pub screenshot_count: ActionCounter,
}

impl LocalRequestState {
    pub const fn new() -> Self {
        Self {
            camera_requested: false,
            microphone_requested: false,
            plus_count: ActionCounter::new(),
            minus_count: ActionCounter::new(),
            screenshot_count: ActionCounter::new(),
        }
    }

    /// Apply a confirmed button press
    pub fn apply(&mut self, button: Button) {
        match button {
            Button::Camera => self.camera_requested = !self.camera_requested,
            Button::Microphone => self.microphone_requested = !self.microphone_requested,
            Button::Plus => self.plus_count.increment(),
            Button::Minus => self.minus_count.increment(),
            Button::Screenshot => self.screenshot_count.increment(),
        }
    }

    /// Snapshot for transmission
    pub fn report(&self) -> DeviceReport {
        DeviceReport {
            camera_requested: self.camera_requested,
            microphone_requested: self.microphone_requested,
            plus: self.plus_count.value(),
            minus: self.minus_count.value(),
            screenshot: self.screenshot_count.value(),
        }
    }
}
