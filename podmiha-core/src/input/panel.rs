//! Button panel
//!
//! The five button pins together with their debouncers.

use embedded_hal::digital::InputPin;
use heapless::Vec;

use super::button::{Button, BUTTON_COUNT};
use super::debounce::ButtonSampler;

/// Active-low button pins (pressed = low) in [`Button::ALL`] order
#[derive(Debug)]
pub struct ButtonPanel<P> {
    pins: [P; BUTTON_COUNT],
    sampler: ButtonSampler,
}

impl<P: InputPin> ButtonPanel<P> {
    pub fn new(pins: [P; BUTTON_COUNT], debounce_ms: u64) -> Self {
        Self {
            pins,
            sampler: ButtonSampler::new(debounce_ms),
        }
    }

    /// Read every pin and return the buttons newly pressed at `now_ms`
    pub fn poll(&mut self, now_ms: u64) -> Result<Vec<Button, BUTTON_COUNT>, P::Error> {
        let mut levels = [false; BUTTON_COUNT];
        for (level, pin) in levels.iter_mut().zip(self.pins.iter_mut()) {
            *level = pin.is_low()?;
        }
        Ok(self.sampler.update(levels, now_ms))
    }
}
