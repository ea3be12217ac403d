//! Non-blocking button debouncing
//!
//! Each button keeps its last accepted level and the time of that change.
//! A differing raw level is accepted only once the debounce window since the
//! previous accepted change has passed; until then the sample is ignored and
//! re-evaluated on the next poll. Nothing sleeps, so sampling never stalls
//! the link.

use heapless::Vec;

use super::button::{Button, BUTTON_COUNT};

/// Debounced level change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Pressed,
    Released,
}

/// Debouncer for a single input
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    /// Minimum time between accepted changes (ms)
    debounce_ms: u64,
    /// Last accepted level
    pressed: bool,
    /// Time of the last accepted change
    last_change_ms: Option<u64>,
}

impl Debouncer {
    /// Create a debouncer in the released state
    pub const fn new(debounce_ms: u64) -> Self {
        Self {
            debounce_ms,
            pressed: false,
            last_change_ms: None,
        }
    }

    /// Feed a raw sample
    ///
    /// Returns the edge if the sample changes the accepted level.
    pub fn update(&mut self, raw_pressed: bool, now_ms: u64) -> Option<Edge> {
        if raw_pressed == self.pressed {
            return None;
        }

        let settled = self
            .last_change_ms
            .map_or(true, |last| now_ms.saturating_sub(last) >= self.debounce_ms);
        if !settled {
            return None;
        }

        self.pressed = raw_pressed;
        self.last_change_ms = Some(now_ms);

        Some(if raw_pressed {
            Edge::Pressed
        } else {
            Edge::Released
        })
    }
}

/// Debounced sampler for all five buttons
#[derive(Debug, Clone)]
pub struct ButtonSampler {
    debouncers: [Debouncer; BUTTON_COUNT],
}

impl ButtonSampler {
    pub const fn new(debounce_ms: u64) -> Self {
        Self {
            debouncers: [Debouncer::new(debounce_ms); BUTTON_COUNT],
        }
    }

    /// Feed raw levels in pin order, returning newly pressed buttons
    pub fn update(
        &mut self,
        levels: [bool; BUTTON_COUNT],
        now_ms: u64,
    ) -> Vec<Button, BUTTON_COUNT> {
        let mut pressed = Vec::new();

        for ((debouncer, level), button) in self
            .debouncers
            .iter_mut()
            .zip(levels)
            .zip(Button::ALL)
        {
            if debouncer.update(level, now_ms) == Some(Edge::Pressed) {
                // At most one press per button, so this never overflows
                let _ = pressed.push(button);
            }
        }

        pressed
    }
}
