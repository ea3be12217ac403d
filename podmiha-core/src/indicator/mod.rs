//! Status indicator colour mapping
//!
//! A single RGB LED shows the camera/microphone state confirmed by the host.
//! When the link is down the LED is switched off, regardless of the last
//! confirmed state.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::state::ConfirmedRemoteState;

/// RGB colour, one byte per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// LED off
    pub const OFF: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// True if all channels are zero
    pub fn is_off(&self) -> bool {
        *self == Self::OFF
    }
}

/// Colours for the four confirmed camera/microphone combinations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Palette {
    /// Camera and microphone both live
    pub camera_on_mic_on: Color,
    /// Camera live, microphone paused
    pub camera_on_mic_off: Color,
    /// Camera paused, microphone live
    pub camera_off_mic_on: Color,
    /// Camera and microphone both paused
    pub camera_off_mic_off: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            camera_on_mic_on: Color::new(40, 20, 0),
            camera_on_mic_off: Color::new(40, 0, 0),
            camera_off_mic_on: Color::new(20, 40, 0),
            camera_off_mic_off: Color::new(0, 40, 0),
        }
    }
}

impl Palette {
    /// Select the colour for a confirmed remote state
    pub fn color_for(&self, remote: &ConfirmedRemoteState) -> Color {
        match (remote.camera_active, remote.microphone_active) {
            (true, true) => self.camera_on_mic_on,
            (true, false) => self.camera_on_mic_off,
            (false, true) => self.camera_off_mic_on,
            (false, false) => self.camera_off_mic_off,
        }
    }
}

/// Indicator colour for `(camera_active, microphone_active, link_up)`
pub fn indicator_color(remote: &ConfirmedRemoteState, link_up: bool, palette: &Palette) -> Color {
    if link_up {
        palette.color_for(remote)
    } else {
        Color::OFF
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(camera_active: bool, microphone_active: bool) -> ConfirmedRemoteState {
        ConfirmedRemoteState {
            camera_active,
            microphone_active,
        }
    }

    #[test]
    fn test_link_up_colors() {
        let palette = Palette::default();
        assert_eq!(
            indicator_color(&remote(true, true), true, &palette),
            Color::new(40, 20, 0)
        );
        assert_eq!(
            indicator_color(&remote(true, false), true, &palette),
            Color::new(40, 0, 0)
        );
        assert_eq!(
            indicator_color(&remote(false, true), true, &palette),
            Color::new(20, 40, 0)
        );
        assert_eq!(
            indicator_color(&remote(false, false), true, &palette),
            Color::new(0, 40, 0)
        );
    }

    #[test]
    fn test_link_down_is_off() {
        let palette = Palette::default();
        for (camera, microphone) in [(true, true), (true, false), (false, true), (false, false)] {
            let color = indicator_color(&remote(camera, microphone), false, &palette);
            assert!(color.is_off());
        }
    }

    #[test]
    fn test_custom_palette() {
        let palette = Palette {
            camera_off_mic_off: Color::new(0, 0, 9),
            ..Default::default()
        };
        assert_eq!(
            indicator_color(&remote(false, false), true, &palette),
            Color::new(0, 0, 9)
        );
    }
}
