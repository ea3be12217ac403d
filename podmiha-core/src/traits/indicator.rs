//! Status LED trait

use crate::indicator::Color;

/// Single RGB status LED
pub trait StatusIndicator {
    /// Error type for LED writes
    type Error;

    /// Show a colour ([`Color::OFF`] switches the LED off)
    fn show(&mut self, color: Color) -> Result<(), Self::Error>;
}
