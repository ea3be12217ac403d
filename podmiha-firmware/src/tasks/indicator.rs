//! Status LED task
//!
//! Drives the WS2812 with the colour published by the link task. The LED is
//! only rewritten when the colour changes.

use defmt::*;
use embassy_rp::peripherals::PIO0;
use embassy_rp::pio_programs::ws2812::PioWs2812;
use smart_leds::RGB8;

use podmiha_core::indicator::Color;

use crate::channels::INDICATOR_COLOR;

/// Single WS2812 on PIO0 state machine 0
pub type StatusLed = PioWs2812<'static, PIO0, 0, 1>;

fn to_rgb(color: Color) -> RGB8 {
    RGB8::new(color.r, color.g, color.b)
}

/// Indicator task - mirrors the published colour onto the LED
#[embassy_executor::task]
pub async fn indicator_task(mut led: StatusLed) {
    info!("Indicator task started");

    // Start dark until the link task publishes its first colour
    led.write(&[to_rgb(Color::OFF)]).await;
    let mut current = Color::OFF;

    loop {
        let color = INDICATOR_COLOR.wait().await;
        if color == current {
            continue;
        }

        trace!("LED: {:?}", color);
        led.write(&[to_rgb(color)]).await;
        current = color;
    }
}
