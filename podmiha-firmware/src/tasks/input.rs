//! Button input task
//!
//! Samples the five active-low buttons on a fixed ticker and forwards
//! debounced presses to the link task.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::{Duration, Ticker};

use podmiha_core::input::ButtonPanel;

use super::now_ms;
use crate::channels::BUTTON_CHANNEL;

/// Input task - polls and debounces the buttons
#[embassy_executor::task]
pub async fn input_task(mut buttons: ButtonPanel<Input<'static>>, poll_interval_ms: u64) {
    info!("Input task started (poll {}ms)", poll_interval_ms);

    let mut ticker = Ticker::every(Duration::from_millis(poll_interval_ms));

    loop {
        ticker.next().await;

        let presses = match buttons.poll(now_ms()) {
            Ok(presses) => presses,
            Err(never) => match never {},
        };

        for button in presses {
            debug!("Button pressed: {:?}", button);
            if BUTTON_CHANNEL.try_send(button).is_err() {
                warn!("Button channel full, dropping press");
            }
        }
    }
}
