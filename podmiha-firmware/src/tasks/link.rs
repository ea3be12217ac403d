//! Host link task
//!
//! Owns the device context and the UART. Each iteration drains all buffered
//! bytes, re-evaluates the link watchdog, publishes the indicator colour,
//! applies queued button presses and sends a report when one is due.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embassy_time::{Duration, Ticker};
use embedded_io_async::{Read, ReadReady, Write};

use podmiha_core::link::LinkEvent;
use podmiha_core::DeviceContext;

use super::now_ms;
use crate::channels::{BUTTON_CHANNEL, INDICATOR_COLOR};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 32;

/// Loop period when no bytes arrive
const LOOP_TICK_MS: u64 = 10;

/// Link task - runs the protocol loop against the host
#[embassy_executor::task]
pub async fn link_task(mut tx: BufferedUartTx, mut rx: BufferedUartRx, mut ctx: DeviceContext) {
    info!("Link task started");

    let mut buf = [0u8; RX_BUF_SIZE];
    let mut ticker = Ticker::every(Duration::from_millis(LOOP_TICK_MS));

    loop {
        // Wake on received bytes or the loop tick, whichever comes first
        match select(rx.read(&mut buf), ticker.next()).await {
            Either::First(Ok(n)) => handle_rx(&mut ctx, &buf[..n]),
            Either::First(Err(e)) => {
                warn!("UART read error: {:?}", e);
            }
            Either::Second(()) => {}
        }

        // Drain everything already buffered before the watchdog looks at it
        loop {
            match rx.read_ready() {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    warn!("UART read error: {:?}", e);
                    break;
                }
            }
            match rx.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => handle_rx(&mut ctx, &buf[..n]),
                Err(e) => {
                    warn!("UART read error: {:?}", e);
                    break;
                }
            }
        }

        let now = now_ms();

        if let Some(event) = ctx.poll_link(now) {
            log_link_event(event);
        }

        INDICATOR_COLOR.signal(ctx.indicator_color());

        while let Ok(button) = BUTTON_CHANNEL.try_receive() {
            ctx.apply_press(button);
        }

        match ctx.poll_transmit(now) {
            Ok(Some(frame)) => {
                trace!("TX: {:?}", ctx.request().report());
                if let Err(e) = tx.write_all(&frame).await {
                    warn!("UART write error: {:?}", e);
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Failed to encode report: {:?}", e);
            }
        }
    }
}

fn handle_rx(ctx: &mut DeviceContext, bytes: &[u8]) {
    let outcome = ctx.receive(bytes, now_ms());
    if outcome.accepted > 0 {
        trace!("RX: {} status frame(s)", outcome.accepted);
    }
    if outcome.rejected > 0 {
        trace!("RX: dropped {} corrupt frame(s)", outcome.rejected);
    }
    if let Some(event) = outcome.event {
        log_link_event(event);
    }
}

fn log_link_event(event: LinkEvent) {
    match event {
        LinkEvent::Established => debug!("Host link up"),
        LinkEvent::Lost => debug!("Host link lost"),
    }
}
