//! Podmiha - Serial Button Node Firmware
//!
//! Main firmware binary for RP2040-based button nodes. Five buttons request
//! camera/microphone toggles and actions from the host; an RGB LED shows the
//! state the host has confirmed.
//!
//! Pin assignment:
//! - UART0: GPIO0 TX, GPIO1 RX
//! - WS2812 status LED: GPIO2
//! - Buttons (active low): GPIO3 camera, GPIO4 microphone, GPIO5 plus,
//!   GPIO6 minus, GPIO7 screenshot

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::peripherals::{PIO0, UART0};
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
use embassy_rp::pio_programs::ws2812::{PioWs2812, PioWs2812Program};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use podmiha_core::input::ButtonPanel;
use podmiha_core::DeviceContext;

use crate::config::DEVICE_CONFIG;

mod channels;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Podmiha firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = DEVICE_CONFIG;
    info!("Configuration: {:?}", config);

    // Setup UART for the host link
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config.link.baud_rate;

    let tx_buf = TX_BUF.init([0u8; 64]);
    let rx_buf = RX_BUF.init([0u8; 64]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized at {} baud", config.link.baud_rate);

    // Setup PIO0 for the WS2812 status LED
    let Pio {
        mut common, sm0, ..
    } = Pio::new(p.PIO0, Irqs);
    let program = PioWs2812Program::new(&mut common);
    let led = PioWs2812::new(&mut common, sm0, p.DMA_CH0, p.PIN_2, &program);

    info!("Status LED initialized");

    // Buttons pull the pin low when pressed
    let pins = [
        Input::new(p.PIN_3, Pull::Up),
        Input::new(p.PIN_4, Pull::Up),
        Input::new(p.PIN_5, Pull::Up),
        Input::new(p.PIN_6, Pull::Up),
        Input::new(p.PIN_7, Pull::Up),
    ];
    let buttons = ButtonPanel::new(pins, config.input.debounce_ms);
    info!("Buttons initialized (debounce {}ms)", config.input.debounce_ms);

    let ctx = DeviceContext::new(&config, tasks::now_ms());
    if ctx.is_link_up() {
        info!("Starting with link assumed up");
    }

    spawner.spawn(tasks::indicator_task(led)).unwrap();
    spawner
        .spawn(tasks::input_task(buttons, config.input.poll_interval_ms))
        .unwrap();
    spawner.spawn(tasks::link_task(tx, rx, ctx)).unwrap();

    info!("All tasks spawned");
}
