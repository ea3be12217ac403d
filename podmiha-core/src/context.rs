//! Device context
//!
//! All mutable device state lives in one [`DeviceContext`]. A loop iteration
//! runs the steps in a fixed order:
//!
//! 1. drain buffered inbound bytes through the frame scanner
//! 2. re-evaluate the link watchdog
//! 3. render the indicator
//! 4. sample buttons and apply presses
//! 5. transmit a report if the send period has elapsed
//!
//! The firmware calls the individual steps from its link task; [`run_once`]
//! runs a whole iteration against blocking `embedded-io`/`embedded-hal`
//! peripherals.
//!
//! [`run_once`]: DeviceContext::run_once

use embedded_hal::digital::{self, Error as _, InputPin};
use embedded_io::{Error as _, Read, ReadReady, Write};
use heapless::Vec;

use podmiha_protocol::{FrameError, REPORT_FRAME_LEN};

use crate::config::DeviceConfig;
use crate::indicator::{indicator_color, Color, Palette};
use crate::input::{Button, ButtonPanel, BUTTON_COUNT};
use crate::link::{LinkEvent, LinkStateMachine, LinkWatchdog, PeriodicTransmitter, RxOutcome};
use crate::state::{ConfirmedRemoteState, LocalRequestState};
use crate::traits::StatusIndicator;

/// Bytes read from the serial port per read call
const RX_CHUNK_SIZE: usize = 16;

/// Collaborator faults seen during one iteration
///
/// A failing step is skipped for that iteration only; the remaining steps
/// still run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunFaults {
    /// Serial read failed, remaining inbound bytes wait for the next pass
    pub serial_read: Option<embedded_io::ErrorKind>,
    /// Status LED write failed
    pub indicator: bool,
    /// Button pin read failed, no presses this pass
    pub input: Option<digital::ErrorKind>,
    /// Report write failed, the next report goes out one period later
    pub serial_write: Option<embedded_io::ErrorKind>,
}

/// What happened during one loop iteration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Iteration {
    pub rx: RxOutcome,
    pub link_event: Option<LinkEvent>,
    pub color: Color,
    pub presses: Vec<Button, BUTTON_COUNT>,
    pub sent: bool,
    pub faults: RunFaults,
}

/// Device state and protocol engine
#[derive(Debug, Clone)]
pub struct DeviceContext {
    request: LocalRequestState,
    link: LinkStateMachine,
    transmitter: PeriodicTransmitter,
    palette: Palette,
}

impl DeviceContext {
    /// Create a context at boot time `boot_ms`
    pub fn new(config: &DeviceConfig, boot_ms: u64) -> Self {
        let watchdog = if config.link.start_link_up {
            LinkWatchdog::new_optimistic(config.link.timeout_ms, boot_ms)
        } else {
            LinkWatchdog::new(config.link.timeout_ms)
        };

        Self {
            request: LocalRequestState::new(),
            link: LinkStateMachine::new(watchdog),
            transmitter: PeriodicTransmitter::new(config.link.send_period_ms, boot_ms),
            palette: config.indicator.palette,
        }
    }

    /// Feed inbound bytes
    pub fn receive(&mut self, bytes: &[u8], now_ms: u64) -> RxOutcome {
        self.link.receive(bytes, now_ms)
    }

    /// Evaluate the link timeout
    pub fn poll_link(&mut self, now_ms: u64) -> Option<LinkEvent> {
        self.link.poll(now_ms)
    }

    /// Check if the link is up
    pub fn is_link_up(&self) -> bool {
        self.link.is_up()
    }

    /// State last confirmed by the host
    pub fn remote(&self) -> &ConfirmedRemoteState {
        self.link.remote()
    }

    /// Local request state
    pub fn request(&self) -> &LocalRequestState {
        &self.request
    }

    /// Colour the indicator should show now
    pub fn indicator_color(&self) -> Color {
        indicator_color(self.link.remote(), self.link.is_up(), &self.palette)
    }

    /// Apply a debounced button press
    pub fn apply_press(&mut self, button: Button) {
        self.request.apply(button);
    }

    /// Encode a report if the send period has elapsed
    pub fn poll_transmit(
        &mut self,
        now_ms: u64,
    ) -> Result<Option<[u8; REPORT_FRAME_LEN]>, FrameError> {
        self.transmitter.poll(now_ms, &self.request)
    }

    /// Run one full loop iteration
    ///
    /// Serial, pin and LED failures are recorded in [`Iteration::faults`]
    /// and never stop the remaining steps. Only a report that cannot be
    /// encoded ends the iteration early.
    pub fn run_once<S, P, I>(
        &mut self,
        now_ms: u64,
        serial: &mut S,
        buttons: &mut ButtonPanel<P>,
        indicator: &mut I,
    ) -> Result<Iteration, FrameError>
    where
        S: Read + ReadReady + Write,
        P: InputPin,
        I: StatusIndicator,
    {
        let mut faults = RunFaults::default();

        let mut rx = RxOutcome::default();
        let mut buf = [0u8; RX_CHUNK_SIZE];
        loop {
            match serial.read_ready() {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    faults.serial_read = Some(e.kind());
                    break;
                }
            }
            let n = match serial.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) => {
                    faults.serial_read = Some(e.kind());
                    break;
                }
            };
            let outcome = self.receive(&buf[..n], now_ms);
            rx.accepted = rx.accepted.saturating_add(outcome.accepted);
            rx.rejected = rx.rejected.saturating_add(outcome.rejected);
            if outcome.event.is_some() {
                rx.event = outcome.event;
            }
        }

        let link_event = self.poll_link(now_ms);

        let color = self.indicator_color();
        faults.indicator = indicator.show(color).is_err();

        let presses = match buttons.poll(now_ms) {
            Ok(presses) => presses,
            Err(e) => {
                faults.input = Some(e.kind());
                Vec::new()
            }
        };
        for &button in &presses {
            self.apply_press(button);
        }

        let sent = match self.poll_transmit(now_ms)? {
            Some(frame) => match serial.write_all(&frame) {
                Ok(()) => true,
                Err(e) => {
                    faults.serial_write = Some(e.kind());
                    false
                }
            },
            None => false,
        };

        Ok(Iteration {
            rx,
            link_event,
            color,
            presses,
            sent,
            faults,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::rc::Rc;
    use std::vec::Vec as StdVec;

    use embedded_io::ErrorKind as SerialErrorKind;
    use podmiha_protocol::{
        DeviceReport, HostStatus, ReportScanner, ReportTracker, STATUS_FRAME_LEN,
    };

    #[derive(Default)]
    struct FakeSerial {
        rx: VecDeque<u8>,
        tx: StdVec<u8>,
        fail_reads: bool,
        fail_writes: bool,
    }

    impl FakeSerial {
        fn host_sends(&mut self, status: HostStatus) {
            self.rx.extend(status.encode());
        }

        fn take_tx(&mut self) -> StdVec<u8> {
            core::mem::take(&mut self.tx)
        }
    }

    impl embedded_io::ErrorType for FakeSerial {
        type Error = SerialErrorKind;
    }

    impl Read for FakeSerial {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            if self.fail_reads {
                return Err(SerialErrorKind::Other);
            }
            let n = buf.len().min(self.rx.len());
            for slot in buf.iter_mut().take(n) {
                *slot = self.rx.pop_front().unwrap_or_default();
            }
            Ok(n)
        }
    }

    impl ReadReady for FakeSerial {
        fn read_ready(&mut self) -> Result<bool, Self::Error> {
            if self.fail_reads {
                return Err(SerialErrorKind::Other);
            }
            Ok(!self.rx.is_empty())
        }
    }

    impl Write for FakeSerial {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            if self.fail_writes {
                return Err(SerialErrorKind::BrokenPipe);
            }
            self.tx.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    /// Pin whose level and health are shared with the test
    struct FakePin {
        low: Rc<Cell<bool>>,
        broken: Rc<Cell<bool>>,
    }

    impl embedded_hal::digital::ErrorType for FakePin {
        type Error = digital::ErrorKind;
    }

    impl InputPin for FakePin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            self.is_low().map(|low| !low)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            if self.broken.get() {
                return Err(digital::ErrorKind::Other);
            }
            Ok(self.low.get())
        }
    }

    #[derive(Default)]
    struct FakeLed {
        shown: StdVec<Color>,
        broken: bool,
    }

    impl StatusIndicator for FakeLed {
        type Error = ();

        fn show(&mut self, color: Color) -> Result<(), Self::Error> {
            if self.broken {
                return Err(());
            }
            self.shown.push(color);
            Ok(())
        }
    }

    struct Rig {
        ctx: DeviceContext,
        serial: FakeSerial,
        levels: [Rc<Cell<bool>>; BUTTON_COUNT],
        pins_broken: Rc<Cell<bool>>,
        buttons: ButtonPanel<FakePin>,
        led: FakeLed,
    }

    impl Rig {
        fn new(config: DeviceConfig) -> Self {
            let levels: [Rc<Cell<bool>>; BUTTON_COUNT] = Default::default();
            let pins_broken = Rc::new(Cell::new(false));
            let pins = core::array::from_fn(|i| FakePin {
                low: levels[i].clone(),
                broken: pins_broken.clone(),
            });

            Self {
                ctx: DeviceContext::new(&config, 0),
                serial: FakeSerial::default(),
                levels,
                pins_broken,
                buttons: ButtonPanel::new(pins, config.input.debounce_ms),
                led: FakeLed::default(),
            }
        }

        fn hold(&self, button: Button, pressed: bool) {
            self.levels[button.index()].set(pressed);
        }

        fn run(&mut self, now_ms: u64) -> Iteration {
            self.ctx
                .run_once(now_ms, &mut self.serial, &mut self.buttons, &mut self.led)
                .unwrap()
        }

        /// Run every 10 ms over `[from, to]` and return the times a report went out
        fn run_span(&mut self, from: u64, to: u64) -> StdVec<u64> {
            (from..=to)
                .step_by(10)
                .filter(|&now| self.run(now).sent)
                .collect()
        }
    }

    fn decode_reports(bytes: &[u8]) -> StdVec<DeviceReport> {
        let mut scanner = ReportScanner::new();
        let mut reports = StdVec::new();
        for &byte in bytes {
            if let Ok(Some(frame)) = scanner.feed(byte) {
                reports.push(DeviceReport::from_frame(&frame).unwrap());
            }
        }
        reports
    }

    fn every_period_until(end: u64) -> StdVec<u64> {
        (500..=end).step_by(500).collect()
    }

    #[test]
    fn test_boot_is_link_down_and_dark() {
        let mut rig = Rig::new(DeviceConfig::default());
        let iteration = rig.run(0);
        assert!(!rig.ctx.is_link_up());
        assert!(iteration.color.is_off());
        assert!(!iteration.sent);
        assert_eq!(iteration.faults, RunFaults::default());
    }

    #[test]
    fn test_optimistic_boot_shows_state_until_timeout() {
        let mut config = DeviceConfig::default();
        config.link.start_link_up = true;
        let mut rig = Rig::new(config);

        assert_eq!(rig.run(0).color, Color::new(0, 40, 0));
        assert_eq!(rig.run(1999).link_event, None);

        let iteration = rig.run(2000);
        assert_eq!(iteration.link_event, Some(LinkEvent::Lost));
        assert!(iteration.color.is_off());
    }

    #[test]
    fn test_host_status_lights_indicator() {
        let mut rig = Rig::new(DeviceConfig::default());
        rig.serial.host_sends(HostStatus {
            camera_active: true,
            microphone_active: false,
        });

        let iteration = rig.run(100);
        assert_eq!(iteration.rx.accepted, 1);
        assert_eq!(iteration.rx.event, Some(LinkEvent::Established));
        assert_eq!(iteration.color, Color::new(40, 0, 0));
        assert_eq!(rig.led.shown.last(), Some(&Color::new(40, 0, 0)));
    }

    #[test]
    fn test_link_lost_after_silence_and_recovers() {
        let mut rig = Rig::new(DeviceConfig::default());
        rig.serial.host_sends(HostStatus {
            camera_active: true,
            microphone_active: true,
        });
        rig.run(100);

        assert_eq!(rig.run(2099).link_event, None);
        let iteration = rig.run(2100);
        assert_eq!(iteration.link_event, Some(LinkEvent::Lost));
        assert!(iteration.color.is_off());

        rig.serial.host_sends(HostStatus::default());
        let iteration = rig.run(9000);
        assert_eq!(iteration.rx.event, Some(LinkEvent::Established));
        assert_eq!(iteration.color, Color::new(0, 40, 0));
    }

    #[test]
    fn test_reports_sent_every_period_while_down() {
        let mut rig = Rig::new(DeviceConfig::default());
        assert_eq!(rig.run_span(0, 2500), every_period_until(2500));
        assert!(!rig.ctx.is_link_up());
        assert_eq!(rig.serial.take_tx().len(), 5 * REPORT_FRAME_LEN);
    }

    #[test]
    fn test_button_press_reaches_host() {
        let mut rig = Rig::new(DeviceConfig::default());

        rig.hold(Button::Camera, true);
        rig.hold(Button::Plus, true);
        let iteration = rig.run(10);
        assert_eq!(&iteration.presses[..], &[Button::Camera, Button::Plus]);

        // Release, then press plus again after the debounce window
        rig.hold(Button::Camera, false);
        rig.hold(Button::Plus, false);
        rig.run(120);
        rig.hold(Button::Plus, true);
        rig.run(240);

        let iteration = rig.run(500);
        assert!(iteration.sent);

        let reports = decode_reports(&rig.serial.take_tx());
        assert_eq!(
            reports,
            [DeviceReport {
                camera_requested: true,
                microphone_requested: false,
                plus: 2,
                minus: 0,
                screenshot: 0,
            }]
        );

        let mut tracker = ReportTracker::new();
        let actions = tracker.update(reports[0]);
        assert!(actions.toggle_camera);
        assert!(actions.send_plus);
        assert!(!actions.send_screenshot);
    }

    #[test]
    fn test_garbage_between_frames_is_tolerated() {
        let mut rig = Rig::new(DeviceConfig::default());
        rig.serial.rx.extend([0x00, 0x13, 0xFE, 0x42, 0x07, 0x99, 0x12]);
        rig.serial.host_sends(HostStatus {
            camera_active: false,
            microphone_active: true,
        });
        rig.serial.host_sends(HostStatus {
            camera_active: false,
            microphone_active: true,
        });

        rig.run(50);
        assert!(rig.ctx.is_link_up());
        assert!(rig.ctx.remote().microphone_active);
        assert!(!rig.ctx.remote().camera_active);
    }

    #[test]
    fn test_backlog_drained_before_timeout_check() {
        let mut rig = Rig::new(DeviceConfig::default());
        rig.serial.host_sends(HostStatus::default());
        rig.run(0);

        // A stalled loop finds several read chunks queued, the valid frame last
        let backlog = [0u8; 8 * STATUS_FRAME_LEN];
        assert!(backlog.len() > 2 * RX_CHUNK_SIZE);
        rig.serial.rx.extend(backlog);
        rig.serial.host_sends(HostStatus {
            camera_active: true,
            microphone_active: false,
        });

        let iteration = rig.run(2000);
        assert_eq!(iteration.rx.accepted, 1);
        assert_eq!(iteration.link_event, None);
        assert!(rig.ctx.is_link_up());
        assert!(rig.serial.rx.is_empty());
        assert_eq!(iteration.color, Color::new(40, 0, 0));
    }

    #[test]
    fn test_failing_indicator_keeps_reporting() {
        let mut rig = Rig::new(DeviceConfig::default());
        rig.led.broken = true;

        rig.hold(Button::Screenshot, true);
        assert!(rig.run(0).faults.indicator);

        assert_eq!(rig.run_span(10, 5000), every_period_until(5000));
        let reports = decode_reports(&rig.serial.take_tx());
        assert_eq!(reports.len(), 10);
        assert!(reports.iter().all(|report| report.screenshot == 1));
    }

    #[test]
    fn test_failing_pins_keep_link_running() {
        let mut rig = Rig::new(DeviceConfig::default());
        rig.pins_broken.set(true);
        rig.hold(Button::Camera, true);
        rig.serial.host_sends(HostStatus {
            camera_active: true,
            microphone_active: true,
        });

        let iteration = rig.run(100);
        assert_eq!(iteration.faults.input, Some(digital::ErrorKind::Other));
        assert!(iteration.presses.is_empty());
        assert!(rig.ctx.is_link_up());
        assert_eq!(iteration.color, Color::new(40, 20, 0));

        assert_eq!(rig.run_span(110, 1000), [500, 1000]);
        assert!(!rig.ctx.request().camera_requested);

        // Pins recover, the held button registers
        rig.pins_broken.set(false);
        let iteration = rig.run(1010);
        assert_eq!(iteration.faults, RunFaults::default());
        assert_eq!(&iteration.presses[..], &[Button::Camera]);
    }

    #[test]
    fn test_serial_faults_do_not_stop_the_loop() {
        let mut rig = Rig::new(DeviceConfig::default());
        rig.serial.fail_reads = true;
        rig.serial.fail_writes = true;
        rig.hold(Button::Minus, true);

        let iteration = rig.run(0);
        assert_eq!(iteration.faults.serial_read, Some(SerialErrorKind::Other));
        assert_eq!(&iteration.presses[..], &[Button::Minus]);
        assert_eq!(rig.led.shown, [Color::OFF]);

        let iteration = rig.run(500);
        assert!(!iteration.sent);
        assert_eq!(
            iteration.faults.serial_write,
            Some(SerialErrorKind::BrokenPipe)
        );

        // The port comes back, the next report carries the press
        rig.serial.fail_reads = false;
        rig.serial.fail_writes = false;
        assert!(!rig.run(990).sent);
        assert!(rig.run(1000).sent);
        let reports = decode_reports(&rig.serial.take_tx());
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].minus, 1);
    }
}
