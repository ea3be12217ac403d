//! Link state machine
//!
//! Feeds inbound bytes through the status scanner, applies validated host
//! status to the confirmed remote state, and drives the watchdog.

use podmiha_protocol::{HostStatus, StatusScanner};

use super::watchdog::{LinkEvent, LinkWatchdog};
use crate::state::ConfirmedRemoteState;

/// Result of draining a batch of inbound bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxOutcome {
    /// Frames that passed validation
    pub accepted: u16,
    /// Frames dropped for a checksum mismatch
    pub rejected: u16,
    /// Link transition caused by this batch
    pub event: Option<LinkEvent>,
}

/// Receive side of the link
#[derive(Debug, Clone)]
pub struct LinkStateMachine {
    scanner: StatusScanner,
    watchdog: LinkWatchdog,
    remote: ConfirmedRemoteState,
}

impl LinkStateMachine {
    /// Create a state machine around a configured watchdog
    pub fn new(watchdog: LinkWatchdog) -> Self {
        Self {
            scanner: StatusScanner::new(),
            watchdog,
            remote: ConfirmedRemoteState::default(),
        }
    }

    /// Feed received bytes
    ///
    /// Corrupt frames are dropped without touching the remote state; the
    /// host's next periodic frame is the retry.
    pub fn receive(&mut self, bytes: &[u8], now_ms: u64) -> RxOutcome {
        let mut outcome = RxOutcome::default();

        for &byte in bytes {
            match self.scanner.feed(byte) {
                Ok(Some(frame)) => match HostStatus::from_frame(&frame) {
                    Ok(status) => {
                        self.remote = status.into();
                        outcome.accepted = outcome.accepted.saturating_add(1);
                        if let Some(event) = self.watchdog.frame_accepted(now_ms) {
                            outcome.event = Some(event);
                        }
                    }
                    Err(_) => outcome.rejected = outcome.rejected.saturating_add(1),
                },
                Ok(None) => {}
                Err(_) => outcome.rejected = outcome.rejected.saturating_add(1),
            }
        }

        outcome
    }

    /// Evaluate the watchdog timeout
    pub fn poll(&mut self, now_ms: u64) -> Option<LinkEvent> {
        self.watchdog.poll(now_ms)
    }

    /// Check if the link is up
    pub fn is_up(&self) -> bool {
        self.watchdog.is_up()
    }

    /// Last confirmed remote state
    pub fn remote(&self) -> &ConfirmedRemoteState {
        &self.remote
    }

    /// Access the watchdog
    pub fn watchdog(&self) -> &LinkWatchdog {
        &self.watchdog
    }
}
