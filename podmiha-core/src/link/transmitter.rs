//! Periodic transmitter
//!
//! Broadcasts the local request state on a fixed period whether or not the
//! link is up. The host needs these frames to re-establish the link, and it
//! answers each one with its own status.

use podmiha_protocol::{FrameError, REPORT_FRAME_LEN};

use crate::state::LocalRequestState;

/// Fixed-period report scheduler
#[derive(Debug, Clone)]
pub struct PeriodicTransmitter {
    /// Send period (ms)
    period_ms: u64,
    /// Time of the last send, or of creation before the first send
    last_send_ms: u64,
}

impl PeriodicTransmitter {
    /// Create a transmitter whose first send is one period after `now_ms`
    pub fn new(period_ms: u64, now_ms: u64) -> Self {
        Self {
            period_ms,
            last_send_ms: now_ms,
        }
    }

    /// Check if a send is due
    pub fn is_due(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_send_ms) >= self.period_ms
    }

    /// Encode a report if the period has elapsed
    ///
    /// The period restarts at `now_ms` when it fires, so a late poll delays
    /// the schedule instead of producing a burst.
    pub fn poll(
        &mut self,
        now_ms: u64,
        state: &LocalRequestState,
    ) -> Result<Option<[u8; REPORT_FRAME_LEN]>, FrameError> {
        if !self.is_due(now_ms) {
            return Ok(None);
        }

        self.last_send_ms = now_ms;
        state.report().encode().map(Some)
    }

    /// Configured period
    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }
}
