//! Link liveness watchdog
//!
//! Tracks when the last valid host frame arrived and classifies the link as
//! up or down. Up → Down is driven by time, Down → Up only by a frame.

/// Link state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    /// First valid frame after the link was down
    Established,
    /// No valid frame within the timeout
    Lost,
}

/// Liveness watchdog for the host link
#[derive(Debug, Clone)]
pub struct LinkWatchdog {
    /// Timeout after the last valid frame (ms)
    timeout_ms: u64,
    /// Time of the last valid frame, or of boot when starting optimistic
    last_valid_ms: Option<u64>,
    /// Current link status
    up: bool,
}

impl LinkWatchdog {
    /// Create a watchdog that reports the link down until the first frame
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            last_valid_ms: None,
            up: false,
        }
    }

    /// Create a watchdog that reports the link up for the first timeout
    /// window after `boot_ms`, as if a frame had arrived at boot
    pub fn new_optimistic(timeout_ms: u64, boot_ms: u64) -> Self {
        Self {
            timeout_ms,
            last_valid_ms: Some(boot_ms),
            up: true,
        }
    }

    /// Record a valid frame
    ///
    /// Returns [`LinkEvent::Established`] if the link was down.
    pub fn frame_accepted(&mut self, now_ms: u64) -> Option<LinkEvent> {
        self.last_valid_ms = Some(now_ms);
        if self.up {
            None
        } else {
            self.up = true;
            Some(LinkEvent::Established)
        }
    }

    /// Check the timeout
    ///
    /// Returns [`LinkEvent::Lost`] on the poll that detects expiry.
    pub fn poll(&mut self, now_ms: u64) -> Option<LinkEvent> {
        if !self.up {
            return None;
        }

        match self.last_valid_ms {
            Some(last) if now_ms.saturating_sub(last) >= self.timeout_ms => {
                self.up = false;
                Some(LinkEvent::Lost)
            }
            _ => None,
        }
    }

    /// Check if the link is up
    pub fn is_up(&self) -> bool {
        self.up
    }

    /// Milliseconds since the last valid frame, if one was ever recorded
    pub fn since_last_frame(&self, now_ms: u64) -> Option<u64> {
        self.last_valid_ms.map(|last| now_ms.saturating_sub(last))
    }

    /// Configured timeout
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }
}
