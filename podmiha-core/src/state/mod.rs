//! Device state
//!
//! Two halves of the link: what the device requests, and what the host has
//! confirmed.

pub mod request;

pub use request::{ActionCounter, LocalRequestState};

use podmiha_protocol::HostStatus;

/// Camera and microphone states as last confirmed by the host
///
/// Only a validated inbound frame updates this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfirmedRemoteState {
    pub camera_active: bool,
    pub microphone_active: bool,
}

impl From<HostStatus> for ConfirmedRemoteState {
    fn from(status: HostStatus) -> Self {
        Self {
            camera_active: status.camera_active,
            microphone_active: status.microphone_active,
        }
    }
}
