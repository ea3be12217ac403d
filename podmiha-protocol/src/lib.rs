//! Podmiha Serial Link Protocol
//!
//! This crate defines the UART protocol between the Podmiha button node and
//! the host process that pauses/resumes the camera and microphone. Both sides
//! broadcast their full state periodically; there are no acknowledgements.
//!
//! # Protocol Overview
//!
//! Every frame is a fixed-size payload followed by an XOR checksum and a
//! two-byte delimiter:
//! ```text
//! ┌─────────────┬──────────┬──────┬──────┐
//! │ PAYLOAD     │ CHECKSUM │ 0xFE │ 0xFF │
//! │ 2B or 5B    │ 1B       │ 1B   │ 1B   │
//! └─────────────┴──────────┴──────┴──────┘
//! ```
//!
//! - Host → Device (5 bytes): camera, microphone, checksum, delimiter
//! - Device → Host (8 bytes): camera request, microphone request, plus,
//!   minus and screenshot counters, checksum, delimiter

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod frame;
pub mod host;
pub mod messages;

pub use frame::{checksum, Frame, FrameError, FrameScanner, DELIMITER_1, DELIMITER_2};
pub use host::{HostActions, ReportTracker};
pub use messages::{
    DeviceReport, HostStatus, ReportScanner, StatusScanner, COUNTER_WRAP, REPORT_FRAME_LEN,
    STATUS_FRAME_LEN,
};
