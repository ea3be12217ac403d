//! Message types for the Podmiha serial link
//!
//! - Host → Device: [`HostStatus`], the camera/microphone states the host
//!   actually applied
//! - Device → Host: [`DeviceReport`], the toggle requests and action
//!   counters tracked by the button node

use crate::frame::{
    checksum, Frame, FrameError, FrameScanner, DELIMITER_1, DELIMITER_2, FRAME_OVERHEAD,
};

/// Host status payload length (camera, microphone)
pub const STATUS_PAYLOAD_LEN: usize = 2;

/// Encoded host status frame length
pub const STATUS_FRAME_LEN: usize = STATUS_PAYLOAD_LEN + FRAME_OVERHEAD;

/// Device report payload length (camera, microphone, plus, minus, screenshot)
pub const REPORT_PAYLOAD_LEN: usize = 5;

/// Encoded device report frame length
pub const REPORT_FRAME_LEN: usize = REPORT_PAYLOAD_LEN + FRAME_OVERHEAD;

/// Counters wrap to 0 when they reach this value; 254 and 255 never go on
/// the wire
pub const COUNTER_WRAP: u8 = 254;

/// Scanner for host status frames (used by the device)
pub type StatusScanner = FrameScanner<STATUS_FRAME_LEN>;

/// Scanner for device report frames (used by the host)
pub type ReportScanner = FrameScanner<REPORT_FRAME_LEN>;

/// Camera and microphone states confirmed by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HostStatus {
    /// Camera is live (not paused)
    pub camera_active: bool,
    /// Microphone is live (not paused)
    pub microphone_active: bool,
}

impl HostStatus {
    /// Parse a status from a frame
    ///
    /// Any non-zero byte counts as active.
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        match frame.payload[..] {
            [camera, microphone] => Ok(Self {
                camera_active: camera != 0,
                microphone_active: microphone != 0,
            }),
            _ => Err(FrameError::InvalidLength),
        }
    }

    /// Encode this status into a frame
    pub fn to_frame(&self) -> Frame {
        Frame {
            payload: self.payload().into_iter().collect(),
        }
    }

    /// Encode this status into its wire bytes
    pub fn encode(&self) -> [u8; STATUS_FRAME_LEN] {
        let [camera, microphone] = self.payload();
        [
            camera,
            microphone,
            checksum(&[camera, microphone]),
            DELIMITER_1,
            DELIMITER_2,
        ]
    }

    fn payload(&self) -> [u8; STATUS_PAYLOAD_LEN] {
        [self.camera_active as u8, self.microphone_active as u8]
    }
}

/// Request state reported by the device every send period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceReport {
    /// Requested camera state (flipped by the camera button)
    pub camera_requested: bool,
    /// Requested microphone state (flipped by the microphone button)
    pub microphone_requested: bool,
    /// Plus action counter (0-253)
    pub plus: u8,
    /// Minus action counter (0-253)
    pub minus: u8,
    /// Screenshot action counter (0-253)
    pub screenshot: u8,
}

impl DeviceReport {
    fn payload(&self) -> [u8; REPORT_PAYLOAD_LEN] {
        [
            self.camera_requested as u8,
            self.microphone_requested as u8,
            self.plus,
            self.minus,
            self.screenshot,
        ]
    }

    fn check_counters(counters: [u8; 3]) -> Result<(), FrameError> {
        if counters.iter().any(|&c| c >= COUNTER_WRAP) {
            return Err(FrameError::ReservedValue);
        }
        Ok(())
    }

    /// Parse a report from a frame
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        match frame.payload[..] {
            [camera, microphone, plus, minus, screenshot] => {
                Self::check_counters([plus, minus, screenshot])?;
                Ok(Self {
                    camera_requested: camera != 0,
                    microphone_requested: microphone != 0,
                    plus,
                    minus,
                    screenshot,
                })
            }
            _ => Err(FrameError::InvalidLength),
        }
    }

    /// Encode this report into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        Self::check_counters([self.plus, self.minus, self.screenshot])?;
        Frame::new(&self.payload())
    }

    /// Encode this report into its wire bytes
    pub fn encode(&self) -> Result<[u8; REPORT_FRAME_LEN], FrameError> {
        let mut buffer = [0u8; REPORT_FRAME_LEN];
        self.to_frame()?.encode(&mut buffer)?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_host_status_from_frame() {
        let frame = Frame::new(&[1, 0]).unwrap();
        let status = HostStatus::from_frame(&frame).unwrap();
        assert!(status.camera_active);
        assert!(!status.microphone_active);
    }

    #[test]
    fn test_host_status_nonzero_is_active() {
        let frame = Frame::new(&[7, 200]).unwrap();
        let status = HostStatus::from_frame(&frame).unwrap();
        assert!(status.camera_active);
        assert!(status.microphone_active);
    }

    #[test]
    fn test_host_status_wrong_length() {
        let frame = Frame::new(&[1, 0, 1]).unwrap();
        assert_eq!(
            HostStatus::from_frame(&frame),
            Err(FrameError::InvalidLength)
        );
    }

    #[test]
    fn test_host_status_encode() {
        let status = HostStatus {
            camera_active: true,
            microphone_active: false,
        };
        assert_eq!(status.encode(), [1, 0, 1, 0xFE, 0xFF]);

        let mut buffer = [0u8; STATUS_FRAME_LEN];
        status.to_frame().encode(&mut buffer).unwrap();
        assert_eq!(buffer, status.encode());
    }

    #[test]
    fn test_status_scanner_decodes_host_status() {
        let mut scanner = StatusScanner::new();
        let frame = scanner.feed_bytes(&[1, 1, 0, 0xFE, 0xFF]).unwrap();
        let status = HostStatus::from_frame(&frame).unwrap();
        assert_eq!(
            status,
            HostStatus {
                camera_active: true,
                microphone_active: true,
            }
        );
    }

    #[test]
    fn test_device_report_encode() {
        let report = DeviceReport {
            camera_requested: true,
            microphone_requested: false,
            plus: 3,
            minus: 0,
            screenshot: 253,
        };
        let bytes = report.encode().unwrap();
        assert_eq!(bytes, [1, 0, 3, 0, 253, 1 ^ 3 ^ 253, 0xFE, 0xFF]);
    }

    #[test]
    fn test_device_report_rejects_reserved_counter() {
        let report = DeviceReport {
            minus: 254,
            ..Default::default()
        };
        assert_eq!(report.encode(), Err(FrameError::ReservedValue));

        let frame = Frame::new(&[0, 0, 0, 0, 255]).unwrap();
        assert_eq!(
            DeviceReport::from_frame(&frame),
            Err(FrameError::ReservedValue)
        );
    }

    #[test]
    fn test_device_report_through_peer_scanner() {
        let report = DeviceReport {
            camera_requested: false,
            microphone_requested: true,
            plus: 12,
            minus: 250,
            screenshot: 1,
        };
        let bytes = report.encode().unwrap();

        let mut scanner = ReportScanner::new();
        let frame = scanner.feed_bytes(&bytes).unwrap();
        assert_eq!(DeviceReport::from_frame(&frame).unwrap(), report);
    }

    proptest! {
        #[test]
        fn host_status_reencodes_identically(camera in any::<bool>(), microphone in any::<bool>()) {
            let status = HostStatus {
                camera_active: camera,
                microphone_active: microphone,
            };
            let encoded = status.encode();

            let mut scanner = StatusScanner::new();
            let frame = scanner.feed_bytes(&encoded).unwrap();
            let decoded = HostStatus::from_frame(&frame).unwrap();
            prop_assert_eq!(decoded, status);
            prop_assert_eq!(decoded.encode(), encoded);
        }

        #[test]
        fn raw_status_frame_keeps_checksum(camera in 0u8..0xFE, microphone in 0u8..0xFE) {
            let encoded = [camera, microphone, camera ^ microphone, 0xFE, 0xFF];

            let mut scanner = StatusScanner::new();
            let frame = scanner.feed_bytes(&encoded).unwrap();
            let mut buffer = [0u8; STATUS_FRAME_LEN];
            frame.encode(&mut buffer).unwrap();
            prop_assert_eq!(buffer, encoded);

            let status = HostStatus::from_frame(&frame).unwrap();
            prop_assert_eq!(status.camera_active, camera != 0);
            prop_assert_eq!(status.microphone_active, microphone != 0);
        }
    }
}
