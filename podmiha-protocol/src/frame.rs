//! Frame encoding and decoding for the Podmiha serial link.
//!
//! Frame format (both directions):
//! - PAYLOAD (N bytes): message-specific data, never 0xFE followed by 0xFF
//! - CHECKSUM (1 byte): XOR of all PAYLOAD bytes
//! - DELIMITER (2 bytes): 0xFE 0xFF
//!
//! There is no start byte and no length prefix. Receivers find frame
//! boundaries by scanning for the delimiter over a small rolling buffer.

use heapless::Vec;

/// First delimiter byte
pub const DELIMITER_1: u8 = 0xFE;

/// Second delimiter byte
pub const DELIMITER_2: u8 = 0xFF;

/// Bytes added to every payload (CHECKSUM + DELIMITER)
pub const FRAME_OVERHEAD: usize = 3;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 5;

/// Maximum complete frame size
pub const MAX_FRAME_SIZE: usize = MAX_PAYLOAD_SIZE + FRAME_OVERHEAD;

/// Errors that can occur during frame parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Checksum mismatch
    InvalidChecksum,
    /// Payload length does not match the message type
    InvalidLength,
    /// A payload byte uses a value reserved for framing (254 or 255)
    ReservedValue,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// XOR of all bytes
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, &byte| acc ^ byte)
}

/// A parsed or constructed frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a new frame with the given payload
    pub fn new(payload: &[u8]) -> Result<Self, FrameError> {
        let mut payload_vec = Vec::new();
        payload_vec
            .extend_from_slice(payload)
            .map_err(|_| FrameError::PayloadTooLarge)?;

        Ok(Self {
            payload: payload_vec,
        })
    }

    /// Checksum byte for this frame's payload
    pub fn checksum(&self) -> u8 {
        checksum(&self.payload)
    }

    /// Total encoded length of this frame
    pub fn encoded_len(&self) -> usize {
        self.payload.len() + FRAME_OVERHEAD
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = self.encoded_len();
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        let n = self.payload.len();
        buffer[..n].copy_from_slice(&self.payload);
        buffer[n] = self.checksum();
        buffer[n + 1] = DELIMITER_1;
        buffer[n + 2] = DELIMITER_2;

        Ok(frame_len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| FrameError::BufferTooSmall)?;
        Ok(vec)
    }
}

/// Streaming delimiter scanner for fixed-size frames
///
/// `CAP` is the full frame length including checksum and delimiter, so the
/// payload is `CAP - 3` bytes. Bytes are stored in a rolling buffer of `CAP`
/// bytes; when the cursor reaches the end it wraps to 0 and overwrites the
/// oldest data. Garbage therefore never grows the buffer, and the scanner
/// realigns on the next genuine delimiter.
///
/// A boundary is the last *stored* byte being 0xFE and the incoming byte
/// being 0xFF. The 0xFF itself is never stored, so the stored-byte history
/// still ends in 0xFE after a boundary.
#[derive(Debug, Clone)]
pub struct FrameScanner<const CAP: usize> {
    buffer: [u8; CAP],
    position: usize,
    previous: u8,
}

impl<const CAP: usize> Default for FrameScanner<CAP> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CAP: usize> FrameScanner<CAP> {
    /// Payload bytes carried by frames of this size
    pub const PAYLOAD_LEN: usize = CAP - FRAME_OVERHEAD;

    /// Create a new scanner with an all-zero buffer
    pub const fn new() -> Self {
        Self {
            buffer: [0; CAP],
            position: 0,
            previous: 0,
        }
    }

    /// Current cursor position in the rolling buffer
    pub fn position(&self) -> usize {
        self.position
    }

    /// Feed a single byte to the scanner
    ///
    /// Returns `Ok(Some(frame))` when a delimiter closes a frame with a valid
    /// checksum, `Ok(None)` when the byte was buffered, or
    /// `Err(FrameError::InvalidChecksum)` when a delimiter closed a corrupt
    /// frame. The scanner is ready for the next byte in every case.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        if self.previous == DELIMITER_1 && byte == DELIMITER_2 {
            self.position = 0;

            let n = Self::PAYLOAD_LEN;
            let payload = &self.buffer[..n];
            if checksum(payload) != self.buffer[n] {
                return Err(FrameError::InvalidChecksum);
            }

            return Frame::new(payload).map(Some);
        }

        self.buffer[self.position] = byte;
        self.previous = byte;
        self.position += 1;

        if self.position >= CAP {
            self.position = 0;
        }

        Ok(None)
    }

    /// Feed multiple bytes to the scanner
    ///
    /// Consumes every byte and returns the last valid frame found, if any.
    /// Corrupt frames are skipped.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Option<Frame> {
        let mut last = None;
        for &byte in bytes {
            if let Ok(Some(frame)) = self.feed(byte) {
                last = Some(frame);
            }
        }
        last
    }
}
