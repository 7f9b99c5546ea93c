//! Native binary container for interaction datasets.
//!
//! # Format Structure
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    Header (16 bytes)                        │
//! ├────────────────────────────────────────────────────────────┤
//! │                Postcard payload (variable)                  │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Postcard encodes integers and floats deterministically, so encoding the
//! same dataset twice yields identical bytes.

use std::io::{Read, Write};

use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

/// Magic bytes identifying an edurank dataset file.
pub const MAGIC: &[u8; 4] = b"EDRK";

/// Current format version (major).
pub const CURRENT_VERSION_MAJOR: u8 = 1;

/// Current format version (minor).
pub const CURRENT_VERSION_MINOR: u8 = 0;

/// Size of the format header in bytes.
pub const HEADER_SIZE: usize = 16;

// ============================================================================
// Format Flags
// ============================================================================

/// Bitfield describing which optional columns the payload carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatFlags(u16);

impl FormatFlags {
    pub const HAS_ANSWER_STATE: u16 = 1 << 0;
    pub const HAS_PLAYER_FEATURES: u16 = 1 << 1;
    pub const HAS_QUESTION_FEATURES: u16 = 1 << 2;

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn contains(self, flag: u16) -> bool {
        (self.0 & flag) != 0
    }

    pub fn set(&mut self, flag: u16) {
        self.0 |= flag;
    }
}

// ============================================================================
// Format Header
// ============================================================================

/// 16-byte header.
///
/// # Layout
///
/// ```text
/// Offset  Size  Field
/// ------  ----  -----
/// 0       4     Magic ("EDRK")
/// 4       1     Version major
/// 5       1     Version minor
/// 6       2     Flags (bitfield)
/// 8       4     Payload size (bytes)
/// 12      4     CRC32 checksum of payload
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatHeader {
    pub version_major: u8,
    pub version_minor: u8,
    pub flags: FormatFlags,
    pub payload_size: u32,
    pub checksum: u32,
}

impl FormatHeader {
    /// Header of the current version. Size and checksum are filled in on write.
    pub fn new(flags: FormatFlags) -> Self {
        Self {
            version_major: CURRENT_VERSION_MAJOR,
            version_minor: CURRENT_VERSION_MINOR,
            flags,
            payload_size: 0,
            checksum: 0,
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(MAGIC);
        buf[4] = self.version_major;
        buf[5] = self.version_minor;
        buf[6..8].copy_from_slice(&self.flags.bits().to_le_bytes());
        buf[8..12].copy_from_slice(&self.payload_size.to_le_bytes());
        buf[12..16].copy_from_slice(&self.checksum.to_le_bytes());
        buf
    }

    pub fn from_bytes(buf: &[u8; HEADER_SIZE]) -> Result<Self, DeserializeError> {
        if &buf[0..4] != MAGIC {
            return Err(DeserializeError::NotADataset);
        }

        let version_major = buf[4];
        let version_minor = buf[5];
        if version_major > CURRENT_VERSION_MAJOR {
            return Err(DeserializeError::UnsupportedVersion {
                major: version_major,
                minor: version_minor,
            });
        }

        Ok(Self {
            version_major,
            version_minor,
            flags: FormatFlags::from_bits(u16::from_le_bytes([buf[6], buf[7]])),
            payload_size: u32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]),
            checksum: u32::from_le_bytes([buf[12], buf[13], buf[14], buf[15]]),
        })
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during serialization.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("encoding error: {0}")]
    Encoding(#[from] postcard::Error),

    /// Payload does not fit the 32-bit size field.
    #[error("payload of {0} bytes is too large")]
    TooLarge(usize),
}

/// Errors that can occur during deserialization.
#[derive(Debug, Error)]
pub enum DeserializeError {
    /// Wrong magic bytes.
    #[error("not an edurank dataset file")]
    NotADataset,

    #[error("dataset requires format {major}.{minor} or later support")]
    UnsupportedVersion { major: u8, minor: u8 },

    #[error("checksum mismatch: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    #[error("file truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// The payload decoded but does not describe a valid dataset.
    #[error("corrupt payload: {0}")]
    CorruptPayload(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("decoding error: {0}")]
    Decoding(#[from] postcard::Error),
}

/// CRC32 checksum of `data`.
pub fn compute_checksum(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

// ============================================================================
// Native Codec
// ============================================================================

/// Writes and reads header-framed postcard payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeCodec;

impl NativeCodec {
    pub fn new() -> Self {
        Self
    }

    /// Write header and payload. Fills in size and checksum of `header`.
    pub fn write_to<W: Write>(
        &self,
        writer: &mut W,
        header: &mut FormatHeader,
        payload: &[u8],
    ) -> Result<(), SerializeError> {
        header.payload_size =
            u32::try_from(payload.len()).map_err(|_| SerializeError::TooLarge(payload.len()))?;
        header.checksum = compute_checksum(payload);

        writer.write_all(&header.to_bytes())?;
        writer.write_all(payload)?;
        Ok(())
    }

    /// Read header and payload, verifying the checksum.
    pub fn read_from<R: Read>(
        &self,
        reader: &mut R,
    ) -> Result<(FormatHeader, Vec<u8>), DeserializeError> {
        let mut header_buf = [0u8; HEADER_SIZE];
        let read = read_fully(reader, &mut header_buf)?;
        if read < HEADER_SIZE {
            return Err(DeserializeError::Truncated {
                expected: HEADER_SIZE,
                actual: read,
            });
        }
        let header = FormatHeader::from_bytes(&header_buf)?;

        let mut payload = vec![0u8; header.payload_size as usize];
        let read = read_fully(reader, &mut payload)?;
        if read < payload.len() {
            return Err(DeserializeError::Truncated {
                expected: payload.len(),
                actual: read,
            });
        }

        let actual = compute_checksum(&payload);
        if actual != header.checksum {
            return Err(DeserializeError::ChecksumMismatch {
                expected: header.checksum,
                actual,
            });
        }
        Ok((header, payload))
    }

    /// Encode `payload` with postcard and frame it.
    pub fn serialize<T: serde::Serialize>(
        &self,
        flags: FormatFlags,
        payload: &T,
    ) -> Result<Vec<u8>, SerializeError> {
        let payload_bytes = postcard::to_allocvec(payload)?;
        let mut header = FormatHeader::new(flags);
        let mut output = Vec::with_capacity(HEADER_SIZE + payload_bytes.len());
        self.write_to(&mut output, &mut header, &payload_bytes)?;
        Ok(output)
    }

    /// Unframe and decode a payload.
    pub fn deserialize<T: for<'de> serde::Deserialize<'de>>(
        &self,
        mut bytes: &[u8],
    ) -> Result<(FormatHeader, T), DeserializeError> {
        let (header, payload_bytes) = self.read_from(&mut bytes)?;
        let payload = postcard::from_bytes(&payload_bytes)?;
        Ok((header, payload))
    }
}

/// Fill `buf` as far as the reader allows, returning the bytes read.
fn read_fully<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_roundtrip() {
        let header = FormatHeader {
            version_major: 1,
            version_minor: 3,
            flags: FormatFlags::from_bits(
                FormatFlags::HAS_ANSWER_STATE | FormatFlags::HAS_QUESTION_FEATURES,
            ),
            payload_size: 4096,
            checksum: 0xDEADBEEF,
        };
        let bytes = header.to_bytes();
        assert_eq!(&bytes[0..4], b"EDRK");
        assert_eq!(FormatHeader::from_bytes(&bytes).unwrap(), header);
    }

    #[test]
    fn header_wrong_magic() {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(b"BSTR");
        assert!(matches!(
            FormatHeader::from_bytes(&buf),
            Err(DeserializeError::NotADataset)
        ));
    }

    #[test]
    fn header_unsupported_version() {
        let mut header = FormatHeader::new(FormatFlags::empty());
        header.version_major = 9;
        assert!(matches!(
            FormatHeader::from_bytes(&header.to_bytes()),
            Err(DeserializeError::UnsupportedVersion { major: 9, .. })
        ));
    }

    #[test]
    fn codec_detects_corruption() {
        let codec = NativeCodec::new();
        let mut header = FormatHeader::new(FormatFlags::empty());
        let mut buffer = Vec::new();
        codec.write_to(&mut buffer, &mut header, b"some dataset bytes").unwrap();

        buffer[HEADER_SIZE + 3] ^= 0xFF;
        assert!(matches!(
            codec.read_from(&mut buffer.as_slice()),
            Err(DeserializeError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn codec_detects_truncation() {
        let codec = NativeCodec::new();
        let mut header = FormatHeader::new(FormatFlags::empty());
        let mut buffer = Vec::new();
        codec.write_to(&mut buffer, &mut header, b"0123456789").unwrap();

        let cut = &buffer[..HEADER_SIZE + 4];
        assert!(matches!(
            codec.read_from(&mut &cut[..]),
            Err(DeserializeError::Truncated { expected: 10, actual: 4 })
        ));
        assert!(matches!(
            codec.read_from(&mut &buffer[..5]),
            Err(DeserializeError::Truncated { expected: HEADER_SIZE, actual: 5 })
        ));
    }

    #[test]
    fn serialize_is_deterministic() {
        let codec = NativeCodec::new();
        let value = (vec![1u32, 2, 3], vec![0.5f64, -0.25]);
        let a = codec.serialize(FormatFlags::empty(), &value).unwrap();
        let b = codec.serialize(FormatFlags::empty(), &value).unwrap();
        assert_eq!(a, b);

        let (_, decoded): (_, (Vec<u32>, Vec<f64>)) = codec.deserialize(&a).unwrap();
        assert_eq!(decoded, value);
    }
}
