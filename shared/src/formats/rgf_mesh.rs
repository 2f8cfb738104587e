//! RGF record header (88 bytes)
//!
//! All multi-byte values are little-endian, floats are IEEE-754 binary32.
//!
//! # Layout
//! ```text
//! 0x00: magic "RGF\0" (4 bytes)
//! 0x04: version u8
//! 0x05: padding (3 bytes, must be zero)
//! 0x08: counts u32 x 6 (vertices, normals, tangents, bitangents, uvs, indices)
//! 0x20: min f32 x 3, max f32 x 3, center f32 x 3
//! 0x44: original_center f32 x 3, original_max_dim f32, current_scale f32
//! 0x58: sections (vertices, normals, tangents, bitangents, uvs as f32; indices as i32)
//! ```
//!
//! Every count is a number of 32-bit elements, so a section occupies
//! `count * 4` bytes. Sections with a zero count are omitted entirely.

use thiserror::Error;

use crate::math::{Aabb, Normalization};
use crate::rgf_format::RGF_FORMAT;

/// Size of magic + version + padding
pub const PREAMBLE_SIZE: usize = 8;

/// Bytes per section element (f32 or i32)
pub const ELEMENT_SIZE: usize = 4;

/// Number of section count fields
pub const SECTION_COUNT: usize = 6;

/// Number of scalar float fields following the counts
pub const SCALAR_COUNT: usize = 14;

// =============================================================================
// Version
// =============================================================================

/// Binary format version tag.
///
/// Decoders dispatch on this enum so rejecting or migrating future versions
/// is a matter of adding a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FormatVersion {
    V1 = 1,
}

impl FormatVersion {
    /// Version written by the encoder.
    pub const CURRENT: Self = Self::V1;
}

impl TryFrom<u8> for FormatVersion {
    type Error = HeaderError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::V1),
            other => Err(HeaderError::UnsupportedVersion(other)),
        }
    }
}

impl From<FormatVersion> for u8 {
    fn from(version: FormatVersion) -> Self {
        version as u8
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Header validation failures, checked before any field is trusted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("header too short: expected {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },

    #[error("bad magic bytes {0:02x?}")]
    BadMagic([u8; 4]),

    #[error("unsupported format version {0}")]
    UnsupportedVersion(u8),

    #[error("reserved padding bytes are not zero: {0:02x?}")]
    NonZeroPadding([u8; 3]),
}

// =============================================================================
// Section Counts
// =============================================================================

/// Element counts of the six attribute sections, in file order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionCounts {
    pub vertices: u32,
    pub normals: u32,
    pub tangents: u32,
    pub bitangents: u32,
    pub uvs: u32,
    pub indices: u32,
}

impl SectionCounts {
    /// Counts in file order.
    pub fn to_array(&self) -> [u32; SECTION_COUNT] {
        [
            self.vertices,
            self.normals,
            self.tangents,
            self.bitangents,
            self.uvs,
            self.indices,
        ]
    }

    pub fn from_array(counts: [u32; SECTION_COUNT]) -> Self {
        let [vertices, normals, tangents, bitangents, uvs, indices] = counts;
        Self {
            vertices,
            normals,
            tangents,
            bitangents,
            uvs,
            indices,
        }
    }

    /// Total payload bytes following the header.
    ///
    /// Computed in `u64` so hostile counts cannot overflow on 32-bit hosts.
    pub fn payload_len(&self) -> u64 {
        self.to_array()
            .iter()
            .map(|&count| u64::from(count) * ELEMENT_SIZE as u64)
            .sum()
    }

    /// Total record size (header + payload).
    pub fn record_len(&self) -> u64 {
        RgfHeader::SIZE as u64 + self.payload_len()
    }
}

// =============================================================================
// Header
// =============================================================================

/// Decoded RGF header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RgfHeader {
    pub version: FormatVersion,
    pub counts: SectionCounts,
    pub bounds: Aabb,
    pub normalization: Normalization,
}

impl RgfHeader {
    pub const SIZE: usize =
        PREAMBLE_SIZE + SECTION_COUNT * ELEMENT_SIZE + SCALAR_COUNT * ELEMENT_SIZE;

    pub fn new(counts: SectionCounts, bounds: Aabb, normalization: Normalization) -> Self {
        Self {
            version: FormatVersion::CURRENT,
            counts,
            bounds,
            normalization,
        }
    }

    /// The fourteen scalar floats in file order.
    fn scalars(&self) -> [f32; SCALAR_COUNT] {
        let b = &self.bounds;
        let n = &self.normalization;
        [
            b.min[0],
            b.min[1],
            b.min[2],
            b.max[0],
            b.max[1],
            b.max[2],
            b.center[0],
            b.center[1],
            b.center[2],
            n.original_center[0],
            n.original_center[1],
            n.original_center[2],
            n.original_max_dim,
            n.current_scale,
        ]
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(RGF_FORMAT.magic);
        bytes[4] = self.version.into();
        // padding bytes stay 0

        let mut offset = PREAMBLE_SIZE;
        for count in self.counts.to_array() {
            bytes[offset..offset + 4].copy_from_slice(&count.to_le_bytes());
            offset += 4;
        }
        for scalar in self.scalars() {
            bytes[offset..offset + 4].copy_from_slice(&scalar.to_le_bytes());
            offset += 4;
        }
        bytes
    }

    /// Read and validate a header.
    ///
    /// Checks run in order: length, magic, version, padding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HeaderError> {
        if bytes.len() < Self::SIZE {
            return Err(HeaderError::TooShort {
                expected: Self::SIZE,
                actual: bytes.len(),
            });
        }

        let magic = [bytes[0], bytes[1], bytes[2], bytes[3]];
        if &magic != RGF_FORMAT.magic {
            return Err(HeaderError::BadMagic(magic));
        }

        let version = FormatVersion::try_from(bytes[4])?;

        let padding = [bytes[5], bytes[6], bytes[7]];
        if padding != [0; 3] {
            return Err(HeaderError::NonZeroPadding(padding));
        }

        let word = |index: usize| {
            let at = PREAMBLE_SIZE + index * 4;
            [bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]
        };

        let mut counts = [0u32; SECTION_COUNT];
        for (i, count) in counts.iter_mut().enumerate() {
            *count = u32::from_le_bytes(word(i));
        }

        let mut s = [0f32; SCALAR_COUNT];
        for (i, scalar) in s.iter_mut().enumerate() {
            *scalar = f32::from_le_bytes(word(SECTION_COUNT + i));
        }

        Ok(Self {
            version,
            counts: SectionCounts::from_array(counts),
            bounds: Aabb {
                min: [s[0], s[1], s[2]],
                max: [s[3], s[4], s[5]],
                center: [s[6], s[7], s[8]],
            },
            normalization: Normalization {
                original_center: [s[9], s[10], s[11]],
                original_max_dim: s[12],
                current_scale: s[13],
            },
        })
    }
}
