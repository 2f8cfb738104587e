//! RGF format constants.
//!
//! `RgfFormat` is the single source of truth for the record magic, the
//! file extensions the tools read and write.
//!
//! # Example
//!
//! ```
//! use rgf_shared::RGF_FORMAT;
//!
//! assert_eq!(RGF_FORMAT.extension, "rgf");
//! assert_eq!(RGF_FORMAT.magic, b"RGF\0");
//! ```

/// Format specification for RGF records and their companion files.
#[derive(Debug, Clone, Copy)]
pub struct RgfFormat {
    /// Binary record extension without dot
    pub extension: &'static str,

    /// Magic bytes at the start of every record (4 bytes)
    pub magic: &'static [u8; 4],

    /// Extension of the source-embedding header emitted by the tools
    pub header_ext: &'static str,

    /// Extension of the OBJ sources the importer accepts
    pub source_ext: &'static str,
}

impl RgfFormat {
    /// Create a new format specification.
    pub const fn new(
        extension: &'static str,
        magic: &'static [u8; 4],
        header_ext: &'static str,
        source_ext: &'static str,
    ) -> Self {
        Self {
            extension,
            magic,
            header_ext,
            source_ext,
        }
    }
}

/// RGF format specification.
///
/// - Record extension: `.rgf`
/// - Magic bytes: `RGF\0`
/// - Emitted header extension: `.h`
pub const RGF_FORMAT: RgfFormat = RgfFormat::new("rgf", b"RGF\0", "h", "obj");
