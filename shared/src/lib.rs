//! Shared types for the Raw Geometry Format (RGF).
//!
//! This crate holds the parts of the format every other crate agrees on:
//!
//! - [`rgf_format`] - magic bytes, version and file extensions
//! - [`formats`] - the fixed 88-byte record header, its parser and serializer
//! - [`math`] - POD bounding box and normalization state

pub mod formats;
pub mod math;
pub mod rgf_format;

pub use formats::{FormatVersion, HeaderError, RgfHeader, SectionCounts};
pub use math::{Aabb, Normalization};
pub use rgf_format::{RGF_FORMAT, RgfFormat};
