//! RGF binary format definitions
//!
//! The record starts with a fixed header (magic, version, section counts,
//! bounds and normalization scalars) followed by the attribute sections.

pub mod rgf_mesh;

pub use rgf_mesh::*;
