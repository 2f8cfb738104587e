//! rgf-export library
//!
//! Conversion functions for use by other tools and by the `rgf-export` binary.

pub mod codegen;
pub mod convert;
pub mod manifest;
pub mod storage;

// Re-export the format descriptor (extension constants)
pub use rgf_shared::{RGF_FORMAT, RgfFormat};

pub use codegen::emit_c_header;
pub use convert::{ConvertOptions, ConvertedMesh, convert_obj, convert_obj_to_memory};
pub use storage::{MeshStorage, RecordBuffer};
