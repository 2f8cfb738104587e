//! Error types for import, geometry and codec operations.

use rgf_shared::HeaderError;
use thiserror::Error;

use crate::model::Attribute;

/// OBJ import failures. All are detected before the model is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("OBJ input is empty")]
    EmptyInput,

    #[error("model has no vertex buffer to import into")]
    MissingVertexBuffer,

    #[error("{attribute} buffer too small: need {required} elements, have {available}")]
    Capacity {
        attribute: Attribute,
        required: usize,
        available: usize,
    },

    #[error("line {line}: face references vertex {reference}, which does not exist")]
    IndexOutOfRange { line: usize, reference: i64 },

    #[error("{0} vertices cannot be addressed by 32-bit indices")]
    TooManyVertices(usize),

    #[error("line {line}: vertex coordinate does not fit in f32")]
    CoordinateOutOfRange { line: usize },

    #[error("vertex bounding box extent does not fit in f32")]
    ExtentOverflow,
}

/// Geometry derivation and transform failures.
///
/// Missing inputs are reported instead of silently skipping the operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("required {0} buffer is not present")]
    MissingBuffer(Attribute),

    #[error("{attribute} buffer has {actual} elements, expected {expected}")]
    LengthMismatch {
        attribute: Attribute,
        expected: usize,
        actual: usize,
    },

    #[error("index buffer length {0} is not a whole number of triangles")]
    PartialTriangle(usize),

    #[error("index {index} out of bounds for {vertex_count} vertices")]
    IndexOutOfRange { index: i32, vertex_count: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

/// Binary encode/decode failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error(transparent)]
    Header(#[from] HeaderError),

    #[error("output buffer too small: need {required} bytes, have {available}")]
    BufferTooSmall { required: usize, available: usize },

    #[error("record truncated: counts require {required} bytes, buffer has {available}")]
    Truncated { required: u64, available: usize },

    #[error("{attribute} section of {len} elements does not fit a 32-bit count")]
    CountOverflow { attribute: Attribute, len: usize },

    #[error("record of {0} bytes is not addressable on this host")]
    RecordTooLarge(u64),

    #[error("{0} section is not 4-byte aligned in the input buffer")]
    Misaligned(Attribute),

    #[error("zero-copy decode requires a little-endian host")]
    UnsupportedHost,
}

/// Any error produced by the core library.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RgfError {
    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}
