//! Raw Geometry Format core library
//!
//! Converts OBJ text into RGF geometry records without allocating: every
//! buffer is handed in by the caller and the model is a borrowed view over
//! that storage.
//!
//! # Modules
//!
//! - [`math`] - numeric kernel (approximate square root, length, normalize)
//! - [`scanner`] - bounds-checked byte cursor and numeric literal scanning
//! - [`model`] - `MeshModel` / `MeshView` borrowed mesh views
//! - [`obj`] - two-pass OBJ importer with fan triangulation
//! - [`derive`] - per-vertex normals and tangent-space bases
//! - [`transform`] - reversible recenter and rescale
//! - [`codec`] - RGF encode and zero-copy decode
//!
//! # Example
//!
//! ```
//! use rgf_core::{MeshModel, codec, obj};
//!
//! let source = b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
//! let stats = obj::measure_obj(source).unwrap();
//!
//! let mut vertices = vec![0.0f32; stats.vertices_len()];
//! let mut indices = vec![0i32; stats.indices_len()];
//! let mut model = MeshModel::new()
//!     .with_vertices(&mut vertices)
//!     .with_indices(&mut indices);
//! obj::import_obj(&mut model, source).unwrap();
//!
//! let mut out = vec![0u8; codec::encoded_len(&model.as_view()).unwrap()];
//! codec::encode(&model.as_view(), &mut out).unwrap();
//! ```

pub mod codec;
pub mod derive;
pub mod error;
pub mod math;
pub mod model;
pub mod obj;
pub mod scanner;
pub mod transform;

pub use error::{CodecError, GeometryError, ImportError, RgfError};
pub use model::{Applied, Attribute, MeshModel, MeshView};
pub use obj::ObjStats;

// Re-export the shared format types so consumers need a single dependency
pub use rgf_shared::{Aabb, FormatVersion, Normalization, RGF_FORMAT, RgfHeader, SectionCounts};
