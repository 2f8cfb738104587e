//! OBJ importer (`v`, `vt` and `f` lines)
//!
//! Two passes over the source. The first sizes every output and validates
//! face references; the second writes into the caller's buffers. Nothing in
//! the model is touched unless the first pass and the capacity checks
//! succeed.
//!
//! Faces are fan-triangulated from their first vertex. Texture and normal
//! sub-indices (`v/vt/vn`) are skipped; only the position reference is used.

use rgf_shared::{Aabb, Normalization};

use crate::error::ImportError;
use crate::model::{Attribute, MeshModel};
use crate::scanner::{Cursor, is_whitespace};

/// Face vertices read per `f` line; further references are ignored.
pub const MAX_FACE_VERTICES: usize = 8;

/// Element counts found by the sizing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjStats {
    /// `v` lines
    pub vertex_count: usize,
    /// `vt` lines
    pub uv_count: usize,
    /// `f` lines, including ones that produce no triangles
    pub face_count: usize,
    /// Triangles after fan triangulation
    pub triangle_count: usize,
}

impl ObjStats {
    /// Floats needed for positions.
    pub fn vertices_len(&self) -> usize {
        self.vertex_count * 3
    }

    /// Floats needed for texture coordinates.
    pub fn uvs_len(&self) -> usize {
        self.uv_count * 2
    }

    /// Index components needed for triangles.
    pub fn indices_len(&self) -> usize {
        self.triangle_count * 3
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    Vertex,
    TexCoord,
    Face,
    Other,
}

/// Identify a line's directive and position the cursor after its keyword.
fn directive(line: &[u8]) -> (Directive, Cursor<'_>) {
    let mut cursor = Cursor::new(line);
    cursor.skip_whitespace();

    let keyword = |cursor: &Cursor<'_>, kw: &[u8]| {
        cursor.starts_with(kw)
            && cursor
                .remaining()
                .get(kw.len())
                .is_some_and(|&b| is_whitespace(b))
    };

    let (kind, len) = if keyword(&cursor, b"vt") {
        (Directive::TexCoord, 2)
    } else if keyword(&cursor, b"v") {
        (Directive::Vertex, 1)
    } else if keyword(&cursor, b"f") {
        (Directive::Face, 1)
    } else {
        (Directive::Other, 0)
    };
    cursor.advance(len);
    (kind, cursor)
}

/// Position references of one face, capped at [`MAX_FACE_VERTICES`].
struct FaceRefs {
    refs: [i64; MAX_FACE_VERTICES],
    len: usize,
}

impl FaceRefs {
    fn scan(cursor: &mut Cursor<'_>) -> Self {
        let mut face = Self {
            refs: [0; MAX_FACE_VERTICES],
            len: 0,
        };
        loop {
            cursor.skip_whitespace();
            if cursor.is_eof() || face.len == MAX_FACE_VERTICES {
                break;
            }
            let reference = cursor.scan_int();
            if reference.is_number() {
                face.refs[face.len] = reference.value;
                face.len += 1;
            }
            cursor.skip_token();
        }
        face
    }

    fn as_slice(&self) -> &[i64] {
        &self.refs[..self.len]
    }

    fn triangle_count(&self) -> usize {
        self.len.saturating_sub(2)
    }
}

/// Resolve an OBJ reference to a 0-based index.
///
/// Negative references count back from the vertices seen so far.
#[inline]
fn resolve(reference: i64, seen: usize) -> i64 {
    if reference < 0 {
        seen as i64 + reference
    } else {
        reference - 1
    }
}

/// Read the three coordinates of a `v` line. Missing components are 0 and
/// clear the `complete` flag.
fn scan_position(cursor: &mut Cursor<'_>) -> ([f32; 3], bool) {
    let mut position = [0.0f32; 3];
    let mut complete = true;
    for component in &mut position {
        cursor.skip_whitespace();
        let scanned = cursor.scan_float();
        complete &= scanned.is_number();
        *component = scanned.value;
    }
    (position, complete)
}

/// A box whose extent or center does not fit in `f32`.
fn overflows(bounds: &Aabb) -> bool {
    let mut finished = *bounds;
    finished.finish();
    !(finished.max_extent().is_finite() && finished.center.iter().all(|c| c.is_finite()))
}

fn lines(source: &[u8]) -> impl Iterator<Item = (usize, &[u8])> {
    source
        .split(|&b| b == b'\n')
        .enumerate()
        .map(|(i, line)| (i + 1, line))
}

/// Sizing pass: count vertices, texture coordinates and triangles.
///
/// Also validates every face reference and vertex coordinate, so a
/// successful measurement guarantees [`import_obj`] cannot fail on the same
/// input. Coordinates too large for `f32`, or a bounding box whose extent
/// overflows it, are rejected.
pub fn measure_obj(source: &[u8]) -> Result<ObjStats, ImportError> {
    if source.is_empty() {
        return Err(ImportError::EmptyInput);
    }

    let mut stats = ObjStats::default();
    let mut bounds = Aabb::SEED;
    // Largest resolved reference, checked once the total vertex count is known
    let mut furthest: Option<(i64, usize, i64)> = None;

    for (line_no, line) in lines(source) {
        let (kind, mut cursor) = directive(line);
        match kind {
            Directive::Vertex => {
                let (position, _) = scan_position(&mut cursor);
                if !position.iter().all(|c| c.is_finite()) {
                    return Err(ImportError::CoordinateOutOfRange { line: line_no });
                }
                bounds.include(position);
                stats.vertex_count += 1;
            }
            Directive::TexCoord => stats.uv_count += 1,
            Directive::Face => {
                stats.face_count += 1;
                let face = FaceRefs::scan(&mut cursor);
                if face.len < 3 {
                    continue;
                }
                for &reference in face.as_slice() {
                    let index = resolve(reference, stats.vertex_count);
                    if index < 0 {
                        return Err(ImportError::IndexOutOfRange {
                            line: line_no,
                            reference,
                        });
                    }
                    if furthest.is_none_or(|(max, _, _)| index > max) {
                        furthest = Some((index, line_no, reference));
                    }
                }
                stats.triangle_count += face.triangle_count();
            }
            Directive::Other => {}
        }
    }

    if let Some((index, line, reference)) = furthest
        && index >= stats.vertex_count as i64
    {
        return Err(ImportError::IndexOutOfRange { line, reference });
    }
    if stats.vertex_count > i32::MAX as usize {
        return Err(ImportError::TooManyVertices(stats.vertex_count));
    }
    if stats.vertex_count > 0 && overflows(&bounds) {
        return Err(ImportError::ExtentOverflow);
    }

    tracing::debug!(
        vertices = stats.vertex_count,
        uvs = stats.uv_count,
        faces = stats.face_count,
        triangles = stats.triangle_count,
        "measured OBJ source"
    );
    Ok(stats)
}

fn check_capacity<T>(
    buf: Option<&[T]>,
    attribute: Attribute,
    required: usize,
) -> Result<(), ImportError> {
    match buf {
        Some(buf) if buf.len() < required => Err(ImportError::Capacity {
            attribute,
            required,
            available: buf.len(),
        }),
        _ => Ok(()),
    }
}

/// Shrink a buffer slot to its first `len` elements.
fn take_prefix<'a, T>(slot: &mut Option<&'a mut [T]>, len: usize) -> Option<&'a mut [T]> {
    match slot.take() {
        Some(buf) => Some(buf.split_at_mut(len).0),
        None => None,
    }
}

/// Import OBJ text into the model's pre-sized buffers.
///
/// The vertex buffer is required; UV and index buffers are optional and the
/// corresponding lines are skipped when absent. Every present buffer must
/// hold at least what [`measure_obj`] reports and is shrunk to exactly that
/// length. Bounds and normalization state are recomputed from scratch.
pub fn import_obj<'a>(model: &mut MeshModel<'a>, source: &[u8]) -> Result<ObjStats, ImportError> {
    if source.is_empty() {
        return Err(ImportError::EmptyInput);
    }
    let stats = measure_obj(source)?;

    match model.vertices.as_deref() {
        None => return Err(ImportError::MissingVertexBuffer),
        vertices => check_capacity(vertices, Attribute::Vertices, stats.vertices_len())?,
    }
    check_capacity(model.uvs.as_deref(), Attribute::Uvs, stats.uvs_len())?;
    check_capacity(
        model.indices.as_deref(),
        Attribute::Indices,
        stats.indices_len(),
    )?;

    let Some(vertices) = take_prefix(&mut model.vertices, stats.vertices_len()) else {
        return Err(ImportError::MissingVertexBuffer);
    };
    let mut uvs = take_prefix(&mut model.uvs, stats.uvs_len());
    let mut indices = take_prefix(&mut model.indices, stats.indices_len());

    let mut bounds = Aabb::SEED;
    let mut vertex_count = 0;
    let mut uv_count = 0;
    let mut index_count = 0;

    for (line_no, line) in lines(source) {
        let (kind, mut cursor) = directive(line);
        match kind {
            Directive::Vertex => {
                let (position, complete) = scan_position(&mut cursor);
                if !complete {
                    tracing::warn!(line = line_no, "vertex has missing coordinates, using 0");
                }
                vertices[vertex_count * 3..vertex_count * 3 + 3].copy_from_slice(&position);
                bounds.include(position);
                vertex_count += 1;
            }
            Directive::TexCoord => {
                if let Some(uvs) = uvs.as_deref_mut() {
                    for component in &mut uvs[uv_count * 2..uv_count * 2 + 2] {
                        cursor.skip_whitespace();
                        *component = cursor.scan_float().value;
                    }
                }
                uv_count += 1;
            }
            Directive::Face => {
                let Some(indices) = indices.as_deref_mut() else {
                    continue;
                };
                let face = FaceRefs::scan(&mut cursor);
                let refs = face.as_slice();
                if refs.len() < 3 {
                    continue;
                }
                // Validated by measure_obj: 0 <= index < vertex total <= i32::MAX
                let index = |i: usize| resolve(refs[i], vertex_count) as i32;
                for k in 1..refs.len() - 1 {
                    indices[index_count..index_count + 3]
                        .copy_from_slice(&[index(0), index(k), index(k + 1)]);
                    index_count += 3;
                }
            }
            Directive::Other => {}
        }
    }

    bounds.finish();
    model.bounds = bounds;
    model.normalization = Normalization::from_bounds(&bounds);
    model.vertices = Some(vertices);
    model.uvs = uvs;
    model.indices = indices;

    Ok(stats)
}
