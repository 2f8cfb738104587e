//! Per-vertex normal and tangent-space derivation
//!
//! Both passes zero their outputs, accumulate unnormalized per-triangle
//! vectors into each corner vertex (so larger faces weigh more), then
//! normalize. Inputs are validated up front; on error no output is written.

use glam::Vec3;

use crate::error::GeometryError;
use crate::math::{accumulate3, load2, load3, normalize, store3};
use crate::model::{Applied, Attribute, MeshModel};

/// A present, non-empty input buffer.
fn require<'b, T>(buf: Option<&'b [T]>, attribute: Attribute) -> Result<&'b [T], GeometryError> {
    match buf {
        Some(buf) if !buf.is_empty() => Ok(buf),
        _ => Err(GeometryError::MissingBuffer(attribute)),
    }
}

/// A present output buffer of exactly `expected` elements.
fn require_output<'b>(
    buf: Option<&'b mut [f32]>,
    attribute: Attribute,
    expected: usize,
) -> Result<&'b mut [f32], GeometryError> {
    let buf = buf.ok_or(GeometryError::MissingBuffer(attribute))?;
    if buf.len() != expected {
        return Err(GeometryError::LengthMismatch {
            attribute,
            expected,
            actual: buf.len(),
        });
    }
    Ok(buf)
}

/// Check the index buffer holds whole triangles referencing existing vertices.
fn validate_triangles(indices: &[i32], vertex_count: usize) -> Result<(), GeometryError> {
    if indices.len() % 3 != 0 {
        return Err(GeometryError::PartialTriangle(indices.len()));
    }
    match indices
        .iter()
        .find(|&&index| index < 0 || index as usize >= vertex_count)
    {
        Some(&index) => Err(GeometryError::IndexOutOfRange {
            index,
            vertex_count,
        }),
        None => Ok(()),
    }
}

/// Triangle corners as vertex indices. Only valid after [`validate_triangles`].
fn triangles(indices: &[i32]) -> impl Iterator<Item = [usize; 3]> + '_ {
    indices
        .chunks_exact(3)
        .map(|tri| [tri[0] as usize, tri[1] as usize, tri[2] as usize])
}

fn normalize_all(buf: &mut [f32]) {
    for i in 0..buf.len() / 3 {
        let v = normalize(load3(buf, i));
        store3(buf, i, v);
    }
}

/// Compute smooth per-vertex normals from positions and triangles.
///
/// Requires vertices, indices and a normals buffer the same length as the
/// vertices.
pub fn compute_normals(model: &mut MeshModel<'_>) -> Result<Applied, GeometryError> {
    let MeshModel {
        vertices,
        normals,
        indices,
        ..
    } = model;

    let vertices = require(vertices.as_deref(), Attribute::Vertices)?;
    let indices = require(indices.as_deref(), Attribute::Indices)?;
    let normals = require_output(normals.as_deref_mut(), Attribute::Normals, vertices.len())?;
    validate_triangles(indices, vertices.len() / 3)?;

    normals.fill(0.0);
    for [i0, i1, i2] in triangles(indices) {
        let p0 = load3(vertices, i0);
        let face = (load3(vertices, i1) - p0).cross(load3(vertices, i2) - p0);

        accumulate3(normals, i0, face);
        accumulate3(normals, i1, face);
        accumulate3(normals, i2, face);
    }
    normalize_all(normals);

    tracing::debug!(
        vertices = vertices.len() / 3,
        triangles = indices.len() / 3,
        "computed normals"
    );
    Ok(Applied::Changed)
}

/// Compute per-vertex tangents and bitangents aligned to the UV layout.
///
/// UVs are addressed by vertex index, so the UV buffer must hold at least
/// one pair per vertex. Triangles with degenerate UVs contribute nothing.
pub fn compute_tangents(model: &mut MeshModel<'_>) -> Result<Applied, GeometryError> {
    let MeshModel {
        vertices,
        tangents,
        bitangents,
        uvs,
        indices,
        ..
    } = model;

    let vertices = require(vertices.as_deref(), Attribute::Vertices)?;
    let indices = require(indices.as_deref(), Attribute::Indices)?;
    let uvs = require(uvs.as_deref(), Attribute::Uvs)?;
    let vertex_count = vertices.len() / 3;
    if uvs.len() < vertex_count * 2 {
        return Err(GeometryError::LengthMismatch {
            attribute: Attribute::Uvs,
            expected: vertex_count * 2,
            actual: uvs.len(),
        });
    }
    let tangents = require_output(tangents.as_deref_mut(), Attribute::Tangents, vertices.len())?;
    let bitangents = require_output(
        bitangents.as_deref_mut(),
        Attribute::Bitangents,
        vertices.len(),
    )?;
    validate_triangles(indices, vertex_count)?;

    tangents.fill(0.0);
    bitangents.fill(0.0);
    for [i0, i1, i2] in triangles(indices) {
        let p0 = load3(vertices, i0);
        let e1 = load3(vertices, i1) - p0;
        let e2 = load3(vertices, i2) - p0;

        let uv0 = load2(uvs, i0);
        let d1 = load2(uvs, i1) - uv0;
        let d2 = load2(uvs, i2) - uv0;

        let det = d1.x * d2.y - d2.x * d1.y;
        let r = if det == 0.0 { 0.0 } else { 1.0 / det };

        let tangent: Vec3 = (e1 * d2.y - e2 * d1.y) * r;
        let bitangent: Vec3 = (e2 * d1.x - e1 * d2.x) * r;

        for i in [i0, i1, i2] {
            accumulate3(tangents, i, tangent);
            accumulate3(bitangents, i, bitangent);
        }
    }
    normalize_all(tangents);
    normalize_all(bitangents);

    tracing::debug!(
        vertices = vertex_count,
        triangles = indices.len() / 3,
        "computed tangents"
    );
    Ok(Applied::Changed)
}
