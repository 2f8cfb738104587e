//! OBJ -> RGF conversion pipeline

use anyhow::{Context, Result};
use std::path::Path;

use rgf_core::{ObjStats, codec, derive, obj};

use crate::storage::{MeshStorage, RecordBuffer};

/// Per-mesh conversion settings.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConvertOptions {
    /// Move the bounding-box center here after scaling
    pub center: Option<[f32; 3]>,
    /// Target for the largest bounding-box extent
    pub scale: Option<f32>,
    /// Derive smooth per-vertex normals
    pub normals: bool,
    /// Derive tangents and bitangents (needs one UV per vertex)
    pub tangents: bool,
}

/// Result of in-memory conversion
#[derive(Debug, Clone)]
pub struct ConvertedMesh {
    /// Counts reported by the importer
    pub stats: ObjStats,
    /// Encoded record, aligned for zero-copy decode
    pub record: RecordBuffer,
}

/// Convert OBJ text to an encoded RGF record.
pub fn convert_obj_to_memory(source: &[u8], options: &ConvertOptions) -> Result<ConvertedMesh> {
    let stats = obj::measure_obj(source).context("Failed to read OBJ")?;
    let mut storage = MeshStorage::for_obj(&stats, options.normals, options.tangents);
    let mut model = storage.model();
    obj::import_obj(&mut model, source).context("Failed to import OBJ")?;

    if options.normals {
        derive::compute_normals(&mut model).context("Failed to compute normals")?;
    }
    if options.tangents {
        derive::compute_tangents(&mut model)
            .context("Failed to compute tangents (one UV per vertex is required)")?;
    }

    if let Some(target) = options.scale {
        model
            .scale(target)
            .with_context(|| format!("Failed to scale mesh to {target}"))?;
    }
    if let Some(center) = options.center {
        model
            .recenter(center)
            .with_context(|| format!("Failed to recenter mesh at {center:?}"))?;
    }

    let view = model.as_view();
    let mut record = RecordBuffer::zeroed(codec::encoded_len(&view)?);
    codec::encode(&view, record.as_bytes_mut())?;

    Ok(ConvertedMesh { stats, record })
}

/// Convert an OBJ file to an RGF file
pub fn convert_obj(input: &Path, output: &Path, options: &ConvertOptions) -> Result<ConvertedMesh> {
    let source =
        std::fs::read(input).with_context(|| format!("Failed to read OBJ: {:?}", input))?;
    let converted = convert_obj_to_memory(&source, options)
        .with_context(|| format!("Failed to convert OBJ: {}", input.display()))?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
    }
    std::fs::write(output, converted.record.as_bytes())
        .with_context(|| format!("Failed to write RGF: {:?}", output))?;

    tracing::info!(
        "Converted mesh: {} vertices, {} triangles, {} bytes",
        converted.stats.vertex_count,
        converted.stats.triangle_count,
        converted.record.len()
    );

    Ok(converted)
}

/// Read an RGF file into aligned storage ready for [`codec::decode`].
pub fn read_record(path: &Path) -> Result<RecordBuffer> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read RGF: {:?}", path))?;
    Ok(RecordBuffer::from_bytes(&bytes))
}
