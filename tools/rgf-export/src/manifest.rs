//! rgf.toml manifest parsing and batch builds
//!
//! ```toml
//! [output]
//! dir = "build"
//! normals = true
//!
//! [[meshes]]
//! id = "ship"
//! path = "models/ship.obj"
//! scale = 2.0
//! center = [0.0, 0.0, 0.0]
//! header = true
//! ```

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rgf_core::codec;
use rgf_shared::RGF_FORMAT;

use crate::codegen::{emit_c_header, sanitize_identifier};
use crate::convert::{ConvertOptions, convert_obj};

/// rgf.toml manifest structure
#[derive(Debug, Default, Deserialize)]
pub struct RgfManifest {
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub meshes: Vec<MeshEntry>,
}

/// Output location and defaults applied to every mesh
#[derive(Debug, Deserialize)]
pub struct OutputSection {
    /// Output directory, relative to the manifest.
    /// Default: "build"
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default)]
    pub normals: bool,
    #[serde(default)]
    pub tangents: bool,
    #[serde(default)]
    pub center: Option<[f32; 3]>,
    #[serde(default)]
    pub scale: Option<f32>,
    /// Also emit a C header next to each record.
    #[serde(default)]
    pub header: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("build")
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            normals: false,
            tangents: false,
            center: None,
            scale: None,
            header: false,
        }
    }
}

/// Single mesh entry. Unset fields fall back to `[output]`.
#[derive(Debug, Deserialize)]
pub struct MeshEntry {
    pub id: String,
    pub path: PathBuf,
    #[serde(default)]
    pub center: Option<[f32; 3]>,
    #[serde(default)]
    pub scale: Option<f32>,
    #[serde(default)]
    pub normals: Option<bool>,
    #[serde(default)]
    pub tangents: Option<bool>,
    #[serde(default)]
    pub header: Option<bool>,
}

impl MeshEntry {
    /// Conversion options with `[output]` defaults applied.
    pub fn options(&self, defaults: &OutputSection) -> ConvertOptions {
        ConvertOptions {
            center: self.center.or(defaults.center),
            scale: self.scale.or(defaults.scale),
            normals: self.normals.unwrap_or(defaults.normals),
            tangents: self.tangents.unwrap_or(defaults.tangents),
        }
    }

    pub fn wants_header(&self, defaults: &OutputSection) -> bool {
        self.header.unwrap_or(defaults.header)
    }
}

/// Files written for one mesh
#[derive(Debug, Clone)]
pub struct BuiltMesh {
    pub id: String,
    pub record: PathBuf,
    pub header: Option<PathBuf>,
}

/// Parse manifest text
pub fn parse_manifest(content: &str) -> Result<RgfManifest> {
    toml::from_str(content).context("Failed to parse manifest")
}

/// Load and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<RgfManifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
    parse_manifest(&content).with_context(|| format!("Invalid manifest: {}", path.display()))
}

/// Directory that relative manifest paths resolve against
pub fn manifest_dir(path: &Path) -> &Path {
    path.parent().unwrap_or(Path::new("."))
}

/// Check ids and option values, and that every source exists.
pub fn validate(manifest: &RgfManifest, base_dir: &Path) -> Result<()> {
    let mut seen = HashSet::new();

    for mesh in &manifest.meshes {
        if mesh.id.is_empty() {
            bail!("Mesh with path {:?} has an empty id", mesh.path);
        }
        if !seen.insert(sanitize_identifier(&mesh.id)) {
            bail!("Duplicate mesh id: {}", mesh.id);
        }

        let options = mesh.options(&manifest.output);
        if let Some(scale) = options.scale
            && !(scale.is_finite() && scale > 0.0)
        {
            bail!("Mesh '{}': scale must be positive, got {}", mesh.id, scale);
        }
        if let Some(center) = options.center
            && !center.iter().all(|c| c.is_finite())
        {
            bail!("Mesh '{}': center must be finite", mesh.id);
        }

        let ext = mesh
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();
        if ext != RGF_FORMAT.source_ext {
            bail!(
                "Mesh '{}': unsupported source format {:?} (use .{})",
                mesh.id,
                mesh.path,
                RGF_FORMAT.source_ext
            );
        }

        let source = base_dir.join(&mesh.path);
        if !source.is_file() {
            bail!("Mesh '{}': source not found: {}", mesh.id, source.display());
        }
    }

    Ok(())
}

/// Convert every mesh in the manifest.
///
/// `output_override` replaces `[output].dir`.
pub fn build_all(
    manifest: &RgfManifest,
    base_dir: &Path,
    output_override: Option<&Path>,
) -> Result<Vec<BuiltMesh>> {
    validate(manifest, base_dir)?;

    let out_dir = match output_override {
        Some(dir) => dir.to_path_buf(),
        None => base_dir.join(&manifest.output.dir),
    };
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    let mut built = Vec::with_capacity(manifest.meshes.len());
    for mesh in &manifest.meshes {
        let input = base_dir.join(&mesh.path);
        let stem = sanitize_identifier(&mesh.id);
        let record = out_dir.join(format!("{stem}.{}", RGF_FORMAT.extension));

        tracing::info!("Building mesh '{}' from {}", mesh.id, input.display());
        let converted = convert_obj(&input, &record, &mesh.options(&manifest.output))
            .with_context(|| format!("Failed to build mesh '{}'", mesh.id))?;

        let header = if mesh.wants_header(&manifest.output) {
            let view = codec::decode(converted.record.as_bytes())?;
            let path = out_dir.join(format!("{stem}.{}", RGF_FORMAT.header_ext));
            std::fs::write(&path, emit_c_header(&mesh.id, &view)?)
                .with_context(|| format!("Failed to write header: {}", path.display()))?;
            Some(path)
        } else {
            None
        };

        built.push(BuiltMesh {
            id: mesh.id.clone(),
            record,
            header,
        });
    }

    Ok(built)
}
