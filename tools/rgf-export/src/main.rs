//! rgf-export - RGF export tool
//!
//! Converts Wavefront OBJ meshes to Raw Geometry Format records (.rgf) and
//! emits C headers for embedding them in source code.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};

use rgf_core::{Aabb, Attribute, MeshView, Normalization, RgfHeader, codec};
use rgf_export::{ConvertOptions, RGF_FORMAT, codegen, convert, manifest};

#[derive(Parser)]
#[command(name = "rgf-export")]
#[command(about = "RGF export tool")]
#[command(version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a single OBJ file
    Convert {
        /// Input .obj file
        input: PathBuf,

        /// Output .rgf file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Move the bounding-box center here (x,y,z)
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        center: Option<Vec<f32>>,

        /// Scale so the largest extent equals this value
        #[arg(long)]
        scale: Option<f32>,

        /// Derive per-vertex normals
        #[arg(long)]
        normals: bool,

        /// Derive tangents and bitangents (requires one UV per vertex)
        #[arg(long)]
        tangents: bool,

        /// Also write a C header next to the output
        #[arg(long)]
        header: bool,
    },

    /// Print a record's header and section counts
    Info {
        /// Input .rgf file
        input: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Emit a C header from an .rgf file
    Header {
        /// Input .rgf file
        input: PathBuf,

        /// Output .h file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Identifier prefix (default: input file stem)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Build meshes from a manifest file
    Build {
        /// Path to rgf.toml manifest
        #[arg(default_value = "rgf.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate manifest without building
    Check {
        /// Path to rgf.toml manifest
        #[arg(default_value = "rgf.toml")]
        manifest: PathBuf,
    },
}

/// Summary printed by `info`
#[derive(Serialize)]
struct RecordInfo {
    version: u8,
    bytes: usize,
    vertices: usize,
    normals: usize,
    tangents: usize,
    bitangents: usize,
    uvs: usize,
    indices: usize,
    bounds: Aabb,
    normalization: Normalization,
}

impl RecordInfo {
    fn new(header: &RgfHeader, bytes: usize, view: &MeshView<'_>) -> Self {
        Self {
            version: header.version.into(),
            bytes,
            vertices: view.len_of(Attribute::Vertices),
            normals: view.len_of(Attribute::Normals),
            tangents: view.len_of(Attribute::Tangents),
            bitangents: view.len_of(Attribute::Bitangents),
            uvs: view.len_of(Attribute::Uvs),
            indices: view.len_of(Attribute::Indices),
            bounds: view.bounds,
            normalization: view.normalization,
        }
    }
}

fn parse_center(values: Option<Vec<f32>>) -> Result<Option<[f32; 3]>> {
    match values {
        None => Ok(None),
        Some(values) => match <[f32; 3]>::try_from(values.as_slice()) {
            Ok(center) => Ok(Some(center)),
            Err(_) => bail!("--center takes three values (x,y,z), got {}", values.len()),
        },
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("mesh")
        .to_string()
}

fn write_header(id: &str, view: &MeshView<'_>, output: &Path) -> Result<()> {
    let header = codegen::emit_c_header(id, view)?;
    std::fs::write(output, header)
        .with_context(|| format!("Failed to write header: {:?}", output))?;
    tracing::info!("Wrote header {:?}", output);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    match cli.command {
        Commands::Convert {
            input,
            output,
            center,
            scale,
            normals,
            tangents,
            header,
        } => {
            let ext = input
                .extension()
                .and_then(|e| e.to_str())
                .map(|s| s.to_lowercase())
                .unwrap_or_default();
            if ext != RGF_FORMAT.source_ext {
                bail!("Unsupported mesh format: {:?} (use .obj)", input);
            }

            let output = output.unwrap_or_else(|| input.with_extension(RGF_FORMAT.extension));
            let options = ConvertOptions {
                center: parse_center(center)?,
                scale,
                normals,
                tangents,
            };
            tracing::info!("Converting {:?} -> {:?}", input, output);
            let converted = convert::convert_obj(&input, &output, &options)?;

            if header {
                let view = codec::decode(converted.record.as_bytes())?;
                write_header(
                    &file_stem(&input),
                    &view,
                    &output.with_extension(RGF_FORMAT.header_ext),
                )?;
            }
            tracing::info!("Done!");
        }

        Commands::Info { input, json } => {
            let record = convert::read_record(&input)?;
            let view = codec::decode(record.as_bytes())
                .with_context(|| format!("Invalid RGF record: {:?}", input))?;
            let header = RgfHeader::from_bytes(record.as_bytes())?;
            let info = RecordInfo::new(&header, record.len(), &view);

            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("{}: RGF v{}, {} bytes", input.display(), info.version, info.bytes);
                for attribute in Attribute::ALL {
                    println!("  {:<10} {}", attribute.name(), view.len_of(attribute));
                }
                println!("  min        {:?}", info.bounds.min);
                println!("  max        {:?}", info.bounds.max);
                println!("  center     {:?}", info.bounds.center);
                println!("  scale      {}", info.normalization.current_scale);
            }
        }

        Commands::Header {
            input,
            output,
            name,
        } => {
            let record = convert::read_record(&input)?;
            let view = codec::decode(record.as_bytes())
                .with_context(|| format!("Invalid RGF record: {:?}", input))?;
            let output = output.unwrap_or_else(|| input.with_extension(RGF_FORMAT.header_ext));
            let name = name.unwrap_or_else(|| file_stem(&input));
            write_header(&name, &view, &output)?;
        }

        Commands::Build { manifest, output } => {
            tracing::info!("Building meshes from {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            let built = manifest::build_all(
                &config,
                manifest::manifest_dir(&manifest),
                output.as_deref(),
            )?;
            tracing::info!("Build complete! {} mesh(es)", built.len());
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config, manifest::manifest_dir(&manifest))?;
            tracing::info!("Manifest is valid!");
        }
    }

    Ok(())
}
