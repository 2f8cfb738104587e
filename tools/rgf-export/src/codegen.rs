//! C header emission for embedding decoded meshes in source code

use anyhow::Result;
use std::fmt::Write as FmtWrite;

use rgf_core::{Attribute, MeshView};

/// Values per emitted line inside array initializers
const VALUES_PER_LINE: usize = 6;

/// Turn a mesh id into a C identifier: ASCII alphanumerics kept, everything
/// else becomes `_`, and a leading digit is prefixed with `_`.
pub fn sanitize_identifier(id: &str) -> String {
    let mut ident: String = id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

fn c_float(value: f32) -> String {
    if value.is_nan() {
        "NAN".to_string()
    } else if value.is_infinite() {
        let sign = if value < 0.0 { "-" } else { "" };
        format!("{sign}INFINITY")
    } else {
        // Debug keeps a decimal point or exponent and round-trips exactly
        format!("{value:?}f")
    }
}

fn write_array(out: &mut String, c_type: &str, name: &str, values: &[String]) -> Result<()> {
    writeln!(out, "static const {c_type} {name}[{}] = {{", values.len())?;
    for line in values.chunks(VALUES_PER_LINE) {
        writeln!(out, "    {},", line.join(", "))?;
    }
    writeln!(out, "}};")?;
    writeln!(out)?;
    Ok(())
}

/// Generate a self-contained C header holding the mesh data.
///
/// Counts and bounds become `#define`s; each present section becomes a
/// `static const` array. Absent sections are omitted.
pub fn emit_c_header(id: &str, view: &MeshView<'_>) -> Result<String> {
    let ident = sanitize_identifier(id);
    let upper = ident.to_uppercase();
    let lower = ident.to_lowercase();
    let mut output = String::new();

    writeln!(output, "// GENERATED FILE - DO NOT EDIT")?;
    writeln!(output, "// Mesh: {id}")?;
    writeln!(output, "// Generator: rgf-export")?;
    writeln!(output)?;

    writeln!(output, "#ifndef RGF_MESH_{upper}_H")?;
    writeln!(output, "#define RGF_MESH_{upper}_H")?;
    writeln!(output)?;
    writeln!(output, "#include <math.h>")?;
    writeln!(output, "#include <stdint.h>")?;
    writeln!(output)?;

    for attribute in Attribute::ALL {
        writeln!(
            output,
            "#define {upper}_{}_COUNT {}",
            attribute.name().to_uppercase(),
            view.len_of(attribute)
        )?;
    }
    writeln!(output)?;

    let vectors = [
        ("MIN", view.bounds.min),
        ("MAX", view.bounds.max),
        ("CENTER", view.bounds.center),
        ("ORIGINAL_CENTER", view.normalization.original_center),
    ];
    for (label, [x, y, z]) in vectors {
        for (axis, value) in [("X", x), ("Y", y), ("Z", z)] {
            writeln!(output, "#define {upper}_{label}_{axis} {}", c_float(value))?;
        }
    }
    writeln!(
        output,
        "#define {upper}_ORIGINAL_MAX_DIM {}",
        c_float(view.normalization.original_max_dim)
    )?;
    writeln!(
        output,
        "#define {upper}_CURRENT_SCALE {}",
        c_float(view.normalization.current_scale)
    )?;
    writeln!(output)?;

    for attribute in Attribute::ALL {
        let name = format!("{lower}_{}", attribute.name());
        match attribute {
            Attribute::Indices => {
                if let Some(indices) = view.indices.filter(|i| !i.is_empty()) {
                    let values: Vec<String> = indices.iter().map(i32::to_string).collect();
                    write_array(&mut output, "int32_t", &name, &values)?;
                }
            }
            floats => {
                if let Some(data) = view.floats(floats).filter(|f| !f.is_empty()) {
                    let values: Vec<String> = data.iter().copied().map(c_float).collect();
                    write_array(&mut output, "float", &name, &values)?;
                }
            }
        }
    }

    writeln!(output, "#endif /* RGF_MESH_{upper}_H */")?;

    Ok(output)
}
