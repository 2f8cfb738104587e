//! RGF binary encode and zero-copy decode
//!
//! Encoding writes little-endian bytes on any host. Decoding hands out
//! slices that alias the input buffer, which requires a little-endian host
//! and 4-byte aligned sections; both are reported as errors rather than
//! silently copying.

use bytemuck::Pod;
use rgf_shared::formats::{ELEMENT_SIZE, SECTION_COUNT};
use rgf_shared::{RgfHeader, SectionCounts};

use crate::error::CodecError;
use crate::model::{Attribute, MeshModel, MeshView};

/// Section counts for a view, in file order.
pub fn section_counts(view: &MeshView<'_>) -> Result<SectionCounts, CodecError> {
    let mut counts = [0u32; SECTION_COUNT];
    for (count, attribute) in counts.iter_mut().zip(Attribute::ALL) {
        let len = view.len_of(attribute);
        *count = u32::try_from(len).map_err(|_| CodecError::CountOverflow { attribute, len })?;
    }
    Ok(SectionCounts::from_array(counts))
}

fn record_len(counts: &SectionCounts) -> Result<usize, CodecError> {
    let len = counts.record_len();
    usize::try_from(len).map_err(|_| CodecError::RecordTooLarge(len))
}

/// Bytes needed to encode `view`: header plus every present section.
pub fn encoded_len(view: &MeshView<'_>) -> Result<usize, CodecError> {
    record_len(&section_counts(view)?)
}

fn write_section<T: Copy>(out: &mut [u8], values: &[T], to_le: fn(T) -> [u8; 4]) -> usize {
    for (chunk, &value) in out.chunks_exact_mut(ELEMENT_SIZE).zip(values) {
        chunk.copy_from_slice(&to_le(value));
    }
    values.len() * ELEMENT_SIZE
}

/// Encode `view` into the front of `out`, returning the bytes written.
///
/// Capacity is checked first; on error `out` is not modified.
pub fn encode(view: &MeshView<'_>, out: &mut [u8]) -> Result<usize, CodecError> {
    let counts = section_counts(view)?;
    let required = record_len(&counts)?;
    if out.len() < required {
        return Err(CodecError::BufferTooSmall {
            required,
            available: out.len(),
        });
    }

    let header = RgfHeader::new(counts, view.bounds, view.normalization);
    out[..RgfHeader::SIZE].copy_from_slice(&header.to_bytes());

    let mut offset = RgfHeader::SIZE;
    for attribute in Attribute::ALL {
        let section = &mut out[offset..required];
        offset += match attribute {
            Attribute::Indices => {
                write_section(section, view.indices.unwrap_or_default(), i32::to_le_bytes)
            }
            floats => write_section(
                section,
                view.floats(floats).unwrap_or_default(),
                f32::to_le_bytes,
            ),
        };
    }

    tracing::debug!(bytes = required, "encoded RGF record");
    Ok(required)
}

/// Validate host, header and total length.
fn read_header(bytes: &[u8]) -> Result<RgfHeader, CodecError> {
    if cfg!(target_endian = "big") {
        return Err(CodecError::UnsupportedHost);
    }
    let header = RgfHeader::from_bytes(bytes)?;
    let required = header.counts.record_len();
    if (bytes.len() as u64) < required {
        return Err(CodecError::Truncated {
            required,
            available: bytes.len(),
        });
    }
    tracing::debug!(bytes = required, "decoding RGF record");
    Ok(header)
}

/// Byte length of each section. Only called once the buffer is known to hold them.
fn section_bytes(counts: &SectionCounts) -> [usize; SECTION_COUNT] {
    counts.to_array().map(|count| count as usize * ELEMENT_SIZE)
}

fn cast<T: Pod>(section: &[u8], attribute: Attribute) -> Result<Option<&[T]>, CodecError> {
    if section.is_empty() {
        return Ok(None);
    }
    bytemuck::try_cast_slice(section)
        .map(Some)
        .map_err(|_| CodecError::Misaligned(attribute))
}

fn cast_mut<T: Pod>(
    section: &mut [u8],
    attribute: Attribute,
) -> Result<Option<&mut [T]>, CodecError> {
    if section.is_empty() {
        return Ok(None);
    }
    bytemuck::try_cast_slice_mut(section)
        .map(Some)
        .map_err(|_| CodecError::Misaligned(attribute))
}

/// Decode a record into a read-only view aliasing `bytes`.
///
/// Zero-count sections are `None`. Trailing bytes past the record are
/// ignored.
pub fn decode(bytes: &[u8]) -> Result<MeshView<'_>, CodecError> {
    let header = read_header(bytes)?;

    let mut rest = &bytes[RgfHeader::SIZE..];
    let [vertices, normals, tangents, bitangents, uvs, indices] =
        section_bytes(&header.counts).map(|len| {
            let (section, tail) = rest.split_at(len);
            rest = tail;
            section
        });

    Ok(MeshView {
        bounds: header.bounds,
        normalization: header.normalization,
        vertices: cast(vertices, Attribute::Vertices)?,
        normals: cast(normals, Attribute::Normals)?,
        tangents: cast(tangents, Attribute::Tangents)?,
        bitangents: cast(bitangents, Attribute::Bitangents)?,
        uvs: cast(uvs, Attribute::Uvs)?,
        indices: cast(indices, Attribute::Indices)?,
    })
}

/// Decode a record into a transformable model aliasing `bytes`.
///
/// Transforms and derivations write straight into the sections of `bytes`.
/// The header bytes are not updated; re-encode to persist new bounds.
pub fn decode_mut(bytes: &mut [u8]) -> Result<MeshModel<'_>, CodecError> {
    let header = read_header(bytes)?;

    let mut rest = &mut bytes[RgfHeader::SIZE..];
    let [vertices, normals, tangents, bitangents, uvs, indices] =
        section_bytes(&header.counts).map(|len| {
            let (section, tail) = std::mem::take(&mut rest).split_at_mut(len);
            rest = tail;
            section
        });

    Ok(MeshModel {
        bounds: header.bounds,
        normalization: header.normalization,
        vertices: cast_mut(vertices, Attribute::Vertices)?,
        normals: cast_mut(normals, Attribute::Normals)?,
        tangents: cast_mut(tangents, Attribute::Tangents)?,
        bitangents: cast_mut(bitangents, Attribute::Bitangents)?,
        uvs: cast_mut(uvs, Attribute::Uvs)?,
        indices: cast_mut(indices, Attribute::Indices)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rgf_shared::{Aabb, HeaderError, Normalization};

    /// Zeroed, 4-byte aligned byte storage.
    fn aligned(len: usize) -> Vec<u32> {
        vec![0u32; len.div_ceil(4)]
    }

    fn bytes_of(words: &mut [u32], len: usize) -> &mut [u8] {
        &mut bytemuck::cast_slice_mut::<u32, u8>(words)[..len]
    }

    #[test]
    fn test_two_section_record() {
        let vertices = [1.0f32, 0.0];
        let indices = [0i32, 1];
        let view = MeshView {
            vertices: Some(&vertices),
            indices: Some(&indices),
            ..MeshView::default()
        };

        let len = encoded_len(&view).unwrap();
        assert_eq!(len, RgfHeader::SIZE + 16);

        let mut words = aligned(len);
        let out = bytes_of(&mut words, len);
        assert_eq!(encode(&view, out), Ok(len));
        assert_eq!(&out[..4], b"RGF\0");
        assert_eq!(out[4], 1);

        let decoded = decode(out).unwrap();
        assert_eq!(decoded.vertices, Some(&vertices[..]));
        assert_eq!(decoded.indices, Some(&indices[..]));
        for attribute in [
            Attribute::Normals,
            Attribute::Tangents,
            Attribute::Bitangents,
            Attribute::Uvs,
        ] {
            assert_eq!(decoded.len_of(attribute), 0);
            assert!(decoded.floats(attribute).is_none());
        }
    }

    #[test]
    fn test_round_trip_is_bit_identical() {
        let vertices = [0.1f32, -0.0, 3.5, f32::MIN_POSITIVE, 1e30, -7.25];
        let normals = [0.0f32, 0.0, 1.0, 0.0, 1.0, 0.0];
        let tangents = [1.0f32, 0.0, 0.0, 1.0, 0.0, 0.0];
        let bitangents = [0.0f32, 1.0, 0.0, 0.0, 0.0, -1.0];
        let uvs = [0.25f32, 0.75, 1.0, 0.0];
        let indices = [0i32, 1, 1];
        let view = MeshView {
            bounds: Aabb {
                min: [-1.0, -2.0, -3.0],
                max: [1.0, 2.0, 3.0],
                center: [0.0; 3],
            },
            normalization: Normalization {
                original_center: [0.5, 0.5, 0.5],
                original_max_dim: 6.0,
                current_scale: 0.25,
            },
            vertices: Some(&vertices),
            normals: Some(&normals),
            tangents: Some(&tangents),
            bitangents: Some(&bitangents),
            uvs: Some(&uvs),
            indices: Some(&indices),
        };

        let len = encoded_len(&view).unwrap();
        let mut words = aligned(len);
        let out = bytes_of(&mut words, len);
        encode(&view, out).unwrap();
        let decoded = decode(out).unwrap();

        assert_eq!(decoded.bounds, view.bounds);
        assert_eq!(decoded.normalization, view.normalization);
        for attribute in Attribute::ALL {
            assert_eq!(decoded.len_of(attribute), view.len_of(attribute));
            if let (Some(a), Some(b)) = (decoded.floats(attribute), view.floats(attribute)) {
                let a: Vec<u32> = a.iter().map(|f| f.to_bits()).collect();
                let b: Vec<u32> = b.iter().map(|f| f.to_bits()).collect();
                assert_eq!(a, b, "{attribute}");
            }
        }
        assert_eq!(decoded.indices, view.indices);
    }

    #[test]
    fn test_capacity_guard() {
        let vertices = [1.0f32, 2.0, 3.0];
        let view = MeshView {
            vertices: Some(&vertices),
            ..MeshView::default()
        };
        let len = encoded_len(&view).unwrap();

        let mut short = vec![0u8; len - 1];
        assert_eq!(
            encode(&view, &mut short),
            Err(CodecError::BufferTooSmall {
                required: len,
                available: len - 1
            })
        );
        assert!(short.iter().all(|&b| b == 0));

        let mut exact = vec![0u8; len];
        assert_eq!(encode(&view, &mut exact), Ok(len));
    }

    #[test]
    fn test_empty_sections_are_not_encoded() {
        let vertices = [1.0f32, 2.0, 3.0];
        let normals: [f32; 0] = [];
        let view = MeshView {
            vertices: Some(&vertices),
            normals: Some(&normals),
            ..MeshView::default()
        };
        assert_eq!(section_counts(&view).unwrap().normals, 0);
        assert_eq!(encoded_len(&view), Ok(RgfHeader::SIZE + 12));
    }

    #[test]
    fn test_empty_model_is_header_only() {
        let view = MeshView::default();
        let mut words = aligned(RgfHeader::SIZE);
        let out = bytes_of(&mut words, RgfHeader::SIZE);
        assert_eq!(encode(&view, out), Ok(RgfHeader::SIZE));

        let decoded = decode(out).unwrap();
        assert!(Attribute::ALL.iter().all(|&a| !decoded.is_present(a)));
        assert_eq!(decoded.normalization.current_scale, 1.0);
    }

    #[test]
    fn test_corrupt_preamble_is_rejected() {
        let vertices = [1.0f32, 2.0, 3.0];
        let view = MeshView {
            vertices: Some(&vertices),
            ..MeshView::default()
        };
        let len = encoded_len(&view).unwrap();
        let mut words = aligned(len);
        let out = bytes_of(&mut words, len);
        encode(&view, out).unwrap();

        for i in 0..8 {
            let mut corrupt = out.to_vec();
            corrupt[i] ^= 0xFF;
            let mut words = aligned(len);
            let buf = bytes_of(&mut words, len);
            buf.copy_from_slice(&corrupt);
            assert!(
                matches!(decode(buf), Err(CodecError::Header(_))),
                "byte {i}"
            );
        }
    }

    #[test]
    fn test_specific_header_errors() {
        let mut words = aligned(RgfHeader::SIZE);
        let buf = bytes_of(&mut words, RgfHeader::SIZE);
        encode(&MeshView::default(), buf).unwrap();

        buf[4] = 2;
        assert_eq!(
            decode(buf).unwrap_err(),
            CodecError::Header(HeaderError::UnsupportedVersion(2))
        );

        assert!(matches!(
            decode(&buf[..10]),
            Err(CodecError::Header(HeaderError::TooShort { .. }))
        ));
    }

    #[test]
    fn test_truncated_payload() {
        let vertices = [1.0f32, 2.0, 3.0];
        let view = MeshView {
            vertices: Some(&vertices),
            ..MeshView::default()
        };
        let len = encoded_len(&view).unwrap();
        let mut words = aligned(len);
        let out = bytes_of(&mut words, len);
        encode(&view, out).unwrap();

        assert_eq!(
            decode(&out[..len - 1]).unwrap_err(),
            CodecError::Truncated {
                required: len as u64,
                available: len - 1
            }
        );
    }

    #[test]
    fn test_trailing_bytes_are_ignored() {
        let indices = [0i32, 1, 2];
        let view = MeshView {
            indices: Some(&indices),
            ..MeshView::default()
        };
        let len = encoded_len(&view).unwrap();
        let mut words = aligned(len + 8);
        let out = bytes_of(&mut words, len + 8);
        encode(&view, out).unwrap();
        assert_eq!(decode(out).unwrap().indices, Some(&indices[..]));
    }

    #[cfg(target_endian = "little")]
    #[test]
    fn test_misaligned_input() {
        let vertices = [1.0f32, 2.0, 3.0];
        let view = MeshView {
            vertices: Some(&vertices),
            ..MeshView::default()
        };
        let len = encoded_len(&view).unwrap();
        let mut words = aligned(len + 4);
        let buf = bytes_of(&mut words, len + 4);
        encode(&view, &mut buf[1..]).unwrap();

        assert_eq!(
            decode(&buf[1..]).unwrap_err(),
            CodecError::Misaligned(Attribute::Vertices)
        );
    }

    #[test]
    fn test_decode_mut_writes_through() {
        let vertices = [0.0f32, 0.0, 0.0, 2.0, 2.0, 2.0];
        let view = MeshView {
            bounds: Aabb {
                min: [0.0; 3],
                max: [2.0; 3],
                center: [1.0; 3],
            },
            vertices: Some(&vertices),
            ..MeshView::default()
        };
        let len = encoded_len(&view).unwrap();
        let mut words = aligned(len);
        let buf = bytes_of(&mut words, len);
        encode(&view, buf).unwrap();

        {
            let mut model = decode_mut(buf).unwrap();
            model.recenter([0.0; 3]).unwrap();
        }
        let decoded = decode(buf).unwrap();
        assert_eq!(
            decoded.vertices,
            Some(&[-1.0f32, -1.0, -1.0, 1.0, 1.0, 1.0][..])
        );
        // header still holds the encoded bounds
        assert_eq!(decoded.bounds.center, [1.0; 3]);
    }
}
