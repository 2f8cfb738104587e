//! Full pipeline tests: OBJ text -> model -> derive -> transform -> RGF bytes -> decode

use rgf_core::{Applied, Attribute, MeshModel, RgfError, RgfHeader, codec, derive, obj};

/// Unit quad in the XY plane, offset from the origin, with per-vertex UVs.
const QUAD: &[u8] = b"# quad
v 1 1 0
v 3 1 0
v 3 3 0
v 1 3 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
f 1/1 2/2 3/3 4/4
";

/// Owned, 4-byte aligned storage for one mesh.
struct Storage {
    vertices: Vec<f32>,
    normals: Vec<f32>,
    tangents: Vec<f32>,
    bitangents: Vec<f32>,
    uvs: Vec<f32>,
    indices: Vec<i32>,
}

impl Storage {
    fn for_source(source: &[u8]) -> Result<Self, RgfError> {
        let stats = obj::measure_obj(source)?;
        Ok(Self {
            vertices: vec![0.0; stats.vertices_len()],
            normals: vec![0.0; stats.vertices_len()],
            tangents: vec![0.0; stats.vertices_len()],
            bitangents: vec![0.0; stats.vertices_len()],
            uvs: vec![0.0; stats.uvs_len()],
            indices: vec![0; stats.indices_len()],
        })
    }

    fn model(&mut self) -> MeshModel<'_> {
        MeshModel::new()
            .with_vertices(&mut self.vertices)
            .with_normals(&mut self.normals)
            .with_tangents(&mut self.tangents)
            .with_bitangents(&mut self.bitangents)
            .with_uvs(&mut self.uvs)
            .with_indices(&mut self.indices)
    }
}

fn encode_aligned(model: &MeshModel<'_>) -> Result<(Vec<u32>, usize), RgfError> {
    let view = model.as_view();
    let len = codec::encoded_len(&view)?;
    let mut words = vec![0u32; len.div_ceil(4)];
    let bytes = &mut bytemuck::cast_slice_mut::<u32, u8>(&mut words)[..len];
    let written = codec::encode(&view, bytes)?;
    Ok((words, written))
}

fn close(a: &[f32], b: &[f32]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-5)
}

#[test]
fn test_convert_quad() -> Result<(), RgfError> {
    let mut storage = Storage::for_source(QUAD)?;
    let mut model = storage.model();

    let stats = obj::import_obj(&mut model, QUAD)?;
    assert_eq!(stats.vertex_count, 4);
    assert_eq!(stats.triangle_count, 2);
    assert_eq!(model.bounds.center, [2.0, 2.0, 0.0]);

    assert_eq!(derive::compute_normals(&mut model)?, Applied::Changed);
    assert_eq!(derive::compute_tangents(&mut model)?, Applied::Changed);

    assert_eq!(model.recenter([0.0, 0.0, 0.0])?, Applied::Changed);
    assert_eq!(model.scale(1.0)?, Applied::Changed);
    assert_eq!(model.bounds.min, [-0.5, -0.5, 0.0]);
    assert_eq!(model.bounds.max, [0.5, 0.5, 0.0]);

    let (words, len) = encode_aligned(&model)?;
    let bytes = &bytemuck::cast_slice::<u32, u8>(&words)[..len];
    let header = RgfHeader::from_bytes(bytes).map_err(rgf_core::CodecError::from)?;
    assert_eq!(header.counts.vertices, 12);
    assert_eq!(header.counts.uvs, 8);
    assert_eq!(header.counts.indices, 6);

    let decoded = codec::decode(bytes)?;
    assert_eq!(decoded.indices, Some(&[0, 1, 2, 0, 2, 3][..]));
    assert_eq!(decoded.normalization.current_scale, 0.5);
    assert_eq!(decoded.normalization.original_center, [2.0, 2.0, 0.0]);
    assert!(close(
        decoded.normals.unwrap_or_default(),
        &[0.0f32, 0.0, 1.0].repeat(4)
    ));
    assert!(close(
        decoded.tangents.unwrap_or_default(),
        &[1.0f32, 0.0, 0.0].repeat(4)
    ));
    assert!(close(
        decoded.bitangents.unwrap_or_default(),
        &[0.0f32, 1.0, 0.0].repeat(4)
    ));
    Ok(())
}

#[test]
fn test_decoded_model_resets_to_import_state() -> Result<(), RgfError> {
    let mut storage = Storage::for_source(QUAD)?;
    let mut model = storage.model();
    obj::import_obj(&mut model, QUAD)?;
    let imported = model.vertices.as_deref().unwrap_or_default().to_vec();

    model.scale(8.0)?;
    model.recenter([-5.0, 0.0, 10.0])?;
    let (mut words, len) = encode_aligned(&model)?;

    let bytes = &mut bytemuck::cast_slice_mut::<u32, u8>(&mut words)[..len];
    let mut decoded = codec::decode_mut(bytes)?;
    assert_eq!(decoded.scale_reset()?, Applied::Changed);
    assert_eq!(decoded.recenter_reset()?, Applied::Changed);
    assert_eq!(decoded.normalization.current_scale, 1.0);
    assert!(close(decoded.vertices.as_deref().unwrap_or_default(), &imported));
    Ok(())
}

#[test]
fn test_errors_convert_into_rgf_error() {
    let mut model = MeshModel::new();
    let err = obj::import_obj(&mut model, b"v 0 0 0\n")
        .map_err(RgfError::from)
        .unwrap_err();
    assert!(matches!(err, RgfError::Import(_)));

    let err = derive::compute_normals(&mut model)
        .map_err(RgfError::from)
        .unwrap_err();
    assert_eq!(err.to_string(), "required vertices buffer is not present");

    let err = codec::decode(b"RGF").map_err(RgfError::from).unwrap_err();
    assert!(matches!(err, RgfError::Codec(_)));
}

#[test]
fn test_import_without_optional_buffers() -> Result<(), RgfError> {
    let stats = obj::measure_obj(QUAD)?;
    let mut vertices = vec![0.0f32; stats.vertices_len()];
    let mut model = MeshModel::new().with_vertices(&mut vertices);
    obj::import_obj(&mut model, QUAD)?;

    let (words, len) = encode_aligned(&model)?;
    let decoded = codec::decode(&bytemuck::cast_slice::<u32, u8>(&words)[..len])?;
    assert_eq!(decoded.len_of(Attribute::Vertices), 12);
    assert!(!decoded.is_present(Attribute::Indices));
    assert!(!decoded.is_present(Attribute::Uvs));
    Ok(())
}
