//! Owned backing storage for the borrowed core model

use rgf_core::{MeshModel, ObjStats};

/// Attribute buffers for one mesh, sized from an OBJ measurement.
///
/// Optional attributes stay empty when not requested and are attached to
/// the model as absent.
#[derive(Debug, Clone, Default)]
pub struct MeshStorage {
    pub vertices: Vec<f32>,
    pub normals: Vec<f32>,
    pub tangents: Vec<f32>,
    pub bitangents: Vec<f32>,
    pub uvs: Vec<f32>,
    pub indices: Vec<i32>,
}

fn slot<T>(buf: &mut [T]) -> Option<&mut [T]> {
    (!buf.is_empty()).then_some(buf)
}

impl MeshStorage {
    /// Allocate zeroed buffers for everything the importer will write,
    /// plus derived outputs when requested.
    pub fn for_obj(stats: &ObjStats, normals: bool, tangents: bool) -> Self {
        let derived = |wanted: bool| vec![0.0; if wanted { stats.vertices_len() } else { 0 }];
        Self {
            vertices: vec![0.0; stats.vertices_len()],
            normals: derived(normals),
            tangents: derived(tangents),
            bitangents: derived(tangents),
            uvs: vec![0.0; stats.uvs_len()],
            indices: vec![0; stats.indices_len()],
        }
    }

    /// Borrow the storage as a model. The vertex buffer is always attached.
    pub fn model(&mut self) -> MeshModel<'_> {
        MeshModel {
            vertices: Some(self.vertices.as_mut_slice()),
            normals: slot(&mut self.normals),
            tangents: slot(&mut self.tangents),
            bitangents: slot(&mut self.bitangents),
            uvs: slot(&mut self.uvs),
            indices: slot(&mut self.indices),
            ..MeshModel::default()
        }
    }
}

/// Byte buffer with 4-byte alignment, suitable for zero-copy decode.
#[derive(Debug, Clone, Default)]
pub struct RecordBuffer {
    words: Vec<u32>,
    len: usize,
}

impl RecordBuffer {
    pub fn zeroed(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(4)],
            len,
        }
    }

    /// Copy `bytes` into freshly aligned storage.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut buffer = Self::zeroed(bytes.len());
        buffer.as_bytes_mut().copy_from_slice(bytes);
        buffer
    }

    pub fn as_bytes(&self) -> &[u8] {
        &bytemuck::cast_slice::<u32, u8>(&self.words)[..self.len]
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut bytemuck::cast_slice_mut::<u32, u8>(&mut self.words)[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
