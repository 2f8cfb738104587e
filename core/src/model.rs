//! Mesh model views
//!
//! A model never owns its attribute data. [`MeshModel`] borrows caller
//! storage exclusively and supports every operation; [`MeshView`] borrows it
//! shared and is what the encoder reads. Decoded models alias the encoded
//! byte buffer, so the borrow checker keeps that buffer alive and unchanged
//! for as long as the model exists.
//!
//! Element counts are the slice lengths. An absent buffer and an empty one
//! both count as zero, and zero-count sections are never encoded.

use std::fmt;

use rgf_shared::{Aabb, Normalization};

/// One of the six attribute sections, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Vertices,
    Normals,
    Tangents,
    Bitangents,
    Uvs,
    Indices,
}

impl Attribute {
    /// All sections in encoding order.
    pub const ALL: [Self; 6] = [
        Self::Vertices,
        Self::Normals,
        Self::Tangents,
        Self::Bitangents,
        Self::Uvs,
        Self::Indices,
    ];

    /// Elements per vertex (or per triangle for indices).
    pub const fn components(self) -> usize {
        match self {
            Self::Uvs => 2,
            _ => 3,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Vertices => "vertices",
            Self::Normals => "normals",
            Self::Tangents => "tangents",
            Self::Bitangents => "bitangents",
            Self::Uvs => "uvs",
            Self::Indices => "indices",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of an in-place operation that succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Buffers or bounds were modified
    Changed,
    /// The model already satisfied the request
    Unchanged,
}

/// Mutable mesh model over caller-provided buffers.
#[derive(Debug, Default)]
pub struct MeshModel<'a> {
    pub bounds: Aabb,
    pub normalization: Normalization,
    pub vertices: Option<&'a mut [f32]>,
    pub normals: Option<&'a mut [f32]>,
    pub tangents: Option<&'a mut [f32]>,
    pub bitangents: Option<&'a mut [f32]>,
    pub uvs: Option<&'a mut [f32]>,
    pub indices: Option<&'a mut [i32]>,
}

impl<'a> MeshModel<'a> {
    /// Empty model: no buffers, zero bounds, unit scale.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vertices(mut self, buf: &'a mut [f32]) -> Self {
        self.vertices = Some(buf);
        self
    }

    pub fn with_normals(mut self, buf: &'a mut [f32]) -> Self {
        self.normals = Some(buf);
        self
    }

    pub fn with_tangents(mut self, buf: &'a mut [f32]) -> Self {
        self.tangents = Some(buf);
        self
    }

    pub fn with_bitangents(mut self, buf: &'a mut [f32]) -> Self {
        self.bitangents = Some(buf);
        self
    }

    pub fn with_uvs(mut self, buf: &'a mut [f32]) -> Self {
        self.uvs = Some(buf);
        self
    }

    pub fn with_indices(mut self, buf: &'a mut [i32]) -> Self {
        self.indices = Some(buf);
        self
    }

    /// Number of elements in a section (0 when absent).
    pub fn len_of(&self, attribute: Attribute) -> usize {
        self.as_view().len_of(attribute)
    }

    /// Number of vertices (position triples).
    pub fn vertex_count(&self) -> usize {
        self.len_of(Attribute::Vertices) / 3
    }

    /// Reborrow as a read-only view.
    pub fn as_view(&self) -> MeshView<'_> {
        MeshView {
            bounds: self.bounds,
            normalization: self.normalization,
            vertices: self.vertices.as_deref(),
            normals: self.normals.as_deref(),
            tangents: self.tangents.as_deref(),
            bitangents: self.bitangents.as_deref(),
            uvs: self.uvs.as_deref(),
            indices: self.indices.as_deref(),
        }
    }
}

/// Read-only mesh model, typically produced by zero-copy decode.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeshView<'a> {
    pub bounds: Aabb,
    pub normalization: Normalization,
    pub vertices: Option<&'a [f32]>,
    pub normals: Option<&'a [f32]>,
    pub tangents: Option<&'a [f32]>,
    pub bitangents: Option<&'a [f32]>,
    pub uvs: Option<&'a [f32]>,
    pub indices: Option<&'a [i32]>,
}

impl<'a> MeshView<'a> {
    /// Float section by attribute; `None` for indices.
    pub fn floats(&self, attribute: Attribute) -> Option<&'a [f32]> {
        match attribute {
            Attribute::Vertices => self.vertices,
            Attribute::Normals => self.normals,
            Attribute::Tangents => self.tangents,
            Attribute::Bitangents => self.bitangents,
            Attribute::Uvs => self.uvs,
            Attribute::Indices => None,
        }
    }

    /// Number of elements in a section (0 when absent).
    pub fn len_of(&self, attribute: Attribute) -> usize {
        match attribute {
            Attribute::Indices => self.indices.map_or(0, <[i32]>::len),
            other => self.floats(other).map_or(0, <[f32]>::len),
        }
    }

    /// Whether a section would be encoded (count > 0).
    pub fn is_present(&self, attribute: Attribute) -> bool {
        self.len_of(attribute) > 0
    }

    pub fn vertex_count(&self) -> usize {
        self.len_of(Attribute::Vertices) / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.len_of(Attribute::Indices) / 3
    }
}
