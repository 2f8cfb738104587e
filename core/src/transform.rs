//! Reversible recenter and rescale
//!
//! Transforms are relative to the reference state recorded at import time
//! ([`Normalization`](rgf_shared::Normalization)), so any sequence of
//! `recenter`/`scale` calls can be undone with the matching reset.

use glam::Vec3;
use rgf_shared::Aabb;

use crate::error::GeometryError;
use crate::model::{Applied, Attribute, MeshModel};

fn translate(buf: &mut [f32], offset: Vec3) {
    for triple in buf.chunks_exact_mut(3) {
        (Vec3::from_slice(triple) + offset).write_to_slice(triple);
    }
}

fn multiply(buf: &mut [f32], factor: f32) {
    for value in buf.iter_mut() {
        *value *= factor;
    }
}

impl MeshModel<'_> {
    fn vertices_mut(&mut self) -> Result<&mut [f32], GeometryError> {
        self.vertices
            .as_deref_mut()
            .ok_or(GeometryError::MissingBuffer(Attribute::Vertices))
    }

    /// Rescan the vertices for min, max and center.
    pub fn recompute_bounds(&mut self) -> Result<Applied, GeometryError> {
        let vertices = self
            .vertices
            .as_deref()
            .ok_or(GeometryError::MissingBuffer(Attribute::Vertices))?;

        let mut bounds = Aabb::SEED;
        for p in vertices.chunks_exact(3) {
            bounds.include([p[0], p[1], p[2]]);
        }
        bounds.finish();
        self.bounds = bounds;
        Ok(Applied::Changed)
    }

    /// Translate the mesh so its bounding-box center lands on `target`.
    ///
    /// The offset is taken from the midpoint of `bounds.min`/`bounds.max`;
    /// a stale `bounds.center` does not skew it.
    pub fn recenter(&mut self, target: [f32; 3]) -> Result<Applied, GeometryError> {
        if !target.iter().all(|c| c.is_finite()) {
            return Err(GeometryError::InvalidArgument(
                "recenter target must be finite",
            ));
        }
        let midpoint = Vec3::from(self.bounds.min) * 0.5 + Vec3::from(self.bounds.max) * 0.5;
        let offset = Vec3::from(target) - midpoint;
        if !offset.is_finite() {
            return Err(GeometryError::InvalidArgument(
                "recenter offset out of range",
            ));
        }
        let vertices = self.vertices_mut()?;
        if offset == Vec3::ZERO {
            return Ok(Applied::Unchanged);
        }

        translate(vertices, offset);
        self.bounds.min = (Vec3::from(self.bounds.min) + offset).into();
        self.bounds.max = (Vec3::from(self.bounds.max) + offset).into();
        self.bounds.center = target;

        tracing::debug!(?target, "recentered mesh");
        Ok(Applied::Changed)
    }

    /// Move the mesh back to the center recorded at import.
    pub fn recenter_reset(&mut self) -> Result<Applied, GeometryError> {
        self.recenter(self.normalization.original_center)
    }

    /// Scale the mesh so its original largest extent becomes `target_dim`.
    ///
    /// The factor is computed against the import-time extent, so repeating a
    /// call with the same target is a no-op. Meshes with no extent are left
    /// unchanged. A target whose scale or step factor would not be a positive
    /// finite number is rejected before any buffer is touched.
    pub fn scale(&mut self, target_dim: f32) -> Result<Applied, GeometryError> {
        if !(target_dim.is_finite() && target_dim > 0.0) {
            return Err(GeometryError::InvalidArgument(
                "scale target must be positive and finite",
            ));
        }
        let Self {
            bounds,
            normalization,
            ..
        } = *self;
        let vertices = self.vertices_mut()?;

        if !(normalization.original_max_dim > 0.0) {
            return Ok(Applied::Unchanged);
        }
        let desired = target_dim / normalization.original_max_dim;
        if !(desired.is_finite() && desired > 0.0) {
            return Err(GeometryError::InvalidArgument("scale out of range"));
        }
        let current = normalization.current_scale;
        if desired == current {
            return Ok(Applied::Unchanged);
        }
        if !(current > 0.0 && current.is_finite()) {
            return Err(GeometryError::InvalidArgument(
                "current scale must be positive and finite",
            ));
        }

        let factor = desired / current;
        if !(factor.is_finite() && factor > 0.0) {
            return Err(GeometryError::InvalidArgument("scale factor out of range"));
        }
        multiply(vertices, factor);
        self.bounds = Aabb {
            min: (Vec3::from(bounds.min) * factor).into(),
            max: (Vec3::from(bounds.max) * factor).into(),
            center: (Vec3::from(bounds.center) * factor).into(),
        };
        self.normalization.current_scale = desired;

        tracing::debug!(target_dim, scale = desired, "scaled mesh");
        Ok(Applied::Changed)
    }

    /// Undo any applied scale and recompute bounds from the vertices.
    ///
    /// Bounds are always rescanned, even at unit scale. The result is
    /// `Unchanged` only when neither the vertices nor the bounds moved.
    pub fn scale_reset(&mut self) -> Result<Applied, GeometryError> {
        let current = self.normalization.current_scale;
        let previous = self.bounds;
        let vertices = self.vertices_mut()?;
        if !(current > 0.0 && current.is_finite()) {
            return Err(GeometryError::InvalidArgument(
                "current scale must be positive and finite",
            ));
        }

        let rescaled = current != 1.0;
        if rescaled {
            multiply(vertices, 1.0 / current);
            self.normalization.current_scale = 1.0;
        }
        self.recompute_bounds()?;
        if rescaled || self.bounds != previous {
            Ok(Applied::Changed)
        } else {
            Ok(Applied::Unchanged)
        }
    }
}
