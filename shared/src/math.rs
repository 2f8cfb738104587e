//! Bounding box and normalization state for RGF models
//!
//! Plain `[f32; 3]` triples so the types stay serializable and can be shared
//! without pulling a vector math crate into every consumer.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box with its derived center.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Aabb {
    pub min: [f32; 3],
    pub max: [f32; 3],
    pub center: [f32; 3],
}

impl Aabb {
    /// Box seeded with sentinels so the first included point replaces both corners.
    pub const SEED: Self = Self {
        min: [f32::MAX; 3],
        max: [-f32::MAX; 3],
        center: [0.0; 3],
    };

    /// Grow the box to contain `point`. The center is not updated.
    #[inline]
    pub fn include(&mut self, point: [f32; 3]) {
        for axis in 0..3 {
            if point[axis] < self.min[axis] {
                self.min[axis] = point[axis];
            }
            if point[axis] > self.max[axis] {
                self.max[axis] = point[axis];
            }
        }
    }

    /// True until at least one point has been included.
    pub fn is_unset(&self) -> bool {
        (0..3).any(|axis| self.min[axis] > self.max[axis])
    }

    /// Recompute the center from the corners. Halving before the sum keeps
    /// the midpoint finite for corners near `f32::MAX`.
    ///
    /// A box that never saw a point collapses to all zeros.
    pub fn finish(&mut self) {
        if self.is_unset() {
            *self = Self::default();
            return;
        }
        for axis in 0..3 {
            self.center[axis] = self.min[axis] * 0.5 + self.max[axis] * 0.5;
        }
    }

    /// Per-axis extent (`max - min`).
    pub fn extent(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    /// Largest extent across the three axes, never negative.
    pub fn max_extent(&self) -> f32 {
        let [x, y, z] = self.extent();
        x.max(y).max(z).max(0.0)
    }
}

/// Reference state for reversible recenter/rescale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Normalization {
    /// Bounding-box center recorded at import time
    pub original_center: [f32; 3],
    /// Largest bounding-box extent recorded at import time
    pub original_max_dim: f32,
    /// Scale currently applied relative to the original extent
    pub current_scale: f32,
}

impl Normalization {
    /// Record the reference state from a freshly computed bounding box.
    pub fn from_bounds(bounds: &Aabb) -> Self {
        Self {
            original_center: bounds.center,
            original_max_dim: bounds.max_extent(),
            current_scale: 1.0,
        }
    }
}

impl Default for Normalization {
    fn default() -> Self {
        Self {
            original_center: [0.0; 3],
            original_max_dim: 0.0,
            current_scale: 1.0,
        }
    }
}
