//! Numeric kernel
//!
//! Vector add, subtract and cross product come from `glam::Vec3`. Length and
//! normalization go through [`approx_sqrt`], a fixed-cost Newton-Raphson
//! square root, so results are reproducible regardless of the platform's
//! `sqrt` implementation.

use glam::{Vec2, Vec3};

/// Newton-Raphson refinements applied by [`approx_sqrt`].
pub const SQRT_ITERATIONS: usize = 5;

/// Approximate square root: five Newton-Raphson steps seeded from `x / 2`.
///
/// There is no convergence check. Accuracy is best for arguments near 1 and
/// degrades for very large or very small ones. Non-positive (and NaN)
/// arguments return 0.
pub fn approx_sqrt(x: f32) -> f32 {
    if !(x > 0.0) {
        return 0.0;
    }
    let mut guess = x * 0.5;
    if guess == 0.0 {
        // subnormal input, halving underflowed
        return 0.0;
    }
    for _ in 0..SQRT_ITERATIONS {
        guess = 0.5 * (guess + x / guess);
    }
    guess
}

/// Euclidean length using [`approx_sqrt`].
#[inline]
pub fn length(v: Vec3) -> f32 {
    approx_sqrt(v.dot(v))
}

/// Unit vector in the direction of `v`; the zero vector maps to zero.
#[inline]
pub fn normalize(v: Vec3) -> Vec3 {
    let len = length(v);
    if len == 0.0 { Vec3::ZERO } else { v / len }
}

/// Read the `index`-th triple from a flat float buffer.
#[inline]
pub fn load3(buf: &[f32], index: usize) -> Vec3 {
    Vec3::from_slice(&buf[index * 3..index * 3 + 3])
}

/// Write the `index`-th triple of a flat float buffer.
#[inline]
pub fn store3(buf: &mut [f32], index: usize, v: Vec3) {
    v.write_to_slice(&mut buf[index * 3..index * 3 + 3]);
}

/// Add `v` into the `index`-th triple of a flat float buffer.
#[inline]
pub fn accumulate3(buf: &mut [f32], index: usize, v: Vec3) {
    let sum = load3(buf, index) + v;
    store3(buf, index, sum);
}

/// Read the `index`-th pair from a flat float buffer.
#[inline]
pub fn load2(buf: &[f32], index: usize) -> Vec2 {
    Vec2::from_slice(&buf[index * 2..index * 2 + 2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_sqrt_near_one() {
        assert!((approx_sqrt(1.0) - 1.0).abs() < 1e-6);
        assert!((approx_sqrt(2.0) - std::f32::consts::SQRT_2).abs() < 1e-6);
        assert_eq!(approx_sqrt(4.0), 2.0);
    }

    #[test]
    fn test_approx_sqrt_is_approximate_far_from_one() {
        // Five fixed steps from x/2 do not converge for tiny arguments
        let root = approx_sqrt(0.01);
        assert!(root > 0.1);
        assert!(root < 0.12);
    }

    #[test]
    fn test_approx_sqrt_non_positive() {
        assert_eq!(approx_sqrt(0.0), 0.0);
        assert_eq!(approx_sqrt(-4.0), 0.0);
        assert_eq!(approx_sqrt(f32::NAN), 0.0);
        assert_eq!(approx_sqrt(f32::from_bits(1)), 0.0);
    }

    #[test]
    fn test_length() {
        assert!((length(Vec3::new(3.0, 4.0, 0.0)) - 5.0).abs() < 1e-4);
        assert_eq!(length(Vec3::ZERO), 0.0);
    }

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(normalize(Vec3::ZERO), Vec3::ZERO);
    }

    #[test]
    fn test_normalize_unit_axis() {
        let n = normalize(Vec3::new(0.0, 0.0, 2.0));
        assert!((n - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_load_store_triples() {
        let mut buf = [0.0f32; 6];
        store3(&mut buf, 1, Vec3::new(1.0, 2.0, 3.0));
        accumulate3(&mut buf, 1, Vec3::ONE);
        assert_eq!(buf, [0.0, 0.0, 0.0, 2.0, 3.0, 4.0]);
        assert_eq!(load3(&buf, 1), Vec3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn test_load_pair() {
        let buf = [0.25f32, 0.5, 0.75, 1.0];
        assert_eq!(load2(&buf, 1), Vec2::new(0.75, 1.0));
    }
}
