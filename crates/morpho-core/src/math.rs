//! Mathematical utilities and type definitions.
//!
//! This module provides the scalar and matrix aliases used throughout the
//! workspace, together with the rotation builders shared by the per-shape
//! primitives and the solvers:
//!
//! - [`axis_rotation`]: elementary rotation about a coordinate axis,
//! - [`rodrigues`]: axis-angle rotation (Rodrigues' formula),
//! - [`rotation_between`]: the rotation carrying one direction onto another.

use nalgebra::{Matrix2, Matrix3, Matrix4, Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// Scalar type used throughout the library (currently `f64`).
pub type Real = f64;

/// 2D vector with [`Real`] components.
pub type Vec2 = Vector2<Real>;
/// 3D vector with [`Real`] components.
pub type Vec3 = Vector3<Real>;
/// 2×2 matrix with [`Real`] entries.
pub type Mat2 = Matrix2<Real>;
/// 3×3 matrix with [`Real`] entries.
pub type Mat3 = Matrix3<Real>;
/// 4×4 matrix with [`Real`] entries (homogeneous transforms).
pub type Mat4 = Matrix4<Real>;

/// Sine threshold under which two directions are treated as parallel.
pub const ALIGN_EPS: Real = 1e-10;

/// Norm threshold under which a vector is treated as zero.
pub const LENGTH_EPS: Real = 1e-12;

/// Coordinate axis selector for elementary rotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Unit vector along this axis.
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::x(),
            Axis::Y => Vec3::y(),
            Axis::Z => Vec3::z(),
        }
    }
}

/// Elementary rotation about a coordinate axis.
///
/// Uses the frame-rotation convention: with `(a, b)` the in-plane pair of the
/// axis (`(y, z)` for X, `(x, z)` for Y, `(x, y)` for Z), the matrix maps
///
/// ```text
/// a' =  a cosθ + b sinθ
/// b' = -a sinθ + b cosθ
/// ```
///
/// so a vector at angle `θ` inside the plane is carried onto the `a` axis.
/// Apply it as `p' = R p`.
pub fn axis_rotation(theta: Real, axis: Axis) -> Mat3 {
    let (s, c) = theta.sin_cos();
    match axis {
        Axis::X => Mat3::new(1.0, 0.0, 0.0, 0.0, c, s, 0.0, -s, c),
        Axis::Y => Mat3::new(c, 0.0, s, 0.0, 1.0, 0.0, -s, 0.0, c),
        Axis::Z => Mat3::new(c, s, 0.0, -s, c, 0.0, 0.0, 0.0, 1.0),
    }
}

/// Rotation by `theta` (counter-clockwise) about the unit vector `axis`.
///
/// `R = I cosθ + (1 - cosθ) a aᵀ + sinθ [a]×`
pub fn rodrigues(axis: &Vec3, theta: Real) -> Mat3 {
    let (s, c) = theta.sin_cos();
    Mat3::identity() * c + axis * axis.transpose() * (1.0 - c) + axis.cross_matrix() * s
}

/// Rotation carrying the direction of `from` onto the direction of `to`.
///
/// The axis is the normalised cross product and the angle the arccosine of
/// the normalised dot product. Returns `None` when either vector is zero or
/// when the two are already parallel (nothing to rotate). Anti-parallel
/// inputs have no unique axis; they are turned by a half turn about
/// `half_turn_axis`, which must be perpendicular to `to`.
pub fn rotation_between(from: &Vec3, to: &Vec3, half_turn_axis: &Vec3) -> Option<Mat3> {
    let from_norm = from.norm();
    let to_norm = to.norm();
    if from_norm <= LENGTH_EPS || to_norm <= LENGTH_EPS {
        return None;
    }

    let a = from / from_norm;
    let b = to / to_norm;
    let cos_theta = a.dot(&b).clamp(-1.0, 1.0);
    let axis = a.cross(&b);
    let sin_theta = axis.norm();

    if sin_theta <= ALIGN_EPS {
        if cos_theta > 0.0 {
            return None;
        }
        return Some(rodrigues(
            &half_turn_axis.normalize(),
            std::f64::consts::PI,
        ));
    }

    Some(rodrigues(&(axis / sin_theta), cos_theta.acos()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn axis_rotation_carries_in_plane_vector_onto_first_axis() {
        let theta: Real = 0.7;
        let v = Vec3::new(theta.cos(), theta.sin(), 0.0);
        let r = axis_rotation(theta, Axis::Z) * v;
        assert_abs_diff_eq!(r, Vec3::x(), epsilon = 1e-12);

        let v = Vec3::new(theta.cos(), 0.0, theta.sin());
        let r = axis_rotation(theta, Axis::Y) * v;
        assert_abs_diff_eq!(r, Vec3::x(), epsilon = 1e-12);

        let v = Vec3::new(0.0, theta.cos(), theta.sin());
        let r = axis_rotation(theta, Axis::X) * v;
        assert_abs_diff_eq!(r, Vec3::y(), epsilon = 1e-12);
    }

    #[test]
    fn rodrigues_quarter_turn_about_z() {
        let r = rodrigues(&Vec3::z(), FRAC_PI_2);
        assert_abs_diff_eq!(r * Vec3::x(), Vec3::y(), epsilon = 1e-12);
        assert_abs_diff_eq!(r.determinant(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn rotation_between_handles_general_parallel_and_opposite() {
        let from = Vec3::new(1.0, 2.0, -0.5);
        let r = rotation_between(&from, &Vec3::x(), &Vec3::z()).unwrap();
        let mapped = r * from;
        assert_abs_diff_eq!(mapped, Vec3::new(from.norm(), 0.0, 0.0), epsilon = 1e-12);

        assert!(rotation_between(&Vec3::new(3.0, 0.0, 0.0), &Vec3::x(), &Vec3::z()).is_none());
        assert!(rotation_between(&Vec3::zeros(), &Vec3::x(), &Vec3::z()).is_none());

        let r = rotation_between(&Vec3::new(-2.0, 0.0, 0.0), &Vec3::x(), &Vec3::z()).unwrap();
        assert_abs_diff_eq!(r * Vec3::new(-2.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0), epsilon = 1e-12);
    }
}
