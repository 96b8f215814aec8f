//! Basis-alignment rotation between two single vectors.
//!
//! Each vector is carried onto +X by two elementary rotations: about Y to
//! zero its Z component, then about Z to zero its Y component. Composing the
//! target's sequence with the inverse of the reference's sequence gives a
//! rotation taking the target direction onto the reference direction.

use morpho_core::{Axis, Dimension, Mat3, Vec3, axis_rotation};

/// Rotation carrying `v` onto the +X axis.
///
/// 2D vectors skip the Y stage. A zero vector yields the identity.
pub fn align_to_x_axis(v: &Vec3, dimension: Dimension) -> Mat3 {
    let mut rotation = Mat3::identity();
    let mut w = *v;
    if dimension.is_3d() {
        let ry = axis_rotation(w.z.atan2(w.x), Axis::Y);
        w = ry * w;
        rotation = ry;
    }
    axis_rotation(w.y.atan2(w.x), Axis::Z) * rotation
}

/// Rotation mapping the direction of `target` onto the direction of `reference`.
pub fn basis_alignment(reference: &Vec3, target: &Vec3, dimension: Dimension) -> Mat3 {
    align_to_x_axis(reference, dimension).transpose() * align_to_x_axis(target, dimension)
}
