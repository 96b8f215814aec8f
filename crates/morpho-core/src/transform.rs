//! Per-shape geometric primitives.
//!
//! Every operation here is infallible: missing landmarks pass through
//! untouched and the cached centroid size is invalidated.

use crate::{Axis, Landmark, Mat3, Mat4, Real, Shape, Vec3, axis_rotation};
use log::warn;
use nalgebra::Vector4;

impl Shape {
    /// Add `delta` to every present landmark (`delta.z` is ignored for 2D).
    pub fn translate(&mut self, delta: Vec3) {
        let delta = if self.dimension().is_3d() {
            delta
        } else {
            Vec3::new(delta.x, delta.y, 0.0)
        };
        self.map_present(|p| p + delta);
    }

    /// Multiply every present landmark by `factor`.
    pub fn scale_by(&mut self, factor: Real) {
        self.map_present(|p| p * factor);
    }

    /// Translate so that the centroid sits at the origin.
    pub fn move_to_center(&mut self) {
        let c = self.centroid();
        self.translate(-c);
    }

    /// Rescale to unit (raw) centroid size. No-op for degenerate shapes.
    pub fn rescale_to_unit_size(&mut self) {
        let size = self.raw_centroid_size(true);
        if self.count_landmarks(true) > 1 && size > 0.0 {
            self.scale_by(1.0 / size);
        }
    }

    /// Planar rotation, identical to `rotate_3d(theta, Axis::Z)`.
    pub fn rotate_2d(&mut self, theta: Real) {
        self.rotate_3d(theta, Axis::Z);
    }

    /// Elementary rotation about a coordinate axis (see [`axis_rotation`]).
    ///
    /// 2D shapes only rotate about Z; other axes leave them unchanged.
    pub fn rotate_3d(&mut self, theta: Real, axis: Axis) {
        if !self.dimension().is_3d() && axis != Axis::Z {
            warn!("ignoring rotation about {:?} on a 2D shape", axis);
            return;
        }
        self.apply_rotation_matrix(&axis_rotation(theta, axis));
    }

    /// Apply `p' = R p` to every present landmark.
    ///
    /// For 2D shapes only the upper-left 2×2 block of `rotation` is used.
    pub fn apply_rotation_matrix(&mut self, rotation: &Mat3) {
        if self.dimension().is_3d() {
            self.map_present(|p| rotation * p);
        } else {
            let block = rotation.fixed_view::<2, 2>(0, 0).into_owned();
            self.map_present(|p| {
                let q = block * p.xy();
                Vec3::new(q.x, q.y, 0.0)
            });
        }
    }

    /// Apply a homogeneous transform as `[x y z 1] · Mᵗ`, dropping `w`.
    pub fn apply_transform(&mut self, transform: &Mat4) {
        let is_3d = self.dimension().is_3d();
        self.map_present(|p| {
            let h = transform * Vector4::new(p.x, p.y, p.z, 1.0);
            Vec3::new(h.x, h.y, if is_3d { h.z } else { 0.0 })
        });
    }

    fn map_present(&mut self, f: impl Fn(&Vec3) -> Vec3) {
        for lm in self.landmarks_mut() {
            if let Landmark::Present(p) = lm {
                *p = f(p);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Dimension, Landmark, Mat4, Shape, Vec3};
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_4;

    fn shape_with_gap() -> Shape {
        Shape::new(
            Dimension::Two,
            vec![
                Landmark::Missing,
                Landmark::xy(1.1, 0.1),
                Landmark::xy(1.1, 1.1),
                Landmark::xy(0.1, 1.1),
            ],
        )
    }

    #[test]
    fn translate_moves_present_and_keeps_missing() {
        let mut shape = Shape::from_xy(&[[0.0, 0.0], [10.0, 10.0], [20.0, 20.0]]);
        shape.translate(Vec3::new(5.0, 5.0, 7.0));
        assert_eq!(shape.landmarks()[0], Landmark::xy(5.0, 5.0));
        assert_eq!(shape.landmarks()[2], Landmark::xy(25.0, 25.0));

        let mut gap = shape_with_gap();
        gap.translate(Vec3::new(10.0, 20.0, 0.0));
        assert!(gap.landmarks()[0].is_missing());
        let moved = gap.landmarks()[1].coords().copied().unwrap();
        assert_abs_diff_eq!(moved, Vec3::new(11.1, 20.1, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn translation_preserves_and_scaling_multiplies_centroid_size() {
        let mut shape = Shape::from_xy(&[[0.0, 0.0], [10.0, 0.0], [0.0, 10.0]]);
        let size = shape.centroid_size(false);

        shape.translate(Vec3::new(-3.0, 4.5, 0.0));
        assert_abs_diff_eq!(shape.centroid_size(false), size, epsilon = 1e-9);

        shape.scale_by(-2.5);
        assert_abs_diff_eq!(shape.centroid_size(false), 2.5 * size, epsilon = 1e-9);
    }

    #[test]
    fn move_to_center_and_unit_size() {
        let mut shape = Shape::from_xy(&[[0.0, 0.0], [10.0, 0.0], [0.0, 10.0]]);
        shape.move_to_center();
        assert_abs_diff_eq!(shape.centroid(), Vec3::zeros(), epsilon = 1e-10);

        shape.rescale_to_unit_size();
        assert_abs_diff_eq!(shape.centroid_size(true), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn rotate_2d_roundtrip_restores_coordinates() {
        let original = shape_with_gap();
        for theta in [0.3, -1.7, 2.9, 10.0] {
            let mut shape = original.clone();
            shape.rotate_2d(theta);
            shape.rotate_2d(-theta);
            for (a, b) in shape.landmarks().iter().zip(original.landmarks()) {
                match (a.coords(), b.coords()) {
                    (Some(a), Some(b)) => assert_abs_diff_eq!(*a, *b, epsilon = 1e-12),
                    (None, None) => {}
                    _ => panic!("missing state changed"),
                }
            }
        }
    }

    #[test]
    fn rotation_about_x_on_2d_shape_is_ignored() {
        let mut shape = Shape::from_xy(&[[1.0, 2.0]]);
        shape.rotate_3d(0.5, crate::Axis::X);
        assert_eq!(shape.landmarks()[0], Landmark::xy(1.0, 2.0));
    }

    #[test]
    fn homogeneous_rotation_preserves_missing() {
        let (s, c) = FRAC_PI_4.sin_cos();
        let m = Mat4::new(
            c, -s, 0.0, 0.0, //
            s, c, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        );
        let mut shape = shape_with_gap();
        shape.apply_transform(&m);
        assert!(shape.landmarks()[0].is_missing());
        let p = shape.landmarks()[1].coords().copied().unwrap();
        assert_abs_diff_eq!(p, Vec3::new(c * 1.1 - s * 0.1, s * 1.1 + c * 0.1, 0.0), epsilon = 1e-12);
    }
}
