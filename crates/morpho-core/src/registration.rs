//! Baseline registration of a single shape.
//!
//! Two registrations are provided:
//!
//! - [`Shape::align_to_baseline`]: rotation-only alignment of the baseline
//!   onto the canonical axes (Rodrigues construction in 3D),
//! - [`Shape::bookstein`]: Bookstein registration, which also centres the
//!   baseline on the origin and standardises its length.
//!
//! Both take one-based baseline indices.

use crate::{
    ALIGN_EPS, Axis, Baseline, LENGTH_EPS, Real, Shape, ShapeError, Vec3, rotation_between,
};
use log::debug;

impl Shape {
    /// Rotate the shape so that its baseline lies on the canonical axes.
    ///
    /// Stage A carries the vector from baseline point 1 to point 2 onto +X.
    /// Stage B (3D with a three-point baseline) then carries the part of
    /// point 3 perpendicular to that vector onto +Y. Already-aligned vectors
    /// are left alone. Fewer than two indices make this a no-op.
    pub fn align_to_baseline(&mut self, baseline: &[usize]) -> Result<(), ShapeError> {
        if baseline.len() < 2 {
            return Ok(());
        }
        let baseline = Baseline::from_one_based(baseline)?;
        baseline.validate_for(self.len())?;

        let [i1, i2, i3] = baseline.alignment_points();
        let p1 = Baseline::point(self, i1)?;
        let p2 = Baseline::point(self, i2)?;
        let v = p2 - p1;
        if v.norm() <= LENGTH_EPS {
            return Err(ShapeError::ZeroLengthBaseline);
        }

        if self.dimension().is_3d() {
            if let Some(r) = rotation_between(&v, &Vec3::x(), &Vec3::z()) {
                self.apply_rotation_matrix(&r);
            }
        } else {
            let theta = v.y.atan2(v.x);
            if theta.abs() > ALIGN_EPS {
                self.rotate_2d(theta);
            }
            return Ok(());
        }

        // a two-point baseline repeats point 1 here, leaving nothing to align
        let w = Baseline::point(self, i3)? - Baseline::point(self, i1)?;
        let perpendicular = w - Vec3::x() * w.x;
        if perpendicular.norm() <= LENGTH_EPS {
            debug!("no third baseline point off the baseline axis; skipping stage B");
            return Ok(());
        }
        if let Some(r) = rotation_between(&perpendicular, &Vec3::y(), &Vec3::x()) {
            self.apply_rotation_matrix(&r);
        }
        Ok(())
    }

    /// Bookstein registration on a baseline.
    ///
    /// In order:
    /// 1. translate the midpoint of points 1–2 to the origin;
    /// 2. `rescale < 0` scales the baseline to unit length, `rescale > 0`
    ///    scales by `1 / rescale`, zero leaves the size alone;
    /// 3. (3D, three points) rotate about Y so the baseline lies in the XY plane;
    /// 4. rotate about Z so the baseline lies on +X;
    /// 5. (3D, three points) rotate about X so point 3 lies in the XY plane
    ///    with positive Y.
    ///
    /// Each angle is the arccosine of an in-plane ratio, negated when the
    /// out-of-plane component is negative.
    pub fn bookstein(&mut self, baseline: &[usize], rescale: Real) -> Result<(), ShapeError> {
        let baseline = Baseline::from_one_based(baseline)?;
        baseline.validate_for(self.len())?;

        let [i1, i2, i3] = baseline.alignment_points();
        let p1 = Baseline::point(self, i1)?;
        let p2 = Baseline::point(self, i2)?;
        let length = (p2 - p1).norm();
        if length <= LENGTH_EPS {
            return Err(ShapeError::ZeroLengthBaseline);
        }

        self.translate(-(p1 + p2) * 0.5);
        if rescale < 0.0 {
            self.scale_by(1.0 / length);
        } else if rescale > 0.0 {
            self.scale_by(1.0 / rescale);
        }

        let three_point = self.dimension().is_3d() && i3 != i1;

        if three_point {
            let v = self.baseline_vector(i1, i2)?;
            if let Some(theta) = signed_angle(v.x, v.z) {
                self.rotate_3d(theta, Axis::Y);
            }
        }

        let v = self.baseline_vector(i1, i2)?;
        if let Some(theta) = signed_angle(v.x, v.y) {
            self.rotate_3d(theta, Axis::Z);
        }

        if three_point {
            let p3 = Baseline::point(self, i3)?;
            if let Some(theta) = signed_angle(p3.y, p3.z) {
                self.rotate_3d(theta, Axis::X);
            }
        }
        Ok(())
    }

    fn baseline_vector(&self, from: usize, to: usize) -> Result<Vec3, ShapeError> {
        Ok(Baseline::point(self, to)? - Baseline::point(self, from)?)
    }
}

/// `acos(a / |(a, b)|)`, negated when `b < 0`; `None` for a zero vector.
fn signed_angle(a: Real, b: Real) -> Option<Real> {
    let length = a.hypot(b);
    if length <= LENGTH_EPS {
        return None;
    }
    let theta = (a / length).clamp(-1.0, 1.0).acos();
    Some(if b < 0.0 { -theta } else { theta })
}
