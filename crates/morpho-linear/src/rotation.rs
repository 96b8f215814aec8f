//! Least-squares optimal rotation between two configurations (Kabsch).
//!
//! Given corresponding, centred points `r_i` (reference) and `t_i` (target),
//! the rotation `R` minimising `Σ |r_i - R t_i|²` follows from the SVD of the
//! cross-covariance `H = Σ r_i t_iᵀ = U S Vᵀ` as `R = U Vᵀ`. When
//! `det(U) det(Vᵀ) < 0` the unconstrained optimum is a reflection; flipping
//! the column of `U` paired with the smallest singular value gives the best
//! proper rotation instead.
//!
//! It has to be the column. With `R = U D Vᵀ` the fitted objective is
//! `tr(Rᵀ H) = Σ d_k s_k`, so negating column `k` costs exactly `2 s_k` and
//! the smallest `s_k` is the cheapest. Negating a row of `U` also restores
//! `det R = +1`, but it spreads the sign change over every singular value
//! (`Σ s_k (1 - 2 U_jk²)` for row `j`) and generally lands on a worse fit.
//!
//! # References
//!
//! W. Kabsch, "A solution for the best rotation to relate two sets of
//! vectors", Acta Cryst. A32 (1976).

use log::trace;
use morpho_core::{Dimension, Mat2, Mat3, Shape, Vec3};
use thiserror::Error;

/// Errors from rotation estimation.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RotationError {
    /// The configurations do not have the same number of landmarks.
    #[error("configurations have different lengths: {0} vs {1}")]
    LengthMismatch(usize, usize),
    /// No landmark is present in both configurations.
    #[error("no landmark is present in both configurations")]
    NoCorrespondences,
    /// SVD did not produce `U`/`Vᵀ`.
    #[error("svd failed during rotation estimation")]
    SvdFailed,
}

/// Closed-form optimal-rotation solver.
#[derive(Debug, Clone, Copy)]
pub struct RotationSolver;

/// Rotation `R` such that `R · target` best matches `reference`.
///
/// Landmarks missing on either side are left out of the fit. 2D shapes are
/// solved with a 2×2 block embedded into the returned 3×3 matrix.
pub fn optimal_rotation(reference: &Shape, target: &Shape) -> Result<Mat3, RotationError> {
    RotationSolver::between_shapes(reference, target)
}

impl RotationSolver {
    /// Optimal rotation between two shapes, skipping missing correspondences.
    pub fn between_shapes(reference: &Shape, target: &Shape) -> Result<Mat3, RotationError> {
        if reference.len() != target.len() {
            return Err(RotationError::LengthMismatch(reference.len(), target.len()));
        }
        let (refs, tgts): (Vec<Vec3>, Vec<Vec3>) = reference
            .landmarks()
            .iter()
            .zip(target.landmarks())
            .filter_map(|(r, t)| Some((*r.coords()?, *t.coords()?)))
            .unzip();
        trace!(
            "rotation fit on {} of {} landmarks",
            refs.len(),
            reference.len()
        );
        Self::from_points(&refs, &tgts, target.dimension())
    }

    /// Optimal rotation between two complete point sets.
    pub fn from_points(
        reference: &[Vec3],
        target: &[Vec3],
        dimension: Dimension,
    ) -> Result<Mat3, RotationError> {
        if reference.len() != target.len() {
            return Err(RotationError::LengthMismatch(reference.len(), target.len()));
        }
        if reference.is_empty() {
            return Err(RotationError::NoCorrespondences);
        }
        match dimension {
            Dimension::Three => kabsch_3d(reference, target),
            Dimension::Two => {
                let r2 = kabsch_2d(reference, target)?;
                let mut r = Mat3::identity();
                r.fixed_view_mut::<2, 2>(0, 0).copy_from(&r2);
                Ok(r)
            }
        }
    }
}

fn kabsch_3d(reference: &[Vec3], target: &[Vec3]) -> Result<Mat3, RotationError> {
    let mut h = Mat3::zeros();
    for (r, t) in reference.iter().zip(target) {
        h += r * t.transpose();
    }

    let svd = h.svd(true, true);
    let mut u = svd.u.ok_or(RotationError::SvdFailed)?;
    let v_t = svd.v_t.ok_or(RotationError::SvdFailed)?;
    if u.determinant() * v_t.determinant() < 0.0 {
        u.column_mut(2).neg_mut();
    }
    Ok(u * v_t)
}

fn kabsch_2d(reference: &[Vec3], target: &[Vec3]) -> Result<Mat2, RotationError> {
    let mut h = Mat2::zeros();
    for (r, t) in reference.iter().zip(target) {
        h += r.xy() * t.xy().transpose();
    }

    let svd = h.svd(true, true);
    let mut u = svd.u.ok_or(RotationError::SvdFailed)?;
    let v_t = svd.v_t.ok_or(RotationError::SvdFailed)?;
    if u.determinant() * v_t.determinant() < 0.0 {
        u.column_mut(1).neg_mut();
    }
    Ok(u * v_t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use morpho_core::{Landmark, rodrigues};

    fn tetra() -> Shape {
        let mut s = Shape::from_xyz(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 2.0, 0.0],
            [0.0, 0.0, 3.0],
            [1.0, 1.0, 1.0],
        ]);
        s.move_to_center();
        s
    }

    #[test]
    fn self_rotation_is_identity() {
        let s = tetra();
        let r = optimal_rotation(&s, &s).unwrap();
        assert_abs_diff_eq!(r, Mat3::identity(), epsilon = 1e-10);

        let flat = Shape::from_xy(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);
        let r = optimal_rotation(&flat, &flat).unwrap();
        assert_abs_diff_eq!(r, Mat3::identity(), epsilon = 1e-10);
    }

    #[test]
    fn recovers_known_rotation() {
        let reference = tetra();
        let rot = rodrigues(&Vec3::new(1.0, -2.0, 0.5).normalize(), 1.1);
        let mut target = reference.clone();
        target.apply_rotation_matrix(&rot.transpose());

        let r = optimal_rotation(&reference, &target).unwrap();
        assert_abs_diff_eq!(r, rot, epsilon = 1e-10);
    }

    #[test]
    fn mirrored_configuration_yields_proper_rotation() {
        let reference = tetra();
        let mut mirrored = reference.clone();
        let flip = Mat3::new(-1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0);
        mirrored.apply_rotation_matrix(&flip);

        let r = optimal_rotation(&reference, &mirrored).unwrap();
        assert_abs_diff_eq!(r.determinant(), 1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(r * r.transpose(), Mat3::identity(), epsilon = 1e-10);

        let tri = Shape::from_xy(&[[0.0, 0.0], [2.0, 0.0], [0.0, 1.0]]);
        let mut tri_mirrored = tri.clone();
        tri_mirrored.apply_rotation_matrix(&flip);
        let r = optimal_rotation(&tri, &tri_mirrored).unwrap();
        assert_abs_diff_eq!(r.determinant(), 1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(r[(2, 2)], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn reflection_fix_is_the_best_proper_rotation() {
        let mut reference = Shape::from_xy(&[[0.0, 0.0], [3.0, 0.0], [0.0, 1.0], [1.0, 2.0]]);
        reference.move_to_center();
        let mut mirrored = reference.clone();
        mirrored.apply_rotation_matrix(&Mat3::new(1.0, 0.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0, 1.0));
        mirrored.rotate_2d(0.7);

        let residual = |r: &Mat3| -> f64 {
            reference
                .landmarks()
                .iter()
                .zip(mirrored.landmarks())
                .map(|(a, b)| (a.coords().unwrap() - r * b.coords().unwrap()).norm_squared())
                .sum()
        };
        let fitted = residual(&optimal_rotation(&reference, &mirrored).unwrap());
        let scanned = (0..3600)
            .map(|k| residual(&rodrigues(&Vec3::z(), k as f64 * std::f64::consts::TAU / 3600.0)))
            .fold(f64::INFINITY, f64::min);
        assert!(fitted <= scanned + 1e-9, "fitted {fitted} vs scanned {scanned}");
    }

    #[test]
    fn missing_landmarks_are_skipped() {
        let reference = tetra();
        let rot = rodrigues(&Vec3::z(), 0.4);
        let mut target = reference.clone();
        target.apply_rotation_matrix(&rot.transpose());
        target.set_landmark(4, Landmark::Missing);

        let r = optimal_rotation(&reference, &target).unwrap();
        assert_abs_diff_eq!(r, rot, epsilon = 1e-10);
    }

    #[test]
    fn rejects_mismatched_or_empty_input() {
        let a = Shape::from_xy(&[[0.0, 0.0], [1.0, 0.0]]);
        let b = Shape::from_xy(&[[0.0, 0.0]]);
        assert_eq!(
            optimal_rotation(&a, &b),
            Err(RotationError::LengthMismatch(2, 1))
        );
        assert_eq!(
            RotationSolver::from_points(&[], &[], Dimension::Two),
            Err(RotationError::NoCorrespondences)
        );
    }
}
