//! Resistant-fit superimposition.
//!
//! A robust alternative to GPA: scale and rotation of each shape against the
//! consensus come from two-level repeated medians over landmark pairs rather
//! than from least squares, so a minority of wild landmarks cannot drag the
//! fit.
//!
//! The first consensus fixes the orientation of the run: later consensus
//! shapes are rotated back onto it before they are compared or used as the
//! fitting reference.
//!
//! # References
//!
//! F. J. Rohlf and D. Slice, "Extensions of the Procrustes method for the
//! optimal superimposition of landmarks", Systematic Zoology 39 (1990).
//! A. F. Siegel and R. H. Benson, "A robust comparison of biological shapes",
//! Biometrics 38 (1982).

use log::{debug, info, warn};
use morpho_core::{Dimension, LENGTH_EPS, Real, Shape, Vec3};
use morpho_linear::{RotationError, basis_alignment, optimal_rotation, repeated_median};

use crate::{
    Method, ResistantFitOptions, ShapeCollection, SuperimpositionError, SuperimpositionReport,
    same_shape,
};

/// Run the resistant fit in place on `collection`.
///
/// Shapes are centred (not rescaled); each pass recomputes the consensus,
/// rescales it to unit centroid size, orients it onto the first pass's
/// consensus and fits every shape to it. Stops when two successive consensus
/// shapes agree within the tolerance.
pub fn resistant_fit(
    collection: &mut ShapeCollection,
    opts: &ResistantFitOptions,
) -> Result<SuperimpositionReport, SuperimpositionError> {
    collection.validate()?;
    let centroid_sizes = collection.centroid_sizes();

    for shape in collection.shapes_mut() {
        shape.move_to_center();
    }

    let mut anchor: Option<Shape> = None;
    let mut previous: Option<Shape> = None;
    for pass in 0..=opts.max_iters {
        let mut consensus = collection
            .average_shape()
            .ok_or(SuperimpositionError::EmptyCollection)?;
        consensus.rescale_to_unit_size();
        let anchor = anchor.get_or_insert_with(|| consensus.clone());
        let r = optimal_rotation(anchor, &consensus)
            .map_err(SuperimpositionError::ConsensusRotation)?;
        consensus.apply_rotation_matrix(&r);

        if same_shape(previous.as_ref(), &consensus, opts.tolerance) {
            info!("resistant fit converged after {pass} passes");
            return Ok(SuperimpositionReport {
                method: Method::ResistantFit,
                iterations: pass,
                consensus,
                shapes: collection.shapes().to_vec(),
                centroid_sizes,
            });
        }
        if pass == opts.max_iters {
            break;
        }

        debug!("resistant fit pass {pass}");
        for (idx, shape) in collection.shapes_mut().iter_mut().enumerate() {
            fit_shape(&consensus, shape, idx)?;
        }
        previous = Some(consensus);
    }

    warn!(
        "resistant fit did not converge within {} iterations",
        opts.max_iters
    );
    Err(SuperimpositionError::NonConvergence {
        iterations: opts.max_iters,
    })
}

/// Scale then rotate `shape` onto `reference` with repeated medians.
///
/// The shape is first posed onto the reference by least squares; the
/// repeated-median pair then sets the final rotation. The result depends only
/// on the shape's form, not on the pose it arrived in, so refitting an already
/// fitted shape leaves it where it is.
fn fit_shape(
    reference: &Shape,
    shape: &mut Shape,
    idx: usize,
) -> Result<(), SuperimpositionError> {
    let ref_points = points(reference);
    let ratios = pairwise(&ref_points, &points(shape), |r, t| {
        let (dr, dt) = (r.norm(), t.norm());
        (dr > LENGTH_EPS && dt > LENGTH_EPS).then(|| dr / dt)
    });
    match repeated_median(&ratios) {
        Some(m) => shape.scale_by(m.value),
        None => warn!("shape {idx}: no usable landmark pair for scale; left unscaled"),
    }

    match optimal_rotation(reference, shape) {
        Ok(r) => shape.apply_rotation_matrix(&r),
        Err(RotationError::NoCorrespondences) => {
            warn!("shape {idx} shares no landmark with the consensus; not rotated");
            return Ok(());
        }
        Err(source) => return Err(SuperimpositionError::Rotation { shape: idx, source }),
    }

    let dimension = shape.dimension();
    let tgt_points = points(shape);
    let angles = pairwise(&ref_points, &tgt_points, |r, t| pair_angle(r, t, dimension));
    let Some(m) = repeated_median(&angles) else {
        warn!("shape {idx}: no usable landmark pair for rotation; left at least-squares pose");
        return Ok(());
    };
    if let (Some(vr), Some(vt)) = (
        pair_vector(&ref_points, m.row, m.col),
        pair_vector(&tgt_points, m.row, m.col),
    ) {
        shape.apply_rotation_matrix(&basis_alignment(&vr, &vt, dimension));
    }
    Ok(())
}

/// Angle carrying `t` onto `r`: signed in 2D, where aligning the chosen pair
/// turns the shape by exactly the median angle, unsigned in 3D.
fn pair_angle(r: &Vec3, t: &Vec3, dimension: Dimension) -> Option<Real> {
    let denom = r.norm() * t.norm();
    if denom <= LENGTH_EPS {
        return None;
    }
    if dimension.is_3d() {
        Some((r.dot(t) / denom).clamp(-1.0, 1.0).acos())
    } else {
        Some((t.x * r.y - t.y * r.x).atan2(t.dot(r)))
    }
}

fn points(shape: &Shape) -> Vec<Option<Vec3>> {
    shape.landmarks().iter().map(|lm| lm.coords().copied()).collect()
}

fn pair_vector(points: &[Option<Vec3>], i: usize, j: usize) -> Option<Vec3> {
    Some(points.get(i).copied()?? - points.get(j).copied()??)
}

/// Statistic over every ordered landmark pair `(i, j)`, `i != j`, computed
/// from the difference vectors `p_i - p_j` of reference and target.
fn pairwise(
    reference: &[Option<Vec3>],
    target: &[Option<Vec3>],
    stat: impl Fn(&Vec3, &Vec3) -> Option<Real>,
) -> Vec<Vec<Option<Real>>> {
    let n = reference.len().min(target.len());
    (0..n)
        .map(|i| {
            (0..n)
                .map(|j| {
                    if i == j {
                        return None;
                    }
                    stat(&pair_vector(reference, i, j)?, &pair_vector(target, i, j)?)
                })
                .collect()
        })
        .collect()
}
