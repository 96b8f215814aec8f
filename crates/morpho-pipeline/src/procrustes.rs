//! Generalized Procrustes Analysis.
//!
//! Every shape is centred and scaled to unit centroid size, then rotated
//! onto the running consensus until two successive consensus shapes agree
//! within the tolerance.

use log::{debug, info, warn};
use morpho_core::Shape;
use morpho_linear::{RotationError, optimal_rotation};

use crate::{
    Method, ProcrustesOptions, ShapeCollection, SuperimpositionError, SuperimpositionReport,
    same_shape, shape_distance,
};

/// Run GPA in place on `collection`.
///
/// Fails without touching any shape if the collection is empty or its shapes
/// disagree in landmark count or dimension. Missing landmarks are left out of
/// centroids, sizes, the consensus and the rotation fit.
pub fn procrustes(
    collection: &mut ShapeCollection,
    opts: &ProcrustesOptions,
) -> Result<SuperimpositionReport, SuperimpositionError> {
    collection.validate()?;
    let centroid_sizes = collection.centroid_sizes();

    for shape in collection.shapes_mut() {
        shape.move_to_center();
        shape.rescale_to_unit_size();
    }

    let mut previous: Option<Shape> = None;
    for pass in 0..=opts.max_iters {
        let consensus = collection
            .average_shape()
            .ok_or(SuperimpositionError::EmptyCollection)?;
        if same_shape(previous.as_ref(), &consensus, opts.tolerance) {
            info!("procrustes converged after {pass} passes");
            if opts.impute_missing {
                collection.impute_missing(&consensus);
            }
            return Ok(SuperimpositionReport {
                method: Method::Procrustes,
                iterations: pass,
                consensus,
                shapes: collection.shapes().to_vec(),
                centroid_sizes,
            });
        }
        if pass == opts.max_iters {
            break;
        }
        if let Some(prev) = &previous {
            debug!(
                "procrustes pass {pass}: consensus moved by {:.3e}",
                shape_distance(prev, &consensus).unwrap_or(f64::NAN)
            );
        }

        rotate_onto(collection, &consensus)?;
        previous = Some(consensus);
    }

    warn!(
        "procrustes did not converge within {} iterations",
        opts.max_iters
    );
    Err(SuperimpositionError::NonConvergence {
        iterations: opts.max_iters,
    })
}

fn rotate_onto(
    collection: &mut ShapeCollection,
    consensus: &Shape,
) -> Result<(), SuperimpositionError> {
    for (idx, shape) in collection.shapes_mut().iter_mut().enumerate() {
        match optimal_rotation(consensus, shape) {
            Ok(r) => shape.apply_rotation_matrix(&r),
            Err(RotationError::NoCorrespondences) => {
                warn!("shape {idx} shares no landmark with the consensus; not rotated");
            }
            Err(source) => return Err(SuperimpositionError::Rotation { shape: idx, source }),
        }
    }
    Ok(())
}
