//! Shape collections and the consensus helpers shared by every algorithm.

use log::debug;
use morpho_core::{Baseline, Dimension, Landmark, Real, Shape, Vec3};

use crate::SuperimpositionError;

/// An ordered set of specimens sharing landmark count and dimensionality.
///
/// The invariant is not enforced on construction; every collection-level
/// operation checks it through [`ShapeCollection::validate`] before it
/// touches any shape.
#[derive(Debug, Clone, Default)]
pub struct ShapeCollection {
    shapes: Vec<Shape>,
}

impl ShapeCollection {
    pub fn new(shapes: Vec<Shape>) -> Self {
        Self { shapes }
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shapes_mut(&mut self) -> &mut [Shape] {
        &mut self.shapes
    }

    pub fn into_shapes(self) -> Vec<Shape> {
        self.shapes
    }

    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Dimensionality of the first shape.
    pub fn dimension(&self) -> Option<Dimension> {
        self.shapes.first().map(Shape::dimension)
    }

    /// Check that every shape has the first shape's landmark count.
    ///
    /// Returns the shared count; an empty collection trivially passes with 0.
    pub fn check_landmark_counts(&self) -> Result<usize, SuperimpositionError> {
        let Some(expected) = self.shapes.first().map(Shape::len) else {
            return Ok(0);
        };
        for (shape, s) in self.shapes.iter().enumerate() {
            if s.len() != expected {
                return Err(SuperimpositionError::LandmarkCountMismatch {
                    shape,
                    got: s.len(),
                    expected,
                });
            }
        }
        Ok(expected)
    }

    /// Full precondition check: non-empty, one landmark count, one dimension.
    pub fn validate(&self) -> Result<(usize, Dimension), SuperimpositionError> {
        let expected = self
            .dimension()
            .ok_or(SuperimpositionError::EmptyCollection)?;
        let count = self.check_landmark_counts()?;
        for (shape, s) in self.shapes.iter().enumerate() {
            if s.dimension() != expected {
                return Err(SuperimpositionError::DimensionMismatch {
                    shape,
                    got: s.dimension(),
                    expected,
                });
            }
        }
        Ok((count, expected))
    }

    pub fn has_missing_landmarks(&self) -> bool {
        self.shapes.iter().any(Shape::has_missing)
    }

    /// Per-landmark mean over the shapes where that landmark is present.
    ///
    /// A landmark missing from every shape stays missing. `None` for an
    /// empty collection. Assumes a validated collection.
    pub fn average_shape(&self) -> Option<Shape> {
        let first = self.shapes.first()?;
        let landmarks = (0..first.len())
            .map(|idx| {
                let (sum, count) = self
                    .shapes
                    .iter()
                    .filter_map(|s| s.landmark(idx).and_then(Landmark::coords))
                    .fold((Vec3::zeros(), 0usize), |(sum, n), p| (sum + p, n + 1));
                if count == 0 {
                    Landmark::Missing
                } else {
                    Landmark::Present(sum / count as Real)
                }
            })
            .collect();
        Some(Shape::new(first.dimension(), landmarks))
    }

    /// Centroid size of every shape (physical units when scaled).
    pub fn centroid_sizes(&self) -> Vec<Real> {
        self.shapes.iter().map(|s| s.centroid_size(true)).collect()
    }

    /// Rotate every shape onto the canonical baseline axes.
    ///
    /// Shapes are processed on a copy; on error the collection is unchanged.
    pub fn align_to_baseline(&mut self, baseline: &[usize]) -> Result<(), SuperimpositionError> {
        self.register_each(baseline, |shape| shape.align_to_baseline(baseline))
    }

    /// Bookstein registration of every shape (see [`Shape::bookstein`]).
    ///
    /// Shapes are processed on a copy; on error the collection is unchanged.
    pub fn bookstein_registration(
        &mut self,
        baseline: &[usize],
        rescale: Real,
    ) -> Result<(), SuperimpositionError> {
        self.register_each(baseline, |shape| shape.bookstein(baseline, rescale))
    }

    /// Replace each missing landmark with the consensus landmark.
    ///
    /// Returns the number of landmarks filled in.
    pub fn impute_missing(&mut self, consensus: &Shape) -> usize {
        let mut filled = 0;
        for shape in &mut self.shapes {
            for idx in 0..shape.len() {
                if !shape.landmark(idx).is_some_and(Landmark::is_missing) {
                    continue;
                }
                if let Some(&lm) = consensus.landmark(idx).filter(|lm| !lm.is_missing()) {
                    shape.set_landmark(idx, lm);
                    filled += 1;
                }
            }
        }
        if filled > 0 {
            debug!("imputed {filled} missing landmarks from the consensus");
        }
        filled
    }

    fn register_each(
        &mut self,
        baseline: &[usize],
        mut register: impl FnMut(&mut Shape) -> Result<(), morpho_core::ShapeError>,
    ) -> Result<(), SuperimpositionError> {
        let (count, _) = self.validate()?;
        if baseline.len() >= 2 {
            Baseline::from_one_based(baseline)
                .and_then(|b| b.validate_for(count))
                .map_err(|source| SuperimpositionError::Shape { shape: 0, source })?;
        }

        let mut shapes = self.shapes.clone();
        for (idx, shape) in shapes.iter_mut().enumerate() {
            register(shape).map_err(|source| SuperimpositionError::Shape { shape: idx, source })?;
        }
        self.shapes = shapes;
        Ok(())
    }
}

impl From<Vec<Shape>> for ShapeCollection {
    fn from(shapes: Vec<Shape>) -> Self {
        Self::new(shapes)
    }
}

/// Root of the summed squared landmark differences between two shapes.
///
/// Landmarks missing on either side do not contribute. `None` when the
/// landmark counts differ.
pub fn shape_distance(a: &Shape, b: &Shape) -> Option<Real> {
    if a.len() != b.len() {
        return None;
    }
    let sum: Real = a
        .landmarks()
        .iter()
        .zip(b.landmarks())
        .filter_map(|(p, q)| Some((p.coords()? - q.coords()?).norm_squared()))
        .sum();
    Some(sum.sqrt())
}

/// Convergence test between successive consensus shapes.
///
/// `None` as the previous consensus never matches.
pub fn same_shape(previous: Option<&Shape>, current: &Shape, tolerance: Real) -> bool {
    previous
        .and_then(|prev| shape_distance(prev, current))
        .is_some_and(|d| d < tolerance)
}
