//! Baseline point selection.

use crate::{Shape, ShapeError, Vec3};

/// Two or three distinct landmark indices defining a registration frame.
///
/// Indices are stored zero-based; the external contract (datasets, CLI,
/// [`Shape::align_to_baseline`], [`Shape::bookstein`]) is one-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Baseline {
    first: usize,
    second: usize,
    third: Option<usize>,
}

impl Baseline {
    /// Parse one-based indices (2 or 3 of them).
    pub fn from_one_based(indices: &[usize]) -> Result<Self, ShapeError> {
        if !(2..=3).contains(&indices.len()) {
            return Err(ShapeError::BaselineCount(indices.len()));
        }
        if indices.contains(&0) {
            return Err(ShapeError::ZeroBaselineIndex);
        }
        let first = indices[0] - 1;
        let second = indices[1] - 1;
        let third = indices.get(2).map(|idx| idx - 1);

        if first == second || third.is_some_and(|t| t == first || t == second) {
            return Err(ShapeError::DuplicateBaselinePoint);
        }
        Ok(Self {
            first,
            second,
            third,
        })
    }

    /// The three alignment points; a two-point baseline repeats the first.
    pub fn alignment_points(&self) -> [usize; 3] {
        [self.first, self.second, self.third.unwrap_or(self.first)]
    }

    pub fn to_one_based(&self) -> Vec<usize> {
        let mut out = vec![self.first + 1, self.second + 1];
        out.extend(self.third.map(|t| t + 1));
        out
    }

    /// Check every index against a landmark count.
    pub fn validate_for(&self, len: usize) -> Result<(), ShapeError> {
        for idx in self.to_one_based() {
            if idx > len {
                return Err(ShapeError::BaselineOutOfRange { index: idx, len });
            }
        }
        Ok(())
    }

    /// Coordinates of a baseline landmark (zero-based `index`).
    pub(crate) fn point(shape: &Shape, index: usize) -> Result<Vec3, ShapeError> {
        shape
            .landmark(index)
            .ok_or(ShapeError::BaselineOutOfRange {
                index: index + 1,
                len: shape.len(),
            })?
            .coords()
            .copied()
            .ok_or(ShapeError::MissingBaselineLandmark(index + 1))
    }
}
