//! Errors raised while building or registering shapes.

use crate::Real;
use thiserror::Error;

/// Errors that can occur when constructing a [`Shape`](crate::Shape) or
/// registering it against a baseline.
///
/// Baseline indices in messages are one-based, as supplied by the caller.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ShapeError {
    /// Dimensionality other than 2 or 3.
    #[error("unsupported dimension {0}, expected 2 or 3")]
    InvalidDimension(usize),
    /// A landmark row has the wrong number of coordinates.
    #[error("landmark {index} has {got} coordinates, expected {expected}")]
    ArityMismatch {
        index: usize,
        got: usize,
        expected: usize,
    },
    /// A landmark row mixes present and missing coordinates.
    #[error("landmark {0} is partially missing")]
    PartialMissing(usize),
    /// Physical scale factor that is not a positive finite number.
    #[error("scale factor must be positive and finite, got {0}")]
    InvalidScale(Real),
    /// Baseline with a point count other than 2 or 3.
    #[error("baseline needs 2 or 3 points, got {0}")]
    BaselineCount(usize),
    /// Baseline index of zero; indices count from one.
    #[error("baseline indices are one-based, got 0")]
    ZeroBaselineIndex,
    /// Baseline index outside `1..=len`.
    #[error("baseline point {index} is out of range for {len} landmarks")]
    BaselineOutOfRange { index: usize, len: usize },
    /// The same landmark was named twice in a baseline.
    #[error("baseline points must be distinct")]
    DuplicateBaselinePoint,
    /// A baseline point refers to a missing landmark.
    #[error("baseline point {0} refers to a missing landmark")]
    MissingBaselineLandmark(usize),
    /// The first two baseline points coincide.
    #[error("baseline has zero length")]
    ZeroLengthBaseline,
}
