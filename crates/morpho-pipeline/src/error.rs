use morpho_core::{Dimension, ShapeError};
use morpho_linear::RotationError;
use thiserror::Error;

/// Errors returned by collection-level superimposition.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SuperimpositionError {
    /// The collection holds no shapes.
    #[error("collection is empty")]
    EmptyCollection,
    /// A shape's landmark count differs from the first shape's.
    #[error("shape {shape} has {got} landmarks, expected {expected}")]
    LandmarkCountMismatch {
        shape: usize,
        got: usize,
        expected: usize,
    },
    /// A shape's dimensionality differs from the collection's.
    #[error("shape {shape} is {got:?}, collection is {expected:?}")]
    DimensionMismatch {
        shape: usize,
        got: Dimension,
        expected: Dimension,
    },
    /// The consensus loop hit its iteration cap.
    #[error("consensus did not converge within {iterations} iterations")]
    NonConvergence { iterations: usize },
    #[error("shape {shape}: {source}")]
    Shape {
        shape: usize,
        #[source]
        source: ShapeError,
    },
    #[error("shape {shape}: {source}")]
    Rotation {
        shape: usize,
        #[source]
        source: RotationError,
    },
    /// The consensus could not be oriented onto the first pass's consensus.
    #[error("consensus orientation: {0}")]
    ConsensusRotation(#[source] RotationError),
}

impl SuperimpositionError {
    /// `true` for invalid input detected before any shape was modified.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::EmptyCollection
                | Self::LandmarkCountMismatch { .. }
                | Self::DimensionMismatch { .. }
        )
    }
}
