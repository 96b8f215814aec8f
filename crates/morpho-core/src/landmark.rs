//! Landmark coordinates and dataset dimensionality.

use crate::{Real, ShapeError, Vec3};
use serde::{Deserialize, Serialize};

/// Dimensionality shared by every shape of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Dimension {
    Two,
    Three,
}

impl Dimension {
    /// Build from a coordinate count (2 or 3).
    pub fn from_count(count: usize) -> Result<Self, ShapeError> {
        match count {
            2 => Ok(Dimension::Two),
            3 => Ok(Dimension::Three),
            other => Err(ShapeError::InvalidDimension(other)),
        }
    }

    /// Number of coordinates per landmark.
    pub fn count(self) -> usize {
        match self {
            Dimension::Two => 2,
            Dimension::Three => 3,
        }
    }

    pub fn is_3d(self) -> bool {
        self == Dimension::Three
    }
}

impl TryFrom<u8> for Dimension {
    type Error = ShapeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Dimension::from_count(value as usize)
    }
}

impl From<Dimension> for u8 {
    fn from(dim: Dimension) -> Self {
        dim.count() as u8
    }
}

/// One landmark of a specimen.
///
/// A landmark is either fully measured or fully missing; there is no
/// partially-missing state. 2D landmarks are stored with `z == 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Landmark {
    Present(Vec3),
    Missing,
}

impl Landmark {
    pub fn xy(x: Real, y: Real) -> Self {
        Landmark::Present(Vec3::new(x, y, 0.0))
    }

    pub fn xyz(x: Real, y: Real, z: Real) -> Self {
        Landmark::Present(Vec3::new(x, y, z))
    }

    /// Coordinates, or `None` for a missing landmark.
    pub fn coords(&self) -> Option<&Vec3> {
        match self {
            Landmark::Present(p) => Some(p),
            Landmark::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Landmark::Missing)
    }

    /// Parse a coordinate row where `None` marks a missing component.
    ///
    /// All components must be present, or all missing. `index` is only used
    /// for error reporting.
    pub fn from_row(
        row: &[Option<Real>],
        dimension: Dimension,
        index: usize,
    ) -> Result<Self, ShapeError> {
        if row.len() != dimension.count() {
            return Err(ShapeError::ArityMismatch {
                index,
                got: row.len(),
                expected: dimension.count(),
            });
        }
        if row.iter().all(Option::is_none) {
            return Ok(Landmark::Missing);
        }
        let values: Option<Vec<Real>> = row.iter().copied().collect();
        let values = values.ok_or(ShapeError::PartialMissing(index))?;
        let z = if dimension.is_3d() { values[2] } else { 0.0 };
        Ok(Landmark::Present(Vec3::new(values[0], values[1], z)))
    }

    /// Inverse of [`Landmark::from_row`].
    pub fn to_row(&self, dimension: Dimension) -> Vec<Option<Real>> {
        match self {
            Landmark::Present(p) => p.iter().take(dimension.count()).map(|&v| Some(v)).collect(),
            Landmark::Missing => vec![None; dimension.count()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_parsing_accepts_full_and_missing_rows() {
        let lm = Landmark::from_row(&[Some(1.0), Some(2.0)], Dimension::Two, 0).unwrap();
        assert_eq!(lm, Landmark::xy(1.0, 2.0));

        let lm = Landmark::from_row(&[None, None, None], Dimension::Three, 4).unwrap();
        assert!(lm.is_missing());
        assert_eq!(lm.to_row(Dimension::Three), vec![None, None, None]);
    }

    #[test]
    fn row_parsing_rejects_partial_and_wrong_arity() {
        assert_eq!(
            Landmark::from_row(&[Some(1.0), None], Dimension::Two, 3),
            Err(ShapeError::PartialMissing(3))
        );
        assert_eq!(
            Landmark::from_row(&[Some(1.0), Some(2.0)], Dimension::Three, 1),
            Err(ShapeError::ArityMismatch {
                index: 1,
                got: 2,
                expected: 3
            })
        );
    }

    #[test]
    fn dimension_roundtrips_through_count() {
        assert_eq!(Dimension::try_from(3u8).unwrap(), Dimension::Three);
        assert_eq!(u8::from(Dimension::Two), 2);
        assert!(Dimension::from_count(4).is_err());
    }
}
