//! Specimen shape: ordered landmarks plus an optional physical scale.

use std::cell::Cell;

use crate::{Dimension, Landmark, Real, ShapeError, Vec3};
use serde::{Deserialize, Serialize};

/// One specimen's ordered landmark configuration.
///
/// The landmark count and [`Dimension`] are fixed at construction. An
/// optional positive `scale` (physical units per coordinate unit) converts
/// [`Shape::centroid_size`] into physical units.
///
/// The raw centroid size is cached after the first computation and the cache
/// is dropped by every mutating operation. The cache uses interior
/// mutability, so a `Shape` must not be shared between concurrent runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ShapeRecord", into = "ShapeRecord")]
pub struct Shape {
    landmarks: Vec<Landmark>,
    dimension: Dimension,
    scale: Option<Real>,
    centroid_size: Cell<Option<Real>>,
}

/// Serialized form of a [`Shape`].
///
/// Landmarks are coordinate rows; a row of `null`s is a missing landmark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeRecord {
    pub dimension: Dimension,
    pub landmarks: Vec<Vec<Option<Real>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Real>,
}

impl TryFrom<ShapeRecord> for Shape {
    type Error = ShapeError;

    fn try_from(record: ShapeRecord) -> Result<Self, Self::Error> {
        let shape = Shape::from_rows(record.dimension, &record.landmarks)?;
        match record.scale {
            Some(scale) => shape.with_scale(scale),
            None => Ok(shape),
        }
    }
}

impl From<Shape> for ShapeRecord {
    fn from(shape: Shape) -> Self {
        ShapeRecord {
            dimension: shape.dimension,
            landmarks: shape.to_rows(),
            scale: shape.scale,
        }
    }
}

impl Shape {
    /// Build a shape from landmarks; 2D landmarks get `z` forced to zero.
    pub fn new(dimension: Dimension, mut landmarks: Vec<Landmark>) -> Self {
        if !dimension.is_3d() {
            for lm in &mut landmarks {
                if let Landmark::Present(p) = lm {
                    p.z = 0.0;
                }
            }
        }
        Self {
            landmarks,
            dimension,
            scale: None,
            centroid_size: Cell::new(None),
        }
    }

    /// Build a shape from coordinate rows, `None` marking missing components.
    pub fn from_rows(dimension: Dimension, rows: &[Vec<Option<Real>>]) -> Result<Self, ShapeError> {
        let landmarks = rows
            .iter()
            .enumerate()
            .map(|(idx, row)| Landmark::from_row(row, dimension, idx))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(dimension, landmarks))
    }

    /// Build a complete 2D shape.
    pub fn from_xy(points: &[[Real; 2]]) -> Self {
        Self::new(
            Dimension::Two,
            points.iter().map(|p| Landmark::xy(p[0], p[1])).collect(),
        )
    }

    /// Build a complete 3D shape.
    pub fn from_xyz(points: &[[Real; 3]]) -> Self {
        Self::new(
            Dimension::Three,
            points.iter().map(|p| Landmark::xyz(p[0], p[1], p[2])).collect(),
        )
    }

    /// Attach a physical scale factor (units per coordinate unit).
    pub fn with_scale(mut self, scale: Real) -> Result<Self, ShapeError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(ShapeError::InvalidScale(scale));
        }
        self.scale = Some(scale);
        Ok(self)
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn scale(&self) -> Option<Real> {
        self.scale
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    pub fn landmark(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }

    /// Replace one landmark. Out-of-range indices are ignored.
    pub fn set_landmark(&mut self, index: usize, landmark: Landmark) {
        if let Some(slot) = self.landmarks.get_mut(index) {
            *slot = match landmark {
                Landmark::Present(mut p) if !self.dimension.is_3d() => {
                    p.z = 0.0;
                    Landmark::Present(p)
                }
                other => other,
            };
            self.invalidate();
        }
    }

    /// Total number of landmark slots, missing ones included.
    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// Number of landmarks, optionally excluding missing ones.
    pub fn count_landmarks(&self, exclude_missing: bool) -> usize {
        if exclude_missing {
            self.present().count()
        } else {
            self.landmarks.len()
        }
    }

    pub fn has_missing(&self) -> bool {
        self.landmarks.iter().any(Landmark::is_missing)
    }

    /// Iterate over `(index, coords)` of present landmarks.
    pub fn present(&self) -> impl Iterator<Item = (usize, &Vec3)> + '_ {
        self.landmarks
            .iter()
            .enumerate()
            .filter_map(|(idx, lm)| lm.coords().map(|p| (idx, p)))
    }

    /// Coordinate rows, `None` for missing components.
    pub fn to_rows(&self) -> Vec<Vec<Option<Real>>> {
        self.landmarks
            .iter()
            .map(|lm| lm.to_row(self.dimension))
            .collect()
    }

    /// Mean of present landmarks; the zero vector if none are present.
    pub fn centroid(&self) -> Vec3 {
        let mut sum = Vec3::zeros();
        let mut count = 0usize;
        for (_, p) in self.present() {
            sum += p;
            count += 1;
        }
        if count == 0 {
            return Vec3::zeros();
        }
        sum / count as Real
    }

    /// Centroid size, in physical units when a scale factor is attached.
    ///
    /// Returns `-1` when no landmark is present and `1` for a single present
    /// landmark. Otherwise the value is computed once and cached until the
    /// geometry changes or `refresh` is requested.
    pub fn centroid_size(&self, refresh: bool) -> Real {
        let raw = self.raw_centroid_size(refresh);
        match self.scale {
            Some(scale) if raw > 0.0 => raw / scale,
            _ => raw,
        }
    }

    /// Centroid size in coordinate units, ignoring the scale factor.
    pub fn raw_centroid_size(&self, refresh: bool) -> Real {
        let present = self.count_landmarks(true);
        if present == 0 {
            return -1.0;
        }
        if present == 1 {
            return 1.0;
        }
        if !refresh {
            if let Some(size) = self.centroid_size.get() {
                return size;
            }
        }

        let c = self.centroid();
        let size = self
            .present()
            .map(|(_, p)| (p - c).norm_squared())
            .sum::<Real>()
            .sqrt();
        self.centroid_size.set(Some(size));
        size
    }

    /// Per-axis `(min, max)` over present landmarks.
    pub fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        let mut points = self.present().map(|(_, p)| *p);
        let first = points.next()?;
        Some(points.fold((first, first), |(lo, hi), p| (lo.inf(&p), hi.sup(&p))))
    }

    pub(crate) fn landmarks_mut(&mut self) -> &mut [Landmark] {
        self.invalidate();
        &mut self.landmarks
    }

    pub(crate) fn invalidate(&self) {
        self.centroid_size.set(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn square_with_gap() -> Shape {
        Shape::new(
            Dimension::Two,
            vec![Landmark::xy(0.0, 0.0), Landmark::Missing, Landmark::xy(2.0, 2.0)],
        )
    }

    #[test]
    fn centroid_ignores_missing_landmarks() {
        let c = square_with_gap().centroid();
        assert_abs_diff_eq!(c, Vec3::new(1.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn centroid_of_empty_shape_is_origin() {
        let shape = Shape::new(Dimension::Three, Vec::new());
        assert_eq!(shape.centroid(), Vec3::zeros());
    }

    #[test]
    fn centroid_size_sentinels() {
        let empty = Shape::new(Dimension::Two, Vec::new());
        assert_eq!(empty.centroid_size(false), -1.0);

        let single = Shape::from_xy(&[[5.0, 10.0]]);
        assert_eq!(single.centroid_size(false), 1.0);

        let only_missing = Shape::new(Dimension::Two, vec![Landmark::Missing]);
        assert_eq!(only_missing.centroid_size(true), -1.0);
    }

    #[test]
    fn centroid_size_of_unit_square() {
        let shape = Shape::from_xy(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
        // four corners at distance sqrt(0.5) from the centre
        assert_abs_diff_eq!(shape.centroid_size(false), 2.0_f64.sqrt(), epsilon = 1e-12);
        assert_eq!(shape.centroid_size(false), shape.centroid_size(true));
    }

    #[test]
    fn centroid_size_divides_by_scale() {
        let shape = Shape::from_xy(&[[0.0, 0.0], [10.0, 0.0], [0.0, 10.0], [10.0, 10.0]])
            .with_scale(10.0)
            .unwrap();
        assert_abs_diff_eq!(shape.centroid_size(true), 2.0_f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(shape.raw_centroid_size(true), 10.0 * 2.0_f64.sqrt(), epsilon = 1e-12);
        assert!(Shape::from_xy(&[[0.0, 0.0]]).with_scale(0.0).is_err());
    }

    #[test]
    fn counts_and_bounding_box() {
        let shape = square_with_gap();
        assert_eq!(shape.count_landmarks(true), 2);
        assert_eq!(shape.count_landmarks(false), 3);
        assert!(shape.has_missing());

        let (lo, hi) = shape.bounding_box().unwrap();
        assert_eq!(lo, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(hi, Vec3::new(2.0, 2.0, 0.0));
    }

    #[test]
    fn serde_roundtrip_keeps_missing_rows() {
        let shape = square_with_gap().with_scale(2.0).unwrap();
        let json = serde_json::to_string(&shape).unwrap();
        assert!(json.contains("[null,null]"));

        let back: Shape = serde_json::from_str(&json).unwrap();
        assert_eq!(back.landmarks(), shape.landmarks());
        assert_eq!(back.scale(), Some(2.0));

        let partial = r#"{"dimension":2,"landmarks":[[1.0,null]]}"#;
        assert!(serde_json::from_str::<Shape>(partial).is_err());
    }
}
