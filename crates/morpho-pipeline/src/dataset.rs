//! Dataset input document and the top-level run dispatcher.

use anyhow::{Context, Result, ensure};
use log::info;
use morpho_core::{Baseline, Dimension, Real, Shape};
use serde::{Deserialize, Serialize};

use crate::{
    Method, ShapeCollection, SuperimpositionConfig, SuperimpositionReport, procrustes,
    resistant_fit,
};

/// One specimen of a dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Specimen {
    pub name: String,
    /// Coordinate rows; a row of `null`s marks a missing landmark.
    pub landmarks: Vec<Vec<Option<Real>>>,
    /// Physical units per coordinate unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Real>,
}

/// Input document: specimens sharing a landmark count and dimensionality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub name: String,
    pub dimension: Dimension,
    /// One-based baseline indices (2 or 3), used by the registration methods.
    #[serde(default)]
    pub baseline: Vec<usize>,
    pub specimens: Vec<Specimen>,
}

impl Dataset {
    /// Build a validated collection from the specimens.
    pub fn to_collection(&self) -> Result<ShapeCollection> {
        ensure!(!self.specimens.is_empty(), "dataset '{}' has no specimens", self.name);
        let expected = self.specimens[0].landmarks.len();

        let mut collection = ShapeCollection::default();
        for specimen in &self.specimens {
            ensure!(
                specimen.landmarks.len() == expected,
                "specimen '{}' has {} landmarks, expected {}",
                specimen.name,
                specimen.landmarks.len(),
                expected
            );
            let shape = Shape::from_rows(self.dimension, &specimen.landmarks)
                .with_context(|| format!("specimen '{}'", specimen.name))?;
            let shape = match specimen.scale {
                Some(scale) => shape
                    .with_scale(scale)
                    .with_context(|| format!("specimen '{}'", specimen.name))?,
                None => shape,
            };
            collection.push(shape);
        }
        Ok(collection)
    }

    /// Parsed baseline, checked against the landmark count.
    pub fn parsed_baseline(&self) -> Result<Baseline> {
        let baseline = Baseline::from_one_based(&self.baseline)
            .with_context(|| format!("dataset '{}' baseline {:?}", self.name, self.baseline))?;
        if let Some(first) = self.specimens.first() {
            baseline.validate_for(first.landmarks.len())?;
        }
        Ok(baseline)
    }
}

/// Run the configured superimposition method on a dataset.
pub fn run(dataset: &Dataset, config: &SuperimpositionConfig) -> Result<SuperimpositionReport> {
    let mut collection = dataset.to_collection()?;
    info!(
        "running {:?} on '{}' ({} specimens)",
        config.method,
        dataset.name,
        collection.len()
    );

    let report = match config.method {
        Method::Procrustes => procrustes(&mut collection, &config.procrustes)?,
        Method::ResistantFit => resistant_fit(&mut collection, &config.resistant_fit)?,
        Method::Bookstein | Method::Baseline => {
            let baseline = dataset.parsed_baseline()?.to_one_based();
            let centroid_sizes = collection.centroid_sizes();
            if config.method == Method::Bookstein {
                collection.bookstein_registration(&baseline, config.bookstein.rescale)?;
            } else {
                collection.align_to_baseline(&baseline)?;
            }
            let consensus = collection
                .average_shape()
                .context("collection is empty")?;
            SuperimpositionReport {
                method: config.method,
                iterations: 0,
                consensus,
                shapes: collection.into_shapes(),
                centroid_sizes,
            }
        }
    };
    Ok(report)
}
