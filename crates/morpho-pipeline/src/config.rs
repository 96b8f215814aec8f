//! Run configuration and the report document.

use morpho_core::{Real, Shape};
use serde::{Deserialize, Serialize};

/// Superimposition method selected for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Generalized Procrustes Analysis.
    #[default]
    Procrustes,
    /// Repeated-median resistant fit.
    ResistantFit,
    /// Bookstein registration on the dataset baseline.
    Bookstein,
    /// Rotation-only alignment to the dataset baseline.
    Baseline,
}

/// Options for Generalized Procrustes Analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcrustesOptions {
    /// Cap on consensus iterations before reporting non-convergence.
    pub max_iters: usize,
    /// Convergence threshold on the distance between successive consensus shapes.
    pub tolerance: Real,
    /// Fill missing landmarks from the final consensus.
    pub impute_missing: bool,
}

impl Default for ProcrustesOptions {
    fn default() -> Self {
        Self {
            max_iters: 1000,
            tolerance: 1e-10,
            impute_missing: false,
        }
    }
}

/// Options for the resistant fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResistantFitOptions {
    pub max_iters: usize,
    pub tolerance: Real,
}

impl Default for ResistantFitOptions {
    fn default() -> Self {
        Self {
            max_iters: 1000,
            tolerance: 1e-10,
        }
    }
}

/// Options for Bookstein registration.
///
/// `rescale < 0` scales every baseline to unit length, `rescale > 0` divides
/// coordinates by `rescale`, zero keeps the original size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BooksteinOptions {
    pub rescale: Real,
}

impl Default for BooksteinOptions {
    fn default() -> Self {
        Self { rescale: -1.0 }
    }
}

/// Full run configuration, usually loaded from JSON.
///
/// # Example
///
/// ```
/// use morpho_pipeline::{Method, SuperimpositionConfig};
///
/// let config: SuperimpositionConfig =
///     serde_json::from_str(r#"{ "method": "resistant_fit" }"#).unwrap();
/// assert_eq!(config.method, Method::ResistantFit);
/// assert_eq!(config.resistant_fit.max_iters, 1000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SuperimpositionConfig {
    pub method: Method,
    pub procrustes: ProcrustesOptions,
    pub resistant_fit: ResistantFitOptions,
    pub bookstein: BooksteinOptions,
}

/// Result of a superimposition run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuperimpositionReport {
    pub method: Method,
    /// Fitting passes performed before convergence (0 for registrations).
    pub iterations: usize,
    /// Final consensus shape.
    pub consensus: Shape,
    /// Superimposed shapes, in input order.
    pub shapes: Vec<Shape>,
    /// Centroid size of each input shape before superimposition.
    pub centroid_sizes: Vec<Real>,
}
