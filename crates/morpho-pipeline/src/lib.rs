//! Collection-level superimposition.
//!
//! Brings a set of landmark configurations into a common frame:
//!
//! - [`procrustes`]: Generalized Procrustes Analysis,
//! - [`resistant_fit`]: repeated-median resistant fit,
//! - [`ShapeCollection::bookstein_registration`] and
//!   [`ShapeCollection::align_to_baseline`]: baseline registrations,
//! - [`run`]: JSON-facing dispatcher over a [`Dataset`] and
//!   [`SuperimpositionConfig`].
//!
//! # Example
//!
//! ```
//! use morpho_core::Shape;
//! use morpho_pipeline::{ProcrustesOptions, ShapeCollection, procrustes};
//!
//! let a = Shape::from_xy(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);
//! let mut b = a.clone();
//! b.rotate_2d(0.5);
//! b.scale_by(2.0);
//!
//! let mut collection = ShapeCollection::new(vec![a, b]);
//! let report = procrustes(&mut collection, &ProcrustesOptions::default()).unwrap();
//! assert_eq!(report.shapes.len(), 2);
//! ```

mod collection;
mod config;
mod dataset;
mod error;
mod procrustes;
mod resistant;

pub use collection::*;
pub use config::*;
pub use dataset::*;
pub use error::*;
pub use procrustes::*;
pub use resistant::*;
