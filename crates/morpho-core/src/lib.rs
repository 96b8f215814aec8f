//! Core data model and per-shape geometry for `morpho-rs`.
//!
//! This crate provides the foundational building blocks used by all other
//! crates in the workspace:
//!
//! - linear algebra type aliases (`Real`, `Vec3`, `Mat3`, ...) and rotation
//!   builders (elementary, Rodrigues, direction-to-direction),
//! - the landmark data model ([`Landmark`], [`Dimension`], [`Shape`]) with
//!   explicit missing landmarks,
//! - per-shape primitives: centroid, centroid size, translation, scaling,
//!   rotation, homogeneous transforms,
//! - baseline registration ([`Shape::align_to_baseline`], [`Shape::bookstein`]).
//!
//! # Example
//!
//! ```
//! use morpho_core::{Shape, Vec3};
//!
//! let mut shape = Shape::from_xy(&[[0.0, 0.0], [2.0, 0.0], [1.0, 1.0]]);
//! shape.bookstein(&[1, 2], -1.0).unwrap();
//!
//! let p1 = shape.landmarks()[0].coords().unwrap();
//! assert!((p1 - Vec3::new(-0.5, 0.0, 0.0)).norm() < 1e-12);
//! ```

/// Baseline point selection.
mod baseline;
/// Shape construction and registration errors.
mod error;
/// Landmarks and dimensionality.
mod landmark;
/// Linear algebra type aliases and rotation helpers.
mod math;
/// Baseline alignment and Bookstein registration.
mod registration;
/// Specimen shapes, centroid and centroid size.
mod shape;
/// Deterministic synthetic data generation helpers.
///
/// Used in workspace tests; also handy for benchmarking.
pub mod synthetic;
/// Translation, scaling and rotation primitives.
mod transform;

pub use baseline::*;
pub use error::*;
pub use landmark::*;
pub use math::*;
pub use shape::*;
