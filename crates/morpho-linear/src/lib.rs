//! Closed-form solvers used by the superimposition algorithms.
//!
//! - [`optimal_rotation`]: SVD-based least-squares rotation (Kabsch),
//! - [`basis_alignment`]: rotation taking one direction onto another via
//!   elementary Y/Z rotations,
//! - [`median_index`] / [`repeated_median`]: the median selection rule and
//!   two-level repeated median used by the resistant fit.

mod basis;
mod median;
mod rotation;

pub use basis::*;
pub use median::*;
pub use rotation::*;
