//! Deterministic synthetic specimens for tests, examples and benchmarks.
//!
//! All randomness comes from a seeded `StdRng`, so a given seed always
//! produces the same dataset.

use crate::{Dimension, Real, Shape, Vec3, rodrigues};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Regular polygon with `n` vertices on a circle of `radius` (2D).
pub fn regular_polygon(n: usize, radius: Real) -> Shape {
    let points: Vec<[Real; 2]> = (0..n)
        .map(|k| {
            let t = 2.0 * std::f64::consts::PI * k as Real / n as Real;
            [radius * t.cos(), radius * t.sin()]
        })
        .collect();
    Shape::from_xy(&points)
}

/// Options for [`similarity_copies`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CopyOptions {
    /// Seed of the pseudo-random stream.
    pub seed: u64,
    /// Maximum absolute rotation angle (radians).
    pub max_angle: Real,
    /// Scale factors are drawn from `[1 / max_scale, max_scale]`.
    pub max_scale: Real,
    /// Maximum absolute translation per axis.
    pub max_shift: Real,
    /// Maximum absolute per-coordinate landmark jitter.
    pub jitter: Real,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            max_angle: std::f64::consts::PI,
            max_scale: 2.0,
            max_shift: 10.0,
            jitter: 0.0,
        }
    }
}

/// Randomly rotated, scaled, translated and jittered copies of `base`.
///
/// 2D copies rotate about Z; 3D copies about a random axis. Missing
/// landmarks of `base` stay missing.
pub fn similarity_copies(base: &Shape, count: usize, opts: &CopyOptions) -> Vec<Shape> {
    let mut rng = StdRng::seed_from_u64(opts.seed);
    let max_scale = opts.max_scale.max(1.0);

    (0..count)
        .map(|_| {
            let mut shape = base.clone();
            let angle = rng.random_range(-opts.max_angle..=opts.max_angle);
            match base.dimension() {
                Dimension::Two => shape.rotate_2d(angle),
                Dimension::Three => {
                    let axis = Vec3::new(
                        rng.random_range(-1.0..=1.0),
                        rng.random_range(-1.0..=1.0),
                        rng.random_range(-1.0..=1.0),
                    );
                    let axis = axis.try_normalize(1e-6).unwrap_or_else(Vec3::z);
                    shape.apply_rotation_matrix(&rodrigues(&axis, angle));
                }
            }
            shape.scale_by(rng.random_range(1.0 / max_scale..=max_scale));

            let shift = Vec3::new(
                rng.random_range(-opts.max_shift..=opts.max_shift),
                rng.random_range(-opts.max_shift..=opts.max_shift),
                rng.random_range(-opts.max_shift..=opts.max_shift),
            );
            shape.translate(shift);

            if opts.jitter > 0.0 {
                for idx in 0..shape.len() {
                    if let Some(p) = shape.landmark(idx).and_then(|lm| lm.coords()).copied() {
                        let noise = Vec3::new(
                            rng.random_range(-opts.jitter..=opts.jitter),
                            rng.random_range(-opts.jitter..=opts.jitter),
                            rng.random_range(-opts.jitter..=opts.jitter),
                        );
                        shape.set_landmark(idx, crate::Landmark::Present(p + noise));
                    }
                }
            }
            shape
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn copies_are_deterministic_and_similar() {
        let base = regular_polygon(5, 1.0);
        let opts = CopyOptions {
            seed: 7,
            ..Default::default()
        };
        let a = similarity_copies(&base, 3, &opts);
        let b = similarity_copies(&base, 3, &opts);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.landmarks(), y.landmarks());
        }
        // without jitter every copy keeps the polygon's proportions
        let ratio = a[0].centroid_size(true) / a[1].centroid_size(true);
        let d0 = (a[0].landmarks()[0].coords().unwrap() - a[0].landmarks()[1].coords().unwrap()).norm();
        let d1 = (a[1].landmarks()[0].coords().unwrap() - a[1].landmarks()[1].coords().unwrap()).norm();
        assert_abs_diff_eq!(d0 / d1, ratio, epsilon = 1e-10);
    }
}
