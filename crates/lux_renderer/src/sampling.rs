//! Random direction and point sampling.
//!
//! All warps take uniform numbers in [0, 1) so callers decide where the
//! randomness comes from. Local directions are Z-up.

use std::f64::consts::PI;

use lux_math::{DVec2, DVec3, EPSILON};
use rand::{Rng, RngCore};

/// Density of [`uniform_hemisphere`] in solid angle.
pub const UNIFORM_HEMISPHERE_PDF: f64 = 0.5 / PI;

/// Density of [`uniform_sphere`] in solid angle.
pub const UNIFORM_SPHERE_PDF: f64 = 0.25 / PI;

/// Draw a uniform number in [0, 1).
#[inline]
pub fn gen_f64(rng: &mut dyn RngCore) -> f64 {
    rng.gen::<f64>()
}

/// Uniformly distributed direction on the +Z hemisphere.
pub fn uniform_hemisphere(u1: f64, u2: f64) -> DVec3 {
    let z = (1.0 - 2.0 * u1).abs();
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * PI * u2;
    DVec3::new(r * phi.cos(), r * phi.sin(), z)
}

/// Uniformly distributed direction on the unit sphere.
pub fn uniform_sphere(u1: f64, u2: f64) -> DVec3 {
    let z = 1.0 - 2.0 * u1;
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * PI * u2;
    DVec3::new(r * phi.cos(), r * phi.sin(), z)
}

/// Uniformly distributed point in the unit disk.
pub fn uniform_disk(u1: f64, u2: f64) -> DVec2 {
    let r = u1.sqrt();
    let theta = 2.0 * PI * u2;
    DVec2::new(r * theta.cos(), r * theta.sin())
}

/// Barycentric coordinates `(b0, b1, b2)` of a uniformly distributed point on a triangle.
pub fn uniform_triangle(u1: f64, u2: f64) -> (f64, f64, f64) {
    let su = u1.sqrt();
    (1.0 - su, su * (1.0 - u2), su * u2)
}

/// Piecewise-constant discrete distribution.
///
/// Used to pick mesh triangles proportionally to their area. When every
/// weight is (close to) zero the distribution falls back to uniform.
#[derive(Debug, Clone)]
pub struct Distribution1D {
    func: Vec<f64>,
    cdf: Vec<f64>,
    func_sum: f64,
}

impl Distribution1D {
    /// Build a distribution from non-negative weights.
    pub fn new(weights: Vec<f64>) -> Self {
        let n = weights.len();

        let mut cdf = Vec::with_capacity(n + 1);
        cdf.push(0.0);
        for (i, w) in weights.iter().enumerate() {
            cdf.push(cdf[i] + w.max(0.0));
        }

        let func_sum = cdf[n];
        if func_sum <= EPSILON * EPSILON {
            for (i, c) in cdf.iter_mut().enumerate().skip(1) {
                *c = i as f64 / n as f64;
            }
        } else {
            for c in cdf.iter_mut().skip(1) {
                *c /= func_sum;
            }
        }

        Self {
            func: weights,
            cdf,
            func_sum,
        }
    }

    pub fn count(&self) -> usize {
        self.func.len()
    }

    pub fn is_empty(&self) -> bool {
        self.func.is_empty()
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.func_sum
    }

    /// Pick an index for a uniform number `u` in [0, 1).
    ///
    /// Returns the index and its probability mass. Must not be called on an
    /// empty distribution.
    pub fn sample_discrete(&self, u: f64) -> (usize, f64) {
        // Last CDF entry <= u, skipping zero-width segments
        let offset = self
            .cdf
            .partition_point(|&c| c <= u)
            .saturating_sub(1)
            .min(self.count().saturating_sub(1));
        (offset, self.discrete_pdf(offset))
    }

    /// Probability mass of `index`.
    pub fn discrete_pdf(&self, index: usize) -> f64 {
        self.cdf[index + 1] - self.cdf[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_hemisphere_directions_are_unit_and_up() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            let d = uniform_hemisphere(gen_f64(&mut rng), gen_f64(&mut rng));
            assert!((d.length() - 1.0).abs() < 1e-9);
            assert!(d.z >= 0.0);
        }
    }

    #[test]
    fn test_hemisphere_is_uniform_in_cos_theta() {
        // Uniform on the hemisphere means cos(theta) is uniform on [0, 1]
        let mut rng = StdRng::seed_from_u64(2);
        let n = 20_000;
        let mean_z: f64 = (0..n)
            .map(|_| uniform_hemisphere(gen_f64(&mut rng), gen_f64(&mut rng)).z)
            .sum::<f64>()
            / n as f64;
        assert!((mean_z - 0.5).abs() < 0.01, "mean z = {}", mean_z);
    }

    #[test]
    fn test_sphere_directions_are_balanced() {
        let mut rng = StdRng::seed_from_u64(3);
        let n = 20_000;
        let mean: DVec3 = (0..n)
            .map(|_| uniform_sphere(gen_f64(&mut rng), gen_f64(&mut rng)))
            .sum::<DVec3>()
            / n as f64;
        assert!(mean.length() < 0.02, "mean = {:?}", mean);
    }

    #[test]
    fn test_disk_points_inside() {
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..1000 {
            assert!(uniform_disk(gen_f64(&mut rng), gen_f64(&mut rng)).length() <= 1.0);
        }
    }

    #[test]
    fn test_triangle_barycentrics_sum_to_one() {
        let (b0, b1, b2) = uniform_triangle(0.3, 0.7);
        assert!((b0 + b1 + b2 - 1.0).abs() < 1e-12);
        assert!(b0 >= 0.0 && b1 >= 0.0 && b2 >= 0.0);
    }

    #[test]
    fn test_distribution_follows_weights() {
        let dist = Distribution1D::new(vec![1.0, 0.0, 3.0]);
        assert_eq!(dist.count(), 3);
        assert_eq!(dist.total(), 4.0);
        assert!((dist.discrete_pdf(0) - 0.25).abs() < 1e-12);
        assert_eq!(dist.discrete_pdf(1), 0.0);
        assert!((dist.discrete_pdf(2) - 0.75).abs() < 1e-12);

        assert_eq!(dist.sample_discrete(0.0).0, 0);
        assert_eq!(dist.sample_discrete(0.2).0, 0);
        // The zero-weight bucket is never chosen
        assert_eq!(dist.sample_discrete(0.25).0, 2);
        let (index, pmf) = dist.sample_discrete(0.99);
        assert_eq!(index, 2);
        assert!((pmf - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_distribution_zero_weights_fall_back_to_uniform() {
        let dist = Distribution1D::new(vec![0.0; 4]);
        for i in 0..4 {
            assert!((dist.discrete_pdf(i) - 0.25).abs() < 1e-12);
        }
        assert_eq!(dist.sample_discrete(0.6).0, 2);
    }

    #[test]
    fn test_distribution_sampling_frequencies() {
        let dist = Distribution1D::new(vec![2.0, 1.0, 1.0]);
        let mut rng = StdRng::seed_from_u64(5);
        let mut counts = [0usize; 3];
        let n = 40_000;
        for _ in 0..n {
            counts[dist.sample_discrete(gen_f64(&mut rng)).0] += 1;
        }
        assert!((counts[0] as f64 / n as f64 - 0.5).abs() < 0.01);
        assert!((counts[1] as f64 / n as f64 - 0.25).abs() < 0.01);
    }
}
