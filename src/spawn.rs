//! Random sampling helpers shared by every generator.
//!
//! [`Sampler`] wraps a fast [`SmallRng`] and offers the handful of draws the
//! formations need, so generator code reads as geometry rather than RNG
//! plumbing:
//!
//! ```ignore
//! let mut s = Sampler::seeded(7);
//! let h = s.unit();                       // height fraction
//! let r = s.disk_radius((1.0 - h) * 3.5); // area-uniform radius
//! let dir = s.on_sphere(1.0);             // uniform direction
//! ```

use glam::Vec3;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Source of random draws for generation and stochastic per-frame effects.
#[derive(Debug, Clone)]
pub struct Sampler {
    rng: SmallRng,
}

impl Sampler {
    /// Sampler with a fixed seed. Same seed, same sequence.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Sampler seeded from OS entropy, different every session.
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Sampler for an optional seed: `Some` is reproducible, `None` is not.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    /// Split off an independent stream.
    ///
    /// The child is seeded from this sampler, so a seeded parent still gives
    /// reproducible children.
    pub fn fork(&mut self) -> Self {
        Self::seeded(self.rng.gen())
    }

    // ========== Scalars ==========

    /// Uniform in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Uniform in `[min, min + span)`.
    #[inline]
    pub fn span(&mut self, min: f32, span: f32) -> f32 {
        min + self.unit() * span
    }

    /// Uniform in `[-span/2, span/2)`: `(u - 0.5) * span`.
    #[inline]
    pub fn centered(&mut self, span: f32) -> f32 {
        (self.unit() - 0.5) * span
    }

    /// Uniform angle in `[0, 2π)`.
    #[inline]
    pub fn angle(&mut self) -> f32 {
        self.unit() * TAU
    }

    /// Bernoulli trial that succeeds with probability `p`.
    #[inline]
    pub fn chance(&mut self, p: f32) -> bool {
        self.unit() < p
    }

    // ========== Picks ==========

    /// Uniform pick from a non-empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.rng.gen_range(0..items.len())]
    }

    /// Index drawn from a weighted table.
    pub fn weighted(&mut self, table: &WeightedIndex<f32>) -> usize {
        table.sample(&mut self.rng)
    }

    // ========== Geometry ==========

    /// Radius for area-uniform sampling of a disk of radius `r_max`.
    ///
    /// `sqrt(u) * r_max`, so points do not bunch up at the centre.
    #[inline]
    pub fn disk_radius(&mut self, r_max: f32) -> f32 {
        self.unit().sqrt() * r_max
    }

    /// Uniformly distributed polar angle pair `(phi, theta)` on the sphere.
    ///
    /// `phi = acos(2u - 1)` avoids the clustering at the poles that a
    /// uniform `phi` would produce.
    pub fn sphere_angles(&mut self) -> (f32, f32) {
        let phi = (2.0 * self.unit() - 1.0).clamp(-1.0, 1.0).acos();
        let theta = self.angle();
        (phi, theta)
    }

    /// Point on a sphere of the given radius, uniform over the surface.
    pub fn on_sphere(&mut self, radius: f32) -> Vec3 {
        let (phi, theta) = self.sphere_angles();
        spherical(radius, phi, theta)
    }

    /// Point in the spherical shell `[r_min, r_min + thickness)`.
    pub fn in_shell(&mut self, r_min: f32, thickness: f32) -> Vec3 {
        let r = self.span(r_min, thickness);
        self.on_sphere(r)
    }

    /// Vector with every component uniform in `[-half_range, half_range)`.
    pub fn in_cube(&mut self, half_range: f32) -> Vec3 {
        Vec3::new(
            self.centered(2.0 * half_range),
            self.centered(2.0 * half_range),
            self.centered(2.0 * half_range),
        )
    }

    /// Small additive offset, each axis uniform in `[-span/2, span/2)`.
    pub fn jitter(&mut self, span: f32) -> Vec3 {
        Vec3::new(self.centered(span), self.centered(span), self.centered(span))
    }
}

/// Point from spherical coordinates, y-up.
///
/// `phi` is the polar angle from +Y, `theta` the azimuth around Y measured
/// from +Z.
pub fn spherical(radius: f32, phi: f32, theta: f32) -> Vec3 {
    let sin_phi = phi.sin();
    Vec3::new(
        radius * sin_phi * theta.sin(),
        radius * phi.cos(),
        radius * sin_phi * theta.cos(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = Sampler::seeded(42);
        let mut b = Sampler::seeded(42);
        for _ in 0..32 {
            assert_eq!(a.unit(), b.unit());
        }
    }

    #[test]
    fn test_fork_gives_distinct_streams() {
        let mut parent = Sampler::seeded(1);
        let mut a = parent.fork();
        let mut b = parent.fork();
        let same = (0..16).filter(|_| a.unit() == b.unit()).count();
        assert!(same < 16);
    }

    #[test]
    fn test_centered_range() {
        let mut s = Sampler::seeded(3);
        for _ in 0..1000 {
            let v = s.centered(0.02);
            assert!((-0.01..0.01).contains(&v));
        }
    }

    #[test]
    fn test_disk_radius_bounds() {
        let mut s = Sampler::seeded(5);
        for _ in 0..1000 {
            let r = s.disk_radius(2.0);
            assert!((0.0..=2.0).contains(&r));
        }
    }

    #[test]
    fn test_on_sphere_radius() {
        let mut s = Sampler::seeded(9);
        for _ in 0..500 {
            let p = s.on_sphere(3.0);
            assert!((p.length() - 3.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_on_sphere_is_not_polar_biased() {
        // For uniform-on-sphere, |y|/r is uniform on [0,1], so the polar caps
        // |y| > 0.9r should hold ~10% of the points.
        let mut s = Sampler::seeded(11);
        let n = 20_000;
        let caps = (0..n).filter(|_| s.on_sphere(1.0).y.abs() > 0.9).count();
        let frac = caps as f32 / n as f32;
        assert!((frac - 0.1).abs() < 0.015, "cap fraction {}", frac);
    }

    #[test]
    fn test_in_shell_band() {
        let mut s = Sampler::seeded(13);
        for _ in 0..1000 {
            let r = s.in_shell(45.0, 45.0).length();
            assert!(r >= 45.0 - 1e-3 && r < 90.0 + 1e-3);
        }
    }

    #[test]
    fn test_spherical_axes() {
        let up = spherical(2.0, 0.0, 0.0);
        assert!((up - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-5);
        let fwd = spherical(1.0, std::f32::consts::FRAC_PI_2, 0.0);
        assert!((fwd - Vec3::Z).length() < 1e-5);
    }
}
