//! Per-particle scatter vectors.
//!
//! Drawn once at generation and reused every frame in scatter mode, so each
//! particle always flies out along the same direction.

use crate::spawn::Sampler;
use glam::Vec3;

/// One scatter vector, each component uniform in `[-half_range, half_range)`.
#[inline]
pub fn scatter_vector(sampler: &mut Sampler, half_range: f32) -> Vec3 {
    sampler.in_cube(half_range)
}

/// `count` scatter vectors.
pub fn scatter_vectors(sampler: &mut Sampler, count: usize, half_range: f32) -> Vec<Vec3> {
    (0..count).map(|_| scatter_vector(sampler, half_range)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_bounds() {
        let mut s = Sampler::seeded(6);
        let vectors = scatter_vectors(&mut s, 2000, 6.0);
        assert_eq!(vectors.len(), 2000);
        for v in &vectors {
            assert!(v.abs().max_element() <= 6.0);
        }
    }

    #[test]
    fn test_components_cover_range() {
        let mut s = Sampler::seeded(12);
        let vectors = scatter_vectors(&mut s, 5000, 6.0);
        let mean = vectors.iter().copied().sum::<Vec3>() / vectors.len() as f32;
        assert!(mean.abs().max_element() < 0.3);
        assert!(vectors.iter().any(|v| v.x > 5.5));
        assert!(vectors.iter().any(|v| v.x < -5.5));
    }
}
