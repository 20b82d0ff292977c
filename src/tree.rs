//! The tree: the primary morphing formation.

use crate::attributes::{AttributeSynthesizer, ColorCategory, Zone};
use crate::buffers::PointCloud;
use crate::config::{MorphConfig, TreeConfig};
use crate::error::ConfigError;
use crate::formation::{sample_cone, ConeShape};
use crate::mode::Mode;
use crate::morph::{scatter_multiplier, MorphSet};
use crate::scatter::scatter_vector;
use crate::spawn::Sampler;

/// Generation-time classification of one tree particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParticleTraits {
    pub zone: Zone,
    pub accent: bool,
    pub category: ColorCategory,
}

/// Cone of particles that eases between the tree and a scattered cloud.
#[derive(Debug, Clone)]
pub struct Tree {
    particles: MorphSet,
    traits: Vec<ParticleTraits>,
    rotation_y: f32,
    point_size: f32,
    opacity: f32,
}

impl Tree {
    /// Generate `config.count` particles.
    pub fn generate(sampler: &mut Sampler, config: &TreeConfig) -> Result<Self, ConfigError> {
        let shape = ConeShape {
            height: config.height,
            base_radius: config.base_radius,
            twist_per_unit_height: config.twist_per_unit_height,
        };
        let synth = AttributeSynthesizer::new(config)?;

        let mut particles = MorphSet::with_capacity(config.count);
        let mut traits = Vec::with_capacity(config.count);
        for _ in 0..config.count {
            let sample = sample_cone(sampler, &shape);
            let attrs = synth.synthesize(sampler, &sample);
            let scatter = scatter_vector(sampler, config.scatter_half_range);
            particles.push(sample.position, scatter, attrs.color, attrs.size);
            traits.push(ParticleTraits {
                zone: attrs.zone,
                accent: attrs.accent,
                category: attrs.category,
            });
        }

        let accents = traits.iter().filter(|t| t.accent).count();
        let shell = traits.iter().filter(|t| t.zone == Zone::OuterShell).count();
        log::debug!(
            "tree: {} particles, {} accents, {} on the outer shell",
            config.count,
            accents,
            shell
        );

        Ok(Self {
            particles,
            traits,
            rotation_y: 0.0,
            point_size: config.point_size,
            opacity: config.opacity,
        })
    }

    /// Advance one frame.
    ///
    /// The whole tree turns slowly about its axis while aggregated.
    pub fn update(&mut self, mode: Mode, elapsed: f32, delta: f32, morph: &MorphConfig) {
        let factor = morph.smoothing.factor(delta);
        let multiplier = scatter_multiplier(elapsed, morph);
        self.particles.step(mode, multiplier, factor);

        if mode == Mode::Aggregate {
            self.rotation_y +=
                morph.aggregate_spin * morph.smoothing.step_scale(delta, morph.reference_dt);
        }
    }

    #[inline]
    pub fn particles(&self) -> &MorphSet {
        &self.particles
    }

    #[inline]
    pub fn cloud(&self) -> &PointCloud {
        self.particles.cloud()
    }

    #[inline]
    pub fn traits(&self) -> &[ParticleTraits] {
        &self.traits
    }

    /// Accumulated spin about Y in radians.
    #[inline]
    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    #[inline]
    pub fn point_size(&self) -> f32 {
        self.point_size
    }

    #[inline]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_tree(seed: u64) -> Tree {
        let config = TreeConfig {
            count: 500,
            ..TreeConfig::default()
        };
        Tree::generate(&mut Sampler::seeded(seed), &config).unwrap()
    }

    #[test]
    fn test_generate_sizes() {
        let tree = small_tree(1);
        assert_eq!(tree.len(), 500);
        assert_eq!(tree.traits().len(), 500);
        assert!(tree.particles().is_consistent());
        assert_eq!(tree.cloud().positions().len(), 1500);
        assert_eq!(tree.cloud().colors().len(), 1500);
        assert_eq!(tree.cloud().sizes().len(), 500);
    }

    #[test]
    fn test_starts_on_base() {
        let tree = small_tree(2);
        for (i, base) in tree.particles().base().iter().enumerate() {
            assert_eq!(tree.particles().current(i), *base);
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = small_tree(9);
        let b = small_tree(9);
        assert_eq!(a.cloud().positions(), b.cloud().positions());
        assert_eq!(a.cloud().colors(), b.cloud().colors());
    }

    #[test]
    fn test_spin_only_while_aggregated() {
        let morph = MorphConfig::default();
        let mut tree = small_tree(3);
        tree.update(Mode::Aggregate, 0.0, 1.0 / 60.0, &morph);
        tree.update(Mode::Aggregate, 1.0 / 60.0, 1.0 / 60.0, &morph);
        assert!((tree.rotation_y() - 0.002).abs() < 1e-7);
        tree.update(Mode::Scatter, 2.0 / 60.0, 1.0 / 60.0, &morph);
        assert!((tree.rotation_y() - 0.002).abs() < 1e-7);
    }

    #[test]
    fn test_accent_sizes_are_larger() {
        let tree = small_tree(5);
        for (t, size) in tree.traits().iter().zip(tree.cloud().sizes()) {
            if t.accent {
                assert!(*size >= 1.5);
            } else {
                assert!(*size <= 1.2);
            }
        }
    }
}
