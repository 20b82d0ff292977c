//! The ribbon: a garland helix wound around the tree.
//!
//! Its particles never morph individually. The whole group eases a uniform
//! scale toward 1 (aggregate) or 2 (scatter) and turns steadily regardless
//! of mode.

use crate::buffers::PointCloud;
use crate::config::{MorphConfig, RibbonConfig, TreeConfig};
use crate::formation::{helix_point, HelixShape};
use crate::mode::Mode;
use crate::morph::ease;
use crate::spawn::Sampler;

#[derive(Debug, Clone)]
pub struct Ribbon {
    cloud: PointCloud,
    scale: f32,
    rotation_y: f32,
    config: RibbonConfig,
}

impl Ribbon {
    /// Generate the helix around a tree of the given shape.
    pub fn generate(sampler: &mut Sampler, config: &RibbonConfig, tree: &TreeConfig) -> Self {
        let shape = HelixShape {
            height: tree.height,
            base_radius: tree.base_radius,
            offset: config.offset,
            turns: config.turns,
            spread: config.spread,
        };

        let mut cloud = PointCloud::with_capacity(config.count);
        for i in 0..config.count {
            let p = helix_point(sampler, &shape, i, config.count);
            cloud.push(p, config.color, config.size);
        }
        log::debug!("ribbon: {} particles over {} turns", config.count, config.turns);

        Self {
            cloud,
            scale: config.aggregate_scale,
            rotation_y: 0.0,
            config: config.clone(),
        }
    }

    /// Ease the scale toward the mode's target and set the spin for `elapsed`.
    pub fn update(&mut self, mode: Mode, elapsed: f32, delta: f32, morph: &MorphConfig) {
        let target = match mode {
            Mode::Aggregate => self.config.aggregate_scale,
            Mode::Scatter => self.config.scatter_scale,
        };
        self.scale = ease(self.scale, target, morph.smoothing.factor(delta));
        self.rotation_y = self.config.spin_rate * elapsed;
    }

    #[inline]
    pub fn cloud(&self) -> &PointCloud {
        &self.cloud
    }

    /// Current uniform scale.
    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[inline]
    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    #[inline]
    pub fn point_size(&self) -> f32 {
        self.config.point_size
    }

    #[inline]
    pub fn opacity(&self) -> f32 {
        self.config.opacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ribbon() -> Ribbon {
        Ribbon::generate(
            &mut Sampler::seeded(1),
            &RibbonConfig::default(),
            &TreeConfig::default(),
        )
    }

    #[test]
    fn test_generate() {
        let r = ribbon();
        assert_eq!(r.cloud().len(), 2000);
        assert!(r.cloud().is_consistent());
        assert_eq!(r.scale(), 1.0);
        for p in r.cloud().iter_positions() {
            assert!(p.y > -0.2 && p.y < 8.2);
            let radius = (p.x * p.x + p.z * p.z).sqrt();
            assert!(radius < 3.7 + 0.2);
        }
    }

    #[test]
    fn test_scale_eases_toward_mode_target() {
        let morph = MorphConfig::default();
        let mut r = ribbon();
        r.update(Mode::Scatter, 0.0, 1.0 / 60.0, &morph);
        assert!((r.scale() - 1.05).abs() < 1e-6);
        for i in 0..400 {
            r.update(Mode::Scatter, i as f32 / 60.0, 1.0 / 60.0, &morph);
        }
        assert!((r.scale() - 2.0).abs() < 1e-3);
        let before = r.scale();
        r.update(Mode::Aggregate, 7.0, 1.0 / 60.0, &morph);
        assert!(r.scale() < before);
    }

    #[test]
    fn test_spin_ignores_mode() {
        let morph = MorphConfig::default();
        let mut r = ribbon();
        r.update(Mode::Scatter, 10.0, 1.0 / 60.0, &morph);
        assert!((r.rotation_y() + 1.0).abs() < 1e-6);
        r.update(Mode::Aggregate, 20.0, 1.0 / 60.0, &morph);
        assert!((r.rotation_y() + 2.0).abs() < 1e-6);
    }
}
