//! Ambient starfield: faint points on a distant spherical shell.

use crate::buffers::PointCloud;
use crate::config::StarfieldConfig;
use crate::formation::shell_point;
use crate::spawn::Sampler;
use glam::Vec3;

#[derive(Debug, Clone)]
pub struct Starfield {
    cloud: PointCloud,
    rotation: Vec3,
    config: StarfieldConfig,
}

impl Starfield {
    pub fn generate(sampler: &mut Sampler, config: &StarfieldConfig) -> Self {
        let mut cloud = PointCloud::with_capacity(config.count);
        for _ in 0..config.count {
            let p = shell_point(sampler, config.min_radius, config.thickness);
            let tint = *sampler.pick(&config.palette);
            let color = tint.scale(config.brightness.sample(sampler));
            cloud.push(p, color, config.size.sample(sampler));
        }
        log::debug!(
            "starfield: {} particles in r = [{}, {})",
            config.count,
            config.min_radius,
            config.min_radius + config.thickness
        );

        Self {
            cloud,
            rotation: Vec3::ZERO,
            config: config.clone(),
        }
    }

    /// Set the slow drift for time `elapsed`.
    pub fn update(&mut self, elapsed: f32) {
        self.rotation.y = self.config.spin_y * elapsed;
        self.rotation.z = self.config.spin_z * elapsed;
    }

    #[inline]
    pub fn cloud(&self) -> &PointCloud {
        &self.cloud
    }

    /// Euler rotation (radians) about X, Y and Z.
    #[inline]
    pub fn rotation(&self) -> Vec3 {
        self.rotation
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
