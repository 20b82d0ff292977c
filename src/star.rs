//! The star topper: a wireframe solid dusted with sparkling particles.
//!
//! Decoration particles are sampled along every edge of the [`StarFrame`].
//! Each carries a base size and a blink phase drawn once; per frame only the
//! rendered size changes, following a half-wave rectified sinusoid so a
//! particle flashes above its base size and never dims below it.

use crate::buffers::{LineBuffer, PointCloud};
use crate::config::StarConfig;
use crate::formation::{sample_edge, star_frame, StarFrame};
use crate::spawn::Sampler;
use std::f32::consts::TAU;

/// Angular frequency in rad/s of a tempo in beats per minute.
#[inline]
pub fn tempo_to_omega(bpm: f32) -> f32 {
    bpm / 60.0 * TAU
}

/// Rendered size of a decoration particle at time `t`.
///
/// `base * (1 + gain * max(0, sin(omega * t + phase)))`
#[inline]
pub fn blink_size(base: f32, phase: f32, t: f32, omega: f32, gain: f32) -> f32 {
    base * (1.0 + gain * (omega * t + phase).sin().max(0.0))
}

#[derive(Debug, Clone)]
pub struct Star {
    frame: StarFrame,
    wire: LineBuffer,
    cloud: PointCloud,
    base_sizes: Vec<f32>,
    phases: Vec<f32>,
    diamonds: Vec<bool>,
    omega: f32,
    rotation_y: f32,
    config: StarConfig,
}

impl Star {
    pub fn generate(sampler: &mut Sampler, config: &StarConfig) -> Self {
        let frame = star_frame(&config.shape());
        let segments: Vec<_> = frame.segments().collect();
        let wire = LineBuffer::from_segments(&segments);

        let mut cloud = PointCloud::default();
        let mut base_sizes = Vec::new();
        let mut phases = Vec::new();
        let mut diamonds = Vec::new();
        for &(a, b) in &segments {
            sample_edge(sampler, a, b, config.density, config.jitter, |s, p| {
                let diamond = s.chance(config.diamond_rate);
                let (color, size) = if diamond {
                    (config.diamond, config.diamond_size.sample(s))
                } else {
                    (config.gold, config.gold_size.sample(s))
                };
                cloud.push(p, color, size);
                base_sizes.push(size);
                phases.push(s.angle());
                diamonds.push(diamond);
            });
        }
        log::debug!(
            "star: {} edges, {} decoration particles",
            frame.edges.len(),
            cloud.len()
        );

        Self {
            frame,
            wire,
            cloud,
            base_sizes,
            phases,
            diamonds,
            omega: tempo_to_omega(config.blink_bpm),
            rotation_y: 0.0,
            config: config.clone(),
        }
    }

    /// Set spin and blink sizes for time `elapsed`.
    pub fn update(&mut self, elapsed: f32) {
        self.rotation_y = self.config.spin_rate * elapsed;
        let (omega, gain) = (self.omega, self.config.blink_gain);
        for ((size, &base), &phase) in self
            .cloud
            .sizes_mut()
            .iter_mut()
            .zip(&self.base_sizes)
            .zip(&self.phases)
        {
            *size = blink_size(base, phase, elapsed, omega, gain);
        }
    }

    #[inline]
    pub fn frame(&self) -> &StarFrame {
        &self.frame
    }

    /// Wireframe edges in the star's local space.
    #[inline]
    pub fn wire(&self) -> &LineBuffer {
        &self.wire
    }

    /// Decoration particles; sizes reflect the last update.
    #[inline]
    pub fn cloud(&self) -> &PointCloud {
        &self.cloud
    }

    #[inline]
    pub fn base_sizes(&self) -> &[f32] {
        &self.base_sizes
    }

    #[inline]
    pub fn phases(&self) -> &[f32] {
        &self.phases
    }

    /// Which decoration particles are diamonds (the accent category).
    #[inline]
    pub fn diamonds(&self) -> &[bool] {
        &self.diamonds
    }

    #[inline]
    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    #[inline]
    pub fn config(&self) -> &StarConfig {
        &self.config
    }
}
