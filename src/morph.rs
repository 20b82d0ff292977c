//! The morph state evolver.
//!
//! Every frame each tree particle eases its live position toward a target
//! chosen by the current [`Mode`]:
//!
//! - `Aggregate`: the base position.
//! - `Scatter`: `base + scatter ⊙ m(t)`, where each axis of `m(t)` is an
//!   independent sinusoid lifted by the scatter bias (`sin(0.5t) + 1.5`,
//!   `cos(0.3t) + 1.5`, `sin(0.7t) + 1.5` by default) so the cloud breathes
//!   between 0.5x and 2.5x of its scatter vectors and never folds back
//!   through the tree.
//!
//! The input is level-triggered: the target is recomputed from the mode on
//! every frame, so a missed update is absorbed by the next one.
//!
//! ## Smoothing
//!
//! [`Smoothing::PerFrame`] applies a fixed blend factor each frame, which is
//! frame-rate dependent. [`Smoothing::HalfLife`] derives the factor from the
//! frame delta so the easing looks the same at any frame rate.

use crate::buffers::PointCloud;
use crate::color::Rgb;
use crate::config::{finite, MorphConfig};
use crate::error::ConfigError;
use crate::mode::Mode;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// How far a value moves toward its target in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Smoothing {
    /// Fixed blend factor applied once per frame, regardless of delta time.
    PerFrame { factor: f32 },
    /// Distance to target halves every `seconds`.
    HalfLife { seconds: f32 },
}

impl Default for Smoothing {
    fn default() -> Self {
        Smoothing::PerFrame { factor: 0.05 }
    }
}

impl Smoothing {
    /// Half-life smoothing that matches `PerFrame { factor }` exactly when
    /// frames are `reference_dt` apart.
    ///
    /// At other frame rates the per-frame factor becomes
    /// `1 - (1 - factor)^(dt / reference_dt)`. Needs `0 < factor < 1` and a
    /// positive `reference_dt`; a factor of 1 snaps in one frame and has no
    /// half-life.
    pub fn matching(factor: f32, reference_dt: f32) -> Result<Smoothing, ConfigError> {
        finite("morph.smoothing.factor", factor)?;
        if factor <= 0.0 || factor >= 1.0 {
            return Err(ConfigError::OutOfRange {
                field: "morph.smoothing.factor",
                value: factor,
                expected: "0.0 < factor < 1.0",
            });
        }
        finite("morph.reference_dt", reference_dt)?;
        if reference_dt <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "morph.reference_dt",
                value: reference_dt,
                expected: "> 0.0",
            });
        }
        let smoothing = Smoothing::HalfLife {
            seconds: reference_dt * std::f32::consts::LN_2 / -(1.0 - factor).ln(),
        };
        // Factors within f32 rounding of 0 or 1 can still overflow or vanish
        smoothing.validate()?;
        Ok(smoothing)
    }

    /// Blend factor for a frame that took `dt` seconds.
    #[inline]
    pub fn factor(&self, dt: f32) -> f32 {
        match *self {
            Smoothing::PerFrame { factor } => factor,
            Smoothing::HalfLife { seconds } => 1.0 - 0.5f32.powf(dt.max(0.0) / seconds),
        }
    }

    /// Multiplier for per-frame increments such as the idle spin.
    ///
    /// Fixed-step smoothing keeps fixed-step increments; half-life smoothing
    /// scales them by `dt / reference_dt`.
    #[inline]
    pub fn step_scale(&self, dt: f32, reference_dt: f32) -> f32 {
        match self {
            Smoothing::PerFrame { .. } => 1.0,
            Smoothing::HalfLife { .. } => dt.max(0.0) / reference_dt,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            Smoothing::PerFrame { factor } => {
                finite("morph.smoothing.factor", factor)?;
                if factor <= 0.0 || factor > 1.0 {
                    return Err(ConfigError::OutOfRange {
                        field: "morph.smoothing.factor",
                        value: factor,
                        expected: "0.0 < factor <= 1.0",
                    });
                }
            }
            Smoothing::HalfLife { seconds } => {
                finite("morph.smoothing.seconds", seconds)?;
                if seconds <= 0.0 {
                    return Err(ConfigError::OutOfRange {
                        field: "morph.smoothing.seconds",
                        value: seconds,
                        expected: "> 0.0",
                    });
                }
            }
        }
        Ok(())
    }
}

/// Per-axis scatter multiplier at time `t`.
///
/// Computed once per frame and shared by every particle.
pub fn scatter_multiplier(t: f32, config: &MorphConfig) -> Vec3 {
    let [wx, wy, wz] = config.scatter_frequencies;
    Vec3::new((wx * t).sin(), (wy * t).cos(), (wz * t).sin()) + Vec3::splat(config.scatter_bias)
}

/// Target position of one particle.
#[inline]
pub fn target(mode: Mode, base: Vec3, scatter: Vec3, multiplier: Vec3) -> Vec3 {
    match mode {
        Mode::Aggregate => base,
        Mode::Scatter => base + scatter * multiplier,
    }
}

/// One exponential easing step.
#[inline]
pub fn ease<T>(current: T, target: T, factor: f32) -> T
where
    T: Copy + std::ops::Add<Output = T> + std::ops::Sub<Output = T> + std::ops::Mul<f32, Output = T>,
{
    current + (target - current) * factor
}

/// A morphing particle set.
///
/// Base positions and scatter vectors are fixed at generation; the live
/// positions are the `positions` buffer of the owned [`PointCloud`], which is
/// rewritten in place every frame.
#[derive(Debug, Clone, Default)]
pub struct MorphSet {
    base: Vec<Vec3>,
    scatter: Vec<Vec3>,
    cloud: PointCloud,
}

impl MorphSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            base: Vec::with_capacity(capacity),
            scatter: Vec::with_capacity(capacity),
            cloud: PointCloud::with_capacity(capacity),
        }
    }

    /// Add a particle. It starts at rest on its base position.
    pub fn push(&mut self, base: Vec3, scatter: Vec3, color: Rgb, size: f32) {
        self.base.push(base);
        self.scatter.push(scatter);
        self.cloud.push(base, color, size);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.base.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    #[inline]
    pub fn base(&self) -> &[Vec3] {
        &self.base
    }

    #[inline]
    pub fn scatter(&self) -> &[Vec3] {
        &self.scatter
    }

    /// Live buffers for rendering.
    #[inline]
    pub fn cloud(&self) -> &PointCloud {
        &self.cloud
    }

    /// Live position of particle `i`.
    #[inline]
    pub fn current(&self, i: usize) -> Vec3 {
        self.cloud.position(i)
    }

    /// Move every particle one step toward its target.
    pub fn step(&mut self, mode: Mode, multiplier: Vec3, factor: f32) {
        for (i, (&base, &scatter)) in self.base.iter().zip(&self.scatter).enumerate() {
            let goal = target(mode, base, scatter, multiplier);
            let next = ease(self.cloud.position(i), goal, factor);
            self.cloud.set_position(i, next);
        }
    }

    /// Parallel lengths hold for every buffer.
    pub fn is_consistent(&self) -> bool {
        self.scatter.len() == self.base.len()
            && self.cloud.len() == self.base.len()
            && self.cloud.is_consistent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(base: Vec3, scatter: Vec3) -> MorphSet {
        let mut set = MorphSet::with_capacity(1);
        set.push(base, scatter, Rgb::WHITE, 1.0);
        set
    }

    #[test]
    fn test_default_smoothing() {
        assert_eq!(Smoothing::default().factor(0.5), 0.05);
        assert!(Smoothing::default().validate().is_ok());
    }

    #[test]
    fn test_matching_half_life_agrees_at_reference_step() {
        let dt = 1.0 / 60.0;
        let s = Smoothing::matching(0.05, dt).unwrap();
        assert!((s.factor(dt) - 0.05).abs() < 1e-5);

        // Two half-steps move as far as one full step
        let half = s.factor(dt * 0.5);
        let combined = 1.0 - (1.0 - half) * (1.0 - half);
        assert!((combined - 0.05).abs() < 1e-5);

        // At 30 fps: 1 - 0.95^2
        assert!((s.factor(2.0 * dt) - (1.0 - 0.95f32 * 0.95)).abs() < 1e-5);
    }

    #[test]
    fn test_matching_range() {
        let dt = 1.0 / 60.0;
        for factor in [0.0, 1.0, -0.5, 1.5, f32::NAN] {
            assert!(
                matches!(
                    Smoothing::matching(factor, dt),
                    Err(ConfigError::OutOfRange { .. }) | Err(ConfigError::NotFinite(_))
                ),
                "factor {} accepted",
                factor
            );
        }
        assert!(Smoothing::matching(0.05, 0.0).is_err());

        // Near both ends the result is still a usable half-life
        for factor in [1e-6, 0.999] {
            let s = Smoothing::matching(factor, dt).unwrap();
            assert!(s.validate().is_ok());
            assert!((s.factor(dt) - factor).abs() < 1e-3);
        }
    }

    #[test]
    fn test_smoothing_validation() {
        assert!(Smoothing::PerFrame { factor: 0.0 }.validate().is_err());
        assert!(Smoothing::PerFrame { factor: 1.5 }.validate().is_err());
        assert!(Smoothing::PerFrame { factor: 1.0 }.validate().is_ok());
        assert!(Smoothing::HalfLife { seconds: 0.0 }.validate().is_err());
        assert!(Smoothing::HalfLife { seconds: f32::NAN }.validate().is_err());
    }

    #[test]
    fn test_smoothing_serde() {
        let json = serde_json::to_string(&Smoothing::HalfLife { seconds: 0.25 }).unwrap();
        assert_eq!(json, r#"{"half_life":{"seconds":0.25}}"#);
        let back: Smoothing = serde_json::from_str(r#"{"per_frame":{"factor":0.1}}"#).unwrap();
        assert_eq!(back, Smoothing::PerFrame { factor: 0.1 });
    }

    #[test]
    fn test_scatter_multiplier_bounds() {
        let config = MorphConfig::default();
        let m0 = scatter_multiplier(0.0, &config);
        assert_eq!(m0, Vec3::new(1.5, 2.5, 1.5));
        for i in 0..1000 {
            let m = scatter_multiplier(i as f32 * 0.1, &config);
            assert!(m.min_element() >= 0.5 - 1e-6);
            assert!(m.max_element() <= 2.5 + 1e-6);
        }
    }

    #[test]
    fn test_target_by_mode() {
        let base = Vec3::new(1.0, 2.0, 3.0);
        let scatter = Vec3::new(2.0, -2.0, 1.0);
        let m = Vec3::new(1.5, 2.5, 0.5);
        assert_eq!(target(Mode::Aggregate, base, scatter, m), base);
        assert_eq!(target(Mode::Scatter, base, scatter, m), Vec3::new(4.0, -3.0, 3.5));
    }

    #[test]
    fn test_step_eases_toward_target() {
        let mut set = single(Vec3::ZERO, Vec3::splat(2.0));
        set.step(Mode::Scatter, Vec3::ONE, 0.5);
        assert_eq!(set.current(0), Vec3::splat(1.0));
        set.step(Mode::Scatter, Vec3::ONE, 0.5);
        assert_eq!(set.current(0), Vec3::splat(1.5));
        set.step(Mode::Aggregate, Vec3::ONE, 0.5);
        assert_eq!(set.current(0), Vec3::splat(0.75));
    }

    #[test]
    fn test_ease_scalar() {
        assert!((ease(1.0f32, 2.0, 0.05) - 1.05).abs() < 1e-6);
        assert_eq!(ease(Vec3::ZERO, Vec3::ONE, 1.0), Vec3::ONE);
    }

    #[test]
    fn test_step_scale() {
        let dt = 1.0 / 60.0;
        assert_eq!(Smoothing::default().step_scale(dt * 2.0, dt), 1.0);
        let hl = Smoothing::matching(0.05, dt).unwrap();
        assert!((hl.step_scale(dt * 2.0, dt) - 2.0).abs() < 1e-5);
    }
}
