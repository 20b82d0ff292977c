//! Scene configuration.
//!
//! All generation constants live here rather than in the generators, so the
//! look of the scene can be tuned from a JSON file without touching code.
//! Every struct has a [`Default`] matching the reference scene, and every
//! field is `#[serde(default)]`, so a config file only needs to name what it
//! changes:
//!
//! ```json
//! {
//!   "seed": 7,
//!   "tree": { "count": 12000, "accent_rate": 0.2 },
//!   "morph": { "smoothing": { "half_life": { "seconds": 0.25 } } }
//! }
//! ```

use crate::color::Rgb;
use crate::error::ConfigError;
use crate::formation::{star_frame, StarShape, MAX_EDGE_SAMPLES};
use crate::morph::Smoothing;
use crate::spawn::Sampler;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Closed interval `[min, max]` used for uniformly drawn scalars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Uniform draw from `[min, max)`.
    #[inline]
    pub fn sample(&self, sampler: &mut Sampler) -> f32 {
        sampler.span(self.min, self.max - self.min)
    }

    #[inline]
    pub fn contains(&self, v: f32) -> bool {
        v >= self.min && v <= self.max
    }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        finite(field, self.min)?;
        finite(field, self.max)?;
        if self.max < self.min {
            return Err(ConfigError::OutOfRange {
                field,
                value: self.max,
                expected: "max >= min",
            });
        }
        Ok(())
    }
}

/// Colours used by the tree's attribute synthesizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreePalette {
    /// Darkest foliage tone (interior particles lean toward this).
    pub foliage_dark: Rgb,
    /// Lightest foliage tone.
    pub foliage_light: Rgb,
    /// Luxury accent / metallic base colour.
    pub gold: Rgb,
    /// String-light bulb colours.
    pub lights: Vec<Rgb>,
}

impl Default for TreePalette {
    fn default() -> Self {
        Self {
            foliage_dark: Rgb::from_hex(0x011a09),
            foliage_light: Rgb::from_hex(0x0f3d1e),
            gold: Rgb::from_hex(0xffd700),
            lights: vec![
                Rgb::from_hex(0xff0044), // holiday red
                Rgb::from_hex(0xffcc00), // warm gold
                Rgb::from_hex(0x00ccff), // icy blue
                Rgb::from_hex(0xff00cc), // magenta
                Rgb::from_hex(0xffffff), // bright white
            ],
        }
    }
}

/// The primary morphing formation: a spiralled cone of particles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub count: usize,
    pub height: f32,
    pub base_radius: f32,
    /// Spiral twist in radians per unit of height.
    pub twist_per_unit_height: f32,
    /// `r / r_max` above which a point counts as outer shell.
    pub shell_threshold: f32,
    /// Layers thinner than this never count as outer shell.
    pub shell_min_radius: f32,
    /// Probability that a particle is a bulb.
    pub accent_rate: f32,
    /// Outer-shell bulbs are gold when `u > accent_gold_cutoff`.
    pub accent_gold_cutoff: f32,
    /// Outer-shell non-bulbs are metallic when `u > shell_metallic_cutoff`.
    pub shell_metallic_cutoff: f32,
    /// Fraction of metallic particles that get the lightened highlight.
    pub metallic_highlight_rate: f32,
    /// HSL lightness added to highlight particles.
    pub metallic_highlight_lift: f32,
    /// Brightness multiplier for the muted metallic tone.
    pub metallic_shade: f32,
    /// Scatter vectors are uniform in `[-half, half]` per axis.
    pub scatter_half_range: f32,
    pub base_size: Interval,
    pub accent_size: Interval,
    /// World-space size of a point with size multiplier 1.
    pub point_size: f32,
    pub opacity: f32,
    pub palette: TreePalette,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            count: 6000,
            height: 8.0,
            base_radius: 3.5,
            twist_per_unit_height: 0.5,
            shell_threshold: 0.85,
            shell_min_radius: 0.1,
            accent_rate: 0.12,
            accent_gold_cutoff: 0.4,
            shell_metallic_cutoff: 0.45,
            metallic_highlight_rate: 0.2,
            metallic_highlight_lift: 0.2,
            metallic_shade: 0.8,
            scatter_half_range: 6.0,
            base_size: Interval::new(0.8, 1.2),
            accent_size: Interval::new(1.5, 2.5),
            point_size: 0.12,
            opacity: 0.9,
            palette: TreePalette::default(),
        }
    }
}

/// The garland helix wound around the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RibbonConfig {
    pub count: usize,
    /// Gap between the cone surface and the ribbon.
    pub offset: f32,
    /// Full turns from base to tip.
    pub turns: f32,
    /// Jitter span applied to radius and height.
    pub spread: f32,
    pub color: Rgb,
    pub size: f32,
    /// Uniform scale while aggregated.
    pub aggregate_scale: f32,
    /// Uniform scale while scattered.
    pub scatter_scale: f32,
    /// Rotation about Y in radians per second (always on).
    pub spin_rate: f32,
    pub point_size: f32,
    pub opacity: f32,
}

impl Default for RibbonConfig {
    fn default() -> Self {
        Self {
            count: 2000,
            offset: 0.2,
            turns: 4.5,
            spread: 0.25,
            color: Rgb::WHITE,
            size: 1.0,
            aggregate_scale: 1.0,
            scatter_scale: 2.0,
            spin_rate: -0.1,
            point_size: 0.1,
            opacity: 0.6,
        }
    }
}

/// The faceted star topper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarConfig {
    pub outer_radius: f32,
    pub inner_radius: f32,
    /// Offset of the two hub points along the depth axis.
    pub depth: f32,
    /// Decoration samples per unit of edge length.
    pub density: f32,
    /// Jitter span for decoration particles.
    pub jitter: f32,
    /// Probability of a diamond (accent) particle.
    pub diamond_rate: f32,
    pub gold: Rgb,
    pub diamond: Rgb,
    pub gold_size: Interval,
    pub diamond_size: Interval,
    /// Sparkle tempo in beats per minute.
    pub blink_bpm: f32,
    /// Peak size gain of a sparkle (`size = base * (1 + gain)` at the peak).
    pub blink_gain: f32,
    /// Rotation about Y in radians per second.
    pub spin_rate: f32,
    pub point_size: f32,
    pub wire_opacity: f32,
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            outer_radius: 1.0,
            inner_radius: 0.45,
            depth: 0.35,
            density: 120.0,
            jitter: 0.02,
            diamond_rate: 0.2,
            gold: Rgb::from_hex(0xffd700),
            diamond: Rgb::WHITE,
            gold_size: Interval::new(0.5, 2.0),
            diamond_size: Interval::new(1.0, 3.5),
            blink_bpm: 80.0,
            blink_gain: 1.2,
            spin_rate: 0.25,
            point_size: 0.03,
            wire_opacity: 0.6,
        }
    }
}

impl StarConfig {
    pub fn shape(&self) -> StarShape {
        StarShape {
            outer_radius: self.outer_radius,
            inner_radius: self.inner_radius,
            depth: self.depth,
        }
    }
}

/// Ambient background shell of faint stars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarfieldConfig {
    pub count: usize,
    pub min_radius: f32,
    pub thickness: f32,
    pub palette: Vec<Rgb>,
    pub brightness: Interval,
    pub size: Interval,
    /// Rotation about Y in radians per second.
    pub spin_y: f32,
    /// Rotation about Z in radians per second.
    pub spin_z: f32,
    pub point_size: f32,
    pub opacity: f32,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            count: 1200,
            min_radius: 45.0,
            thickness: 45.0,
            palette: vec![
                Rgb::from_hex(0xffffff), // starlight
                Rgb::from_hex(0xb3d9ff), // ice blue
                Rgb::from_hex(0xffeebb), // champagne
            ],
            brightness: Interval::new(0.3, 1.0),
            size: Interval::new(0.5, 2.0),
            spin_y: 0.015,
            spin_z: 0.003,
            point_size: 0.25,
            opacity: 0.8,
        }
    }
}

/// Shooting-star streaks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreakConfig {
    /// Number of pooled streak instances.
    pub pool_size: usize,
    /// Per-frame activation probability of an idle instance.
    pub spawn_chance: f32,
    pub min_radius: f32,
    pub radius_span: f32,
    /// Span of the random offset added to both spherical angles of the target.
    pub angle_jitter: f32,
    pub speed: Interval,
    pub lifetime: Interval,
    /// Tail distance expressed as seconds of travel.
    pub trail_lag: f32,
    pub color: Rgb,
    pub opacity: f32,
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            pool_size: 2,
            spawn_chance: 0.002,
            min_radius: 60.0,
            radius_span: 20.0,
            angle_jitter: 3.0,
            speed: Interval::new(30.0, 60.0),
            lifetime: Interval::new(0.8, 1.3),
            trail_lag: 0.06,
            color: Rgb::WHITE,
            opacity: 0.7,
        }
    }
}

/// Per-frame morph behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphConfig {
    pub smoothing: Smoothing,
    /// Frame step the per-frame constants were tuned for.
    pub reference_dt: f32,
    /// Tree rotation per reference frame while aggregated.
    pub aggregate_spin: f32,
    /// Angular frequencies of the x/y/z scatter oscillation.
    pub scatter_frequencies: [f32; 3],
    /// Offset added to each oscillation so the multiplier stays positive.
    pub scatter_bias: f32,
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            smoothing: Smoothing::default(),
            reference_dt: 1.0 / 60.0,
            aggregate_spin: 0.001,
            scatter_frequencies: [0.5, 0.3, 0.7],
            scatter_bias: 1.5,
        }
    }
}

/// Where each group sits in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub tree_origin: [f32; 3],
    pub star_origin: [f32; 3],
}

impl LayoutConfig {
    pub fn tree_origin(&self) -> Vec3 {
        Vec3::from_array(self.tree_origin)
    }

    pub fn star_origin(&self) -> Vec3 {
        Vec3::from_array(self.star_origin)
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            tree_origin: [0.0, -2.5, 0.0],
            star_origin: [0.0, 5.7, 0.0],
        }
    }
}

/// Complete scene configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// RNG seed. `None` draws from OS entropy, so every session differs.
    pub seed: Option<u64>,
    pub tree: TreeConfig,
    pub ribbon: RibbonConfig,
    pub star: StarConfig,
    pub starfield: StarfieldConfig,
    pub streaks: StreakConfig,
    pub morph: MorphConfig,
    pub layout: LayoutConfig,
}

impl SceneConfig {
    /// Reference configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Fix the RNG seed for reproducible generation.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of tree particles.
    pub fn with_tree_count(mut self, count: usize) -> Self {
        self.tree.count = count;
        self
    }

    /// Set the morph smoothing policy.
    pub fn with_smoothing(mut self, smoothing: Smoothing) -> Self {
        self.morph.smoothing = smoothing;
        self
    }

    /// Set the per-frame streak activation probability.
    pub fn with_streak_chance(mut self, chance: f32) -> Self {
        self.streaks.spawn_chance = chance;
        self
    }

    /// Check every parameter. Generation assumes a validated config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.tree;
        nonzero("tree.count", t.count)?;
        positive("tree.height", t.height)?;
        positive("tree.base_radius", t.base_radius)?;
        finite("tree.twist_per_unit_height", t.twist_per_unit_height)?;
        probability("tree.shell_threshold", t.shell_threshold)?;
        non_negative("tree.shell_min_radius", t.shell_min_radius)?;
        probability("tree.accent_rate", t.accent_rate)?;
        probability("tree.accent_gold_cutoff", t.accent_gold_cutoff)?;
        probability("tree.shell_metallic_cutoff", t.shell_metallic_cutoff)?;
        probability("tree.metallic_highlight_rate", t.metallic_highlight_rate)?;
        finite("tree.metallic_highlight_lift", t.metallic_highlight_lift)?;
        non_negative("tree.metallic_shade", t.metallic_shade)?;
        non_negative("tree.scatter_half_range", t.scatter_half_range)?;
        t.base_size.validate("tree.base_size")?;
        t.accent_size.validate("tree.accent_size")?;
        positive("tree.point_size", t.point_size)?;
        probability("tree.opacity", t.opacity)?;
        nonzero("tree.palette.lights", t.palette.lights.len())?;

        let r = &self.ribbon;
        nonzero("ribbon.count", r.count)?;
        non_negative("ribbon.offset", r.offset)?;
        finite("ribbon.turns", r.turns)?;
        non_negative("ribbon.spread", r.spread)?;
        non_negative("ribbon.size", r.size)?;
        positive("ribbon.aggregate_scale", r.aggregate_scale)?;
        positive("ribbon.scatter_scale", r.scatter_scale)?;
        finite("ribbon.spin_rate", r.spin_rate)?;
        positive("ribbon.point_size", r.point_size)?;
        probability("ribbon.opacity", r.opacity)?;

        let s = &self.star;
        positive("star.outer_radius", s.outer_radius)?;
        positive("star.inner_radius", s.inner_radius)?;
        non_negative("star.depth", s.depth)?;
        positive("star.density", s.density)?;
        non_negative("star.jitter", s.jitter)?;
        probability("star.diamond_rate", s.diamond_rate)?;
        s.gold_size.validate("star.gold_size")?;
        s.diamond_size.validate("star.diamond_size")?;
        non_negative("star.blink_bpm", s.blink_bpm)?;
        non_negative("star.blink_gain", s.blink_gain)?;
        finite("star.spin_rate", s.spin_rate)?;
        positive("star.point_size", s.point_size)?;
        probability("star.wire_opacity", s.wire_opacity)?;
        let samples = star_frame(&s.shape()).longest_edge() * s.density;
        if !samples.is_finite() || samples > MAX_EDGE_SAMPLES as f32 {
            return Err(ConfigError::OutOfRange {
                field: "star.density",
                value: s.density,
                expected: "at most 10000 samples along the longest star edge",
            });
        }

        let f = &self.starfield;
        nonzero("starfield.count", f.count)?;
        positive("starfield.min_radius", f.min_radius)?;
        non_negative("starfield.thickness", f.thickness)?;
        nonzero("starfield.palette", f.palette.len())?;
        f.brightness.validate("starfield.brightness")?;
        f.size.validate("starfield.size")?;
        finite("starfield.spin_y", f.spin_y)?;
        finite("starfield.spin_z", f.spin_z)?;
        positive("starfield.point_size", f.point_size)?;
        probability("starfield.opacity", f.opacity)?;

        let k = &self.streaks;
        probability("streaks.spawn_chance", k.spawn_chance)?;
        positive("streaks.min_radius", k.min_radius)?;
        non_negative("streaks.radius_span", k.radius_span)?;
        finite("streaks.angle_jitter", k.angle_jitter)?;
        k.speed.validate("streaks.speed")?;
        k.lifetime.validate("streaks.lifetime")?;
        non_negative("streaks.trail_lag", k.trail_lag)?;
        probability("streaks.opacity", k.opacity)?;

        let m = &self.morph;
        m.smoothing.validate()?;
        positive("morph.reference_dt", m.reference_dt)?;
        finite("morph.aggregate_spin", m.aggregate_spin)?;
        for w in m.scatter_frequencies {
            finite("morph.scatter_frequencies", w)?;
        }
        // A bias of at least 1 keeps the oscillation multiplier non-negative.
        finite("morph.scatter_bias", m.scatter_bias)?;
        if m.scatter_bias < 1.0 {
            return Err(ConfigError::OutOfRange {
                field: "morph.scatter_bias",
                value: m.scatter_bias,
                expected: ">= 1.0",
            });
        }

        for v in self.layout.tree_origin.iter().chain(&self.layout.star_origin) {
            finite("layout", *v)?;
        }

        Ok(())
    }
}

pub(crate) fn finite(field: &'static str, v: f32) -> Result<(), ConfigError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite(field))
    }
}

fn nonzero(field: &'static str, n: usize) -> Result<(), ConfigError> {
    if n == 0 {
        Err(ConfigError::ZeroCount(field))
    } else {
        Ok(())
    }
}

fn positive(field: &'static str, v: f32) -> Result<(), ConfigError> {
    finite(field, v)?;
    if v > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value: v, expected: "> 0.0" })
    }
}

fn non_negative(field: &'static str, v: f32) -> Result<(), ConfigError> {
    finite(field, v)?;
    if v >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value: v, expected: ">= 0.0" })
    }
}

fn probability(field: &'static str, v: f32) -> Result<(), ConfigError> {
    finite(field, v)?;
    if (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value: v, expected: "0.0..=1.0" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SceneConfig::default().validate().is_ok());
    }

    #[test]
    fn test_reference_constants() {
        let c = SceneConfig::default();
        assert_eq!(c.tree.count, 6000);
        assert_eq!(c.ribbon.count, 2000);
        assert_eq!(c.starfield.count, 1200);
        assert_eq!(c.streaks.pool_size, 2);
        assert_eq!(c.tree.accent_rate, 0.12);
        assert_eq!(c.tree.shell_threshold, 0.85);
    }

    #[test]
    fn test_partial_json_overrides() {
        let c = SceneConfig::from_json_str(
            r##"{ "seed": 7, "tree": { "count": 100, "palette": { "gold": "#ffcc00" } } }"##,
        )
        .unwrap();
        assert_eq!(c.seed, Some(7));
        assert_eq!(c.tree.count, 100);
        assert_eq!(c.tree.height, 8.0);
        assert_eq!(c.tree.palette.gold, Rgb::from_hex(0xffcc00));
        assert_eq!(c.tree.palette.lights.len(), 5);
    }

    #[test]
    fn test_rejects_bad_values() {
        let zero = SceneConfig::new().with_tree_count(0);
        assert!(matches!(zero.validate(), Err(ConfigError::ZeroCount("tree.count"))));

        let chance = SceneConfig::new().with_streak_chance(1.5);
        assert!(matches!(
            chance.validate(),
            Err(ConfigError::OutOfRange { field: "streaks.spawn_chance", .. })
        ));

        let mut nan = SceneConfig::new();
        nan.tree.height = f32::NAN;
        assert!(matches!(nan.validate(), Err(ConfigError::NotFinite("tree.height"))));

        let mut inverted = SceneConfig::new();
        inverted.streaks.lifetime = Interval::new(2.0, 1.0);
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn test_rejects_oversized_star_density() {
        let mut dense = SceneConfig::new();
        dense.star.density = 1e12;
        assert!(matches!(
            dense.validate(),
            Err(ConfigError::OutOfRange { field: "star.density", .. })
        ));

        let mut huge = SceneConfig::new();
        huge.star.outer_radius = 1e30;
        assert!(matches!(
            huge.validate(),
            Err(ConfigError::OutOfRange { field: "star.density", .. })
        ));

        // Just under the cap on the longest edge
        let mut edge = SceneConfig::new();
        let longest = star_frame(&edge.star.shape()).longest_edge();
        edge.star.density = MAX_EDGE_SAMPLES as f32 / longest * 0.99;
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(
            SceneConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SceneConfig::from_json_str(r##"{ "star": { "gold": "#12" } }"##),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_interval_sample() {
        let mut s = Sampler::seeded(2);
        let iv = Interval::new(0.8, 1.3);
        for _ in 0..200 {
            assert!(iv.contains(iv.sample(&mut s)));
        }
    }
}
