//! Attribute synthesis for tree particles.
//!
//! A generated cone point gets a colour and a size from two independent
//! draws: its [`Zone`] (outer shell or interior, from `r / r_max`) and
//! whether it is an accent bulb. The pair selects a row of a weighted
//! decision table, and the row picks a [`ColorCategory`]:
//!
//! | Zone | Accent | Categories |
//! |------|--------|------------|
//! | Outer shell | yes | Gold 60%, Light 40% |
//! | Interior | yes | Light |
//! | Outer shell | no | Metallic highlight 11%, Metallic shade 44%, Foliage 45% |
//! | Interior | no | Foliage |
//!
//! With the default 0.85 shell threshold, about 27% of points sit on the
//! outer shell and 12% are bulbs.

use crate::color::Rgb;
use crate::config::TreeConfig;
use crate::error::ConfigError;
use crate::formation::ConeSample;
use crate::spawn::Sampler;
use rand::distributions::WeightedIndex;

/// Radial zone of a cone point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    OuterShell,
    Interior,
}

/// Zone of a cone sample.
///
/// Outer shell needs a layer wider than `min_radius` and a radius ratio above
/// `threshold`; the apex region is always interior.
pub fn classify_zone(sample: &ConeSample, threshold: f32, min_radius: f32) -> Zone {
    if sample.max_radius > min_radius && sample.radius_ratio() > threshold {
        Zone::OuterShell
    } else {
        Zone::Interior
    }
}

/// Colour family of a tree particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorCategory {
    /// Luxury accent colour.
    Gold,
    /// One of the string-light colours.
    Light,
    /// Metallic with lifted lightness.
    MetallicHighlight,
    /// Muted metallic.
    MetallicShade,
    /// Dark-to-light green blend.
    Foliage,
}

impl ColorCategory {
    /// True for the bulb colours.
    pub fn is_bright(self) -> bool {
        matches!(self, ColorCategory::Gold | ColorCategory::Light)
    }
}

/// Everything the synthesizer decided about one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attributes {
    pub zone: Zone,
    pub accent: bool,
    pub category: ColorCategory,
    pub color: Rgb,
    pub size: f32,
}

struct Row {
    categories: Vec<ColorCategory>,
    weights: WeightedIndex<f32>,
}

impl Row {
    fn new(entries: &[(ColorCategory, f32)]) -> Result<Row, ConfigError> {
        let weights = WeightedIndex::new(entries.iter().map(|&(_, w)| w)).map_err(|_| {
            ConfigError::OutOfRange {
                field: "tree colour weights",
                value: entries.iter().map(|&(_, w)| w).sum(),
                expected: "a positive total weight",
            }
        })?;
        Ok(Row {
            categories: entries.iter().map(|&(c, _)| c).collect(),
            weights,
        })
    }

    fn draw(&self, sampler: &mut Sampler) -> ColorCategory {
        self.categories[sampler.weighted(&self.weights)]
    }
}

/// Decision table from (zone, accent) to colour category, plus the palette
/// and size ranges needed to realise a category.
pub struct AttributeSynthesizer {
    accent_rate: f32,
    shell_threshold: f32,
    shell_min_radius: f32,
    rows: [Row; 4],
    config: TreeConfig,
}

impl AttributeSynthesizer {
    /// Build the table from tree settings.
    pub fn new(config: &TreeConfig) -> Result<Self, ConfigError> {
        let rows = [
            Row::new(&Self::weights(config, Zone::OuterShell, true))?,
            Row::new(&Self::weights(config, Zone::Interior, true))?,
            Row::new(&Self::weights(config, Zone::OuterShell, false))?,
            Row::new(&Self::weights(config, Zone::Interior, false))?,
        ];
        Ok(Self {
            accent_rate: config.accent_rate,
            shell_threshold: config.shell_threshold,
            shell_min_radius: config.shell_min_radius,
            rows,
            config: config.clone(),
        })
    }

    /// Category weights of the table row for `(zone, accent)`. Each row sums to 1.
    pub fn weights(config: &TreeConfig, zone: Zone, accent: bool) -> Vec<(ColorCategory, f32)> {
        use ColorCategory::*;
        match (zone, accent) {
            (Zone::OuterShell, true) => vec![
                (Gold, 1.0 - config.accent_gold_cutoff),
                (Light, config.accent_gold_cutoff),
            ],
            (Zone::Interior, true) => vec![(Light, 1.0)],
            (Zone::OuterShell, false) => {
                let metallic = 1.0 - config.shell_metallic_cutoff;
                vec![
                    (MetallicHighlight, metallic * config.metallic_highlight_rate),
                    (MetallicShade, metallic * (1.0 - config.metallic_highlight_rate)),
                    (Foliage, config.shell_metallic_cutoff),
                ]
            }
            (Zone::Interior, false) => vec![(Foliage, 1.0)],
        }
    }

    fn row(&self, zone: Zone, accent: bool) -> &Row {
        match (zone, accent) {
            (Zone::OuterShell, true) => &self.rows[0],
            (Zone::Interior, true) => &self.rows[1],
            (Zone::OuterShell, false) => &self.rows[2],
            (Zone::Interior, false) => &self.rows[3],
        }
    }

    /// Classify, draw a category and realise its colour and size.
    pub fn synthesize(&self, sampler: &mut Sampler, sample: &ConeSample) -> Attributes {
        let zone = classify_zone(sample, self.shell_threshold, self.shell_min_radius);
        let accent = sampler.chance(self.accent_rate);
        let category = self.row(zone, accent).draw(sampler);
        let color = self.color(sampler, category);
        let size = if accent {
            self.config.accent_size.sample(sampler)
        } else {
            self.config.base_size.sample(sampler)
        };

        Attributes {
            zone,
            accent,
            category,
            color,
            size,
        }
    }

    /// Concrete colour for a category.
    pub fn color(&self, sampler: &mut Sampler, category: ColorCategory) -> Rgb {
        let palette = &self.config.palette;
        match category {
            ColorCategory::Gold => palette.gold,
            ColorCategory::Light => *sampler.pick(&palette.lights),
            ColorCategory::MetallicHighlight => palette
                .gold
                .offset_lightness(self.config.metallic_highlight_lift),
            ColorCategory::MetallicShade => palette.gold.scale(self.config.metallic_shade),
            ColorCategory::Foliage => {
                let u = sampler.unit();
                palette.foliage_dark.lerp(palette.foliage_light, u * u)
            }
        }
    }
}
