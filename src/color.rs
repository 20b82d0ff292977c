//! Colour values and the small amount of colour math the generators need.
//!
//! Colours are normalized sRGB triples (0.0-1.0 per channel), which is exactly
//! what ends up in the `colors` buffer of a [`PointCloud`](crate::PointCloud).
//! In configuration files they are written as `"#rrggbb"` strings.

use crate::error::ConfigError;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An RGB colour with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub Vec3);

impl Rgb {
    /// Pure white.
    pub const WHITE: Rgb = Rgb(Vec3::ONE);

    /// Colour from channel values.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Rgb(Vec3::new(r, g, b))
    }

    /// Colour from a packed `0xRRGGBB` value.
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xff) as f32 / 255.0;
        let g = ((hex >> 8) & 0xff) as f32 / 255.0;
        let b = (hex & 0xff) as f32 / 255.0;
        Rgb::new(r, g, b)
    }

    #[inline]
    pub fn r(&self) -> f32 {
        self.0.x
    }

    #[inline]
    pub fn g(&self) -> f32 {
        self.0.y
    }

    #[inline]
    pub fn b(&self) -> f32 {
        self.0.z
    }

    /// Channels as an array, ready to be pushed into a flat colour buffer.
    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        self.0.to_array()
    }

    /// Linear blend from `self` (t = 0) to `other` (t = 1).
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        Rgb(self.0.lerp(other.0, t))
    }

    /// Multiply every channel by `factor`.
    pub fn scale(self, factor: f32) -> Rgb {
        Rgb(self.0 * factor)
    }

    /// Shift the HSL lightness by `delta`, keeping hue and saturation.
    ///
    /// Lightness is clamped to `0.0..=1.0`.
    pub fn offset_lightness(self, delta: f32) -> Rgb {
        let (h, s, l) = rgb_to_hsl(self.0);
        Rgb(hsl_to_rgb(h, s, (l + delta).clamp(0.0, 1.0)))
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::WHITE
    }
}

impl FromStr for Rgb {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ConfigError::Color(s.to_string()));
        }
        u32::from_str_radix(digits, 16)
            .map(Rgb::from_hex)
            .map_err(|_| ConfigError::Color(s.to_string()))
    }
}

impl TryFrom<String> for Rgb {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        write!(
            f,
            "#{:02x}{:02x}{:02x}",
            channel(self.r()),
            channel(self.g()),
            channel(self.b())
        )
    }
}

/// Convert RGB to HSL (all components 0-1).
fn rgb_to_hsl(c: Vec3) -> (f32, f32, f32) {
    let max = c.max_element();
    let min = c.min_element();
    let l = (max + min) * 0.5;

    if (max - min).abs() < f32::EPSILON {
        return (0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
    let h = if max == c.x {
        (c.y - c.z) / d + if c.y < c.z { 6.0 } else { 0.0 }
    } else if max == c.y {
        (c.z - c.x) / d + 2.0
    } else {
        (c.x - c.y) / d + 4.0
    };

    (h / 6.0, s, l)
}

/// Convert HSL to RGB.
fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Vec3 {
    if s <= 0.0 {
        return Vec3::splat(l);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    Vec3::new(
        hue_to_channel(p, q, h + 1.0 / 3.0),
        hue_to_channel(p, q, h),
        hue_to_channel(p, q, h - 1.0 / 3.0),
    )
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Rgb, b: Rgb) -> bool {
        (a.0 - b.0).abs().max_element() < 1e-3
    }

    #[test]
    fn test_parse_hex() {
        let gold: Rgb = "#FFD700".parse().unwrap();
        assert!(close(gold, Rgb::new(1.0, 215.0 / 255.0, 0.0)));
        assert!("ffd700".parse::<Rgb>().is_ok());
        assert!("#ffd7".parse::<Rgb>().is_err());
        assert!("#gggggg".parse::<Rgb>().is_err());
        assert!("+12345".parse::<Rgb>().is_err());
        assert!("#+12345".parse::<Rgb>().is_err());
        assert!("#-12345".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        let c = Rgb::from_hex(0x0f3d1e);
        assert_eq!(c.to_string(), "#0f3d1e");
    }

    #[test]
    fn test_hsl_identity() {
        for hex in [0xffd700, 0x011a09, 0xb3d9ff, 0xff00cc, 0x808080] {
            let c = Rgb::from_hex(hex);
            assert!(close(c.offset_lightness(0.0), c), "{}", c);
        }
    }

    #[test]
    fn test_offset_lightness_brightens() {
        let gold = Rgb::from_hex(0xffd700);
        let lighter = gold.offset_lightness(0.2);
        // Gold sits at lightness 0.5, so +0.2 pulls the blue channel up
        assert!(lighter.b() > 0.35);
        assert!((lighter.r() - 1.0).abs() < 1e-3);
        assert!(close(Rgb::WHITE.offset_lightness(0.5), Rgb::WHITE));
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&Rgb::from_hex(0xffeebb)).unwrap();
        assert_eq!(json, "\"#ffeebb\"");
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert!(close(back, Rgb::from_hex(0xffeebb)));
        assert!(serde_json::from_str::<Rgb>("\"nope\"").is_err());
    }
}
