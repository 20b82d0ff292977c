//! # treemorph
//!
//! A particle formation and morphing engine: a spiralled tree of light that
//! scatters into a breathing cloud and gathers back on command.
//!
//! The crate generates every formation on the CPU, evolves it frame by frame
//! and exposes flat, renderer-agnostic buffers. A small `wgpu` viewer binary
//! ships alongside, but any renderer that can draw additive point sprites and
//! lines can consume a [`Scene`].
//!
//! ## Quick Start
//!
//! ```ignore
//! use treemorph::prelude::*;
//!
//! let mut scene = Scene::new(SceneConfig::new().with_seed(7))?;
//! let signal = ModeSignal::new(Mode::Aggregate);
//! let mut clock = Clock::fixed(1.0 / 60.0);
//!
//! // Elsewhere, a gesture classifier writes the latest mode
//! signal.apply_gesture("Open_Palm");
//!
//! // Once per frame
//! scene.update(clock.tick(), &signal);
//! for drawable in scene.drawables() {
//!     // upload drawable.geometry, draw with drawable.model
//! }
//! ```
//!
//! ## Groups
//!
//! | Group | Particles | Per frame |
//! |-------|-----------|-----------|
//! | Tree | 6000 in a twisted cone | eases toward base or scattered targets; spins while aggregated |
//! | Ribbon | 2000 on a helix | scale eases to 1 or 2; constant spin |
//! | Star | dusted along 30 edges | constant spin; sizes blink |
//! | Starfield | 1200 on a distant shell | slow drift |
//! | Streaks | pool of 2 | stochastic launch, fixed lifetime |
//!
//! ## Modes
//!
//! The tree follows a single [`Mode`] value, `Aggregate` or `Scatter`, read
//! from a [`ModeSignal`] once per frame. The signal can be written from any
//! thread at any cadence; the scene always acts on the latest value.
//!
//! ## Configuration
//!
//! Every constant lives in [`SceneConfig`], loadable from partial JSON:
//!
//! ```ignore
//! let config = SceneConfig::load("scene.json")?
//!     .with_smoothing(Smoothing::HalfLife { seconds: 0.25 });
//! ```

pub mod attributes;
pub mod buffers;
pub mod color;
pub mod config;
pub mod error;
pub mod formation;
pub mod mode;
pub mod morph;
pub mod render;
pub mod ribbon;
pub mod scatter;
pub mod scene;
pub mod spawn;
pub mod star;
pub mod starfield;
pub mod streaks;
pub mod time;
pub mod tree;

pub use bytemuck;
pub use glam::{Mat4, Vec3};

pub use buffers::{LineBuffer, PointCloud};
pub use color::Rgb;
pub use config::SceneConfig;
pub use error::ConfigError;
pub use mode::{Gesture, Mode, ModeSignal};
pub use morph::Smoothing;
pub use scene::{Drawable, Geometry, Scene};
pub use time::{Clock, FrameTime};

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::buffers::{LineBuffer, PointCloud};
    pub use crate::color::Rgb;
    pub use crate::config::{
        Interval, LayoutConfig, MorphConfig, RibbonConfig, SceneConfig, StarConfig,
        StarfieldConfig, StreakConfig, TreeConfig,
    };
    pub use crate::error::ConfigError;
    pub use crate::mode::{Gesture, Mode, ModeSignal};
    pub use crate::morph::Smoothing;
    pub use crate::scene::{Drawable, Geometry, Scene};
    pub use crate::spawn::Sampler;
    pub use crate::time::{Clock, FrameTime};
    pub use glam::{Mat4, Vec3};
}
