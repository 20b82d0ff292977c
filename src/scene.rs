//! Scene composition and the per-frame render contract.
//!
//! A [`Scene`] owns every drawable group and advances them together once per
//! frame. It is the only reader of the [`ModeSignal`]; everything else gets
//! the mode passed in.
//!
//! After [`Scene::update`] the renderer calls [`Scene::drawables`] and gets
//! read-only views of each group's buffers together with a model matrix.
//! Points and lines are meant to be drawn with additive blending and no
//! depth writes, so overlapping particles accumulate into a glow.

use crate::buffers::{LineBuffer, PointCloud};
use crate::color::Rgb;
use crate::config::SceneConfig;
use crate::error::ConfigError;
use crate::mode::{Mode, ModeSignal};
use crate::ribbon::Ribbon;
use crate::spawn::Sampler;
use crate::star::Star;
use crate::starfield::Starfield;
use crate::streaks::StreakPool;
use crate::time::FrameTime;
use crate::tree::Tree;
use glam::{EulerRot, Mat4, Quat, Vec3};

/// Buffers of one drawable group.
#[derive(Debug, Clone, Copy)]
pub enum Geometry<'a> {
    /// Point sprites. `point_size` is the world size of a point with size
    /// multiplier 1; each point's colour and multiplier come from the cloud.
    Points {
        cloud: &'a PointCloud,
        point_size: f32,
        opacity: f32,
    },
    /// Line segments in a single colour.
    Lines {
        lines: &'a LineBuffer,
        color: Rgb,
        opacity: f32,
    },
}

/// A group ready to draw.
#[derive(Debug, Clone, Copy)]
pub struct Drawable<'a> {
    pub name: &'static str,
    /// Local-to-world transform.
    pub model: Mat4,
    pub geometry: Geometry<'a>,
}

/// All groups of the scene.
#[derive(Debug)]
pub struct Scene {
    config: SceneConfig,
    tree: Tree,
    ribbon: Ribbon,
    star: Star,
    starfield: Starfield,
    streaks: StreakPool,
    mode: Mode,
    frames: u64,
}

impl Scene {
    /// Validate `config` and generate every group.
    ///
    /// Each group draws from its own stream forked off the scene seed.
    pub fn new(config: SceneConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut sampler = Sampler::new(config.seed);

        let tree = Tree::generate(&mut sampler.fork(), &config.tree)?;
        let ribbon = Ribbon::generate(&mut sampler.fork(), &config.ribbon, &config.tree);
        let star = Star::generate(&mut sampler.fork(), &config.star);
        let starfield = Starfield::generate(&mut sampler.fork(), &config.starfield);
        let streaks = StreakPool::new(&mut sampler, &config.streaks);

        log::debug!(
            "scene ready: {} tree, {} ribbon, {} star, {} starfield particles",
            tree.len(),
            ribbon.cloud().len(),
            star.cloud().len(),
            starfield.cloud().len()
        );

        Ok(Self {
            config,
            tree,
            ribbon,
            star,
            starfield,
            streaks,
            mode: Mode::default(),
            frames: 0,
        })
    }

    /// Read the current mode and advance one frame.
    pub fn update(&mut self, frame: FrameTime, signal: &ModeSignal) {
        self.advance(signal.get(), frame);
    }

    /// Advance one frame in `mode`.
    pub fn advance(&mut self, mode: Mode, frame: FrameTime) {
        if mode != self.mode {
            log::info!("mode {} -> {} at t = {:.2}s", self.mode, mode, frame.elapsed);
            self.mode = mode;
        }

        let morph = &self.config.morph;
        self.tree.update(mode, frame.elapsed, frame.delta, morph);
        self.ribbon.update(mode, frame.elapsed, frame.delta, morph);
        self.star.update(frame.elapsed);
        self.starfield.update(frame.elapsed);
        self.streaks.update(frame.delta);
        self.frames += 1;
    }

    /// Groups to draw this frame, back to front.
    pub fn drawables(&self) -> Vec<Drawable<'_>> {
        let layout = &self.config.layout;
        let tree_base = Mat4::from_translation(layout.tree_origin());
        let star_model = Mat4::from_translation(layout.star_origin())
            * Mat4::from_rotation_y(self.star.rotation_y());
        let r = self.starfield.rotation();

        vec![
            Drawable {
                name: "starfield",
                model: Mat4::from_quat(Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z)),
                geometry: Geometry::Points {
                    cloud: self.starfield.cloud(),
                    point_size: self.starfield.point_size(),
                    opacity: self.starfield.opacity(),
                },
            },
            Drawable {
                name: "streaks",
                model: Mat4::IDENTITY,
                geometry: Geometry::Lines {
                    lines: self.streaks.lines(),
                    color: self.config.streaks.color,
                    opacity: self.config.streaks.opacity,
                },
            },
            Drawable {
                name: "tree",
                model: tree_base * Mat4::from_rotation_y(self.tree.rotation_y()),
                geometry: Geometry::Points {
                    cloud: self.tree.cloud(),
                    point_size: self.tree.point_size(),
                    opacity: self.tree.opacity(),
                },
            },
            Drawable {
                name: "ribbon",
                model: tree_base
                    * Mat4::from_rotation_y(self.ribbon.rotation_y())
                    * Mat4::from_scale(Vec3::splat(self.ribbon.scale())),
                geometry: Geometry::Points {
                    cloud: self.ribbon.cloud(),
                    point_size: self.ribbon.point_size(),
                    opacity: self.ribbon.opacity(),
                },
            },
            Drawable {
                name: "star-wire",
                model: star_model,
                geometry: Geometry::Lines {
                    lines: self.star.wire(),
                    color: self.config.star.gold,
                    opacity: self.config.star.wire_opacity,
                },
            },
            Drawable {
                name: "star",
                model: star_model,
                geometry: Geometry::Points {
                    cloud: self.star.cloud(),
                    point_size: self.config.star.point_size,
                    opacity: 1.0,
                },
            },
        ]
    }

    /// Mode applied on the last frame.
    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Frames advanced so far.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    #[inline]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    #[inline]
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    #[inline]
    pub fn ribbon(&self) -> &Ribbon {
        &self.ribbon
    }

    #[inline]
    pub fn star(&self) -> &Star {
        &self.star
    }

    #[inline]
    pub fn starfield(&self) -> &Starfield {
        &self.starfield
    }

    #[inline]
    pub fn streaks(&self) -> &StreakPool {
        &self.streaks
    }
}
