//! Procedural point formations.
//!
//! Pure geometry: each generator takes a [`Sampler`] and shape parameters and
//! returns points. Nothing here knows about colours or buffers.
//!
//! | Shape | Sampling |
//! |-------|----------|
//! | Cone (tree) | height uniform, radius area-uniform within the cone, helical twist |
//! | Helix (ribbon) | evenly spaced along a spiral hugging the cone, jittered |
//! | Shell (starfield) | radius uniform in a band, direction uniform on the sphere |
//! | Star | fixed 12-vertex bipyramid, points sampled along every edge |
//!
//! The shapes are statistical: regenerating with another seed gives a
//! different but equally valid sample.

use crate::spawn::Sampler;
use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// Cone with its apex up, base centred on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConeShape {
    pub height: f32,
    pub base_radius: f32,
    /// Extra rotation, in radians per unit of height, that twists the layers
    /// into a helical density pattern.
    pub twist_per_unit_height: f32,
}

/// One point drawn from a [`ConeShape`], with the values it was drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConeSample {
    pub position: Vec3,
    /// Height fraction `h` in `[0, 1)`.
    pub height_fraction: f32,
    /// Distance from the axis.
    pub radius: f32,
    /// Cone radius at this height, `(1 - h) * base_radius`.
    pub max_radius: f32,
}

impl ConeSample {
    /// `r / r_max`, or 0 at the apex where the layer has no width.
    #[inline]
    pub fn radius_ratio(&self) -> f32 {
        if self.max_radius > 0.0 {
            self.radius / self.max_radius
        } else {
            0.0
        }
    }
}

/// Draw one point inside the cone.
pub fn sample_cone(sampler: &mut Sampler, shape: &ConeShape) -> ConeSample {
    let h = sampler.unit();
    let y = h * shape.height;
    let max_radius = (1.0 - h) * shape.base_radius;
    let radius = sampler.disk_radius(max_radius);
    let theta = sampler.angle() + y * shape.twist_per_unit_height;

    ConeSample {
        position: Vec3::new(radius * theta.cos(), y, radius * theta.sin()),
        height_fraction: h,
        radius,
        max_radius,
    }
}

/// Spiral garland following the cone surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HelixShape {
    pub height: f32,
    pub base_radius: f32,
    /// Gap between cone surface and helix.
    pub offset: f32,
    pub turns: f32,
    /// Jitter span for radius and height.
    pub spread: f32,
}

/// Point `index` of `count` along the helix.
///
/// Points are spaced evenly in parameter `t = index / count`; the radius
/// is jittered separately for x and z, and the height on its own.
pub fn helix_point(sampler: &mut Sampler, shape: &HelixShape, index: usize, count: usize) -> Vec3 {
    let t = index as f32 / count.max(1) as f32;
    let radius = (1.0 - t) * shape.base_radius + shape.offset;
    let theta = t * TAU * shape.turns;

    Vec3::new(
        (radius + sampler.centered(shape.spread)) * theta.cos(),
        t * shape.height + sampler.centered(shape.spread),
        (radius + sampler.centered(shape.spread)) * theta.sin(),
    )
}

/// Point in the spherical shell `[min_radius, min_radius + thickness)`.
#[inline]
pub fn shell_point(sampler: &mut Sampler, min_radius: f32, thickness: f32) -> Vec3 {
    sampler.in_shell(min_radius, thickness)
}

/// Five-pointed star solid parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarShape {
    pub outer_radius: f32,
    pub inner_radius: f32,
    /// Hub offset along the depth (z) axis.
    pub depth: f32,
}

/// Number of star points.
pub const STAR_POINTS: usize = 5;

/// Upper bound on decoration samples along a single star edge.
pub const MAX_EDGE_SAMPLES: usize = 10_000;

/// Vertex and edge list of the star solid.
///
/// Vertex layout: `0` front hub, `1` back hub, `2..7` tips, `7..12` valleys.
#[derive(Debug, Clone, PartialEq)]
pub struct StarFrame {
    pub vertices: [Vec3; 2 + 2 * STAR_POINTS],
    pub edges: Vec<(usize, usize)>,
}

impl StarFrame {
    pub const FRONT_HUB: usize = 0;
    pub const BACK_HUB: usize = 1;

    #[inline]
    pub fn tip(i: usize) -> usize {
        2 + i % STAR_POINTS
    }

    #[inline]
    pub fn valley(i: usize) -> usize {
        2 + STAR_POINTS + i % STAR_POINTS
    }

    /// Edge endpoints as positions.
    pub fn segments(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.edges
            .iter()
            .map(|&(a, b)| (self.vertices[a], self.vertices[b]))
    }

    /// Length of the longest edge.
    pub fn longest_edge(&self) -> f32 {
        self.segments().map(|(a, b)| a.distance(b)).fold(0.0, f32::max)
    }
}

/// Build the star solid.
///
/// Tips and valleys alternate on a planar pentagram at two radii, the first
/// tip pointing up (+Y). Each point contributes six edges: its outline pair
/// (tip-valley, valley-next tip) and spokes from both hubs to its tip and its
/// valley, 30 edges in all.
pub fn star_frame(shape: &StarShape) -> StarFrame {
    let mut vertices = [Vec3::ZERO; 2 + 2 * STAR_POINTS];
    vertices[StarFrame::FRONT_HUB] = Vec3::new(0.0, 0.0, shape.depth);
    vertices[StarFrame::BACK_HUB] = Vec3::new(0.0, 0.0, -shape.depth);

    for i in 0..STAR_POINTS {
        let tip_angle = i as f32 * TAU / STAR_POINTS as f32 + PI / 2.0;
        let valley_angle = tip_angle + PI / STAR_POINTS as f32;
        vertices[StarFrame::tip(i)] = Vec3::new(
            tip_angle.cos() * shape.outer_radius,
            tip_angle.sin() * shape.outer_radius,
            0.0,
        );
        vertices[StarFrame::valley(i)] = Vec3::new(
            valley_angle.cos() * shape.inner_radius,
            valley_angle.sin() * shape.inner_radius,
            0.0,
        );
    }

    let mut edges = Vec::with_capacity(STAR_POINTS * 6);
    for i in 0..STAR_POINTS {
        let (tip, valley, next_tip) = (StarFrame::tip(i), StarFrame::valley(i), StarFrame::tip(i + 1));
        edges.push((tip, valley));
        edges.push((valley, next_tip));
        edges.push((StarFrame::FRONT_HUB, tip));
        edges.push((StarFrame::BACK_HUB, tip));
        edges.push((StarFrame::FRONT_HUB, valley));
        edges.push((StarFrame::BACK_HUB, valley));
    }

    StarFrame { vertices, edges }
}

/// Number of intervals placed along an edge: `ceil(length * density)`.
#[inline]
pub fn edge_divisions(a: Vec3, b: Vec3, density: f32) -> usize {
    (a.distance(b) * density).ceil() as usize
}

/// Sample points along the edge `a -> b`, both endpoints included.
///
/// Each sample is the linear interpolation at `k / divisions`
/// (`k = 0..=divisions`) plus a jitter of span `jitter` per axis. A
/// zero-length edge yields a single sample at `a`.
pub fn sample_edge(
    sampler: &mut Sampler,
    a: Vec3,
    b: Vec3,
    density: f32,
    jitter: f32,
    mut emit: impl FnMut(&mut Sampler, Vec3),
) {
    let divisions = edge_divisions(a, b, density);
    if divisions == 0 {
        let p = a + sampler.jitter(jitter);
        emit(sampler, p);
        return;
    }
    for k in 0..=divisions {
        let t = k as f32 / divisions as f32;
        let p = a.lerp(b, t) + sampler.jitter(jitter);
        emit(sampler, p);
    }
}
