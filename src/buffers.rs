//! Flat particle buffers handed to the renderer.
//!
//! Every drawable group owns its buffers and allocates them exactly once.
//! Per-frame updates write into them in place; the renderer only ever sees
//! shared slices.
//!
//! | Buffer | Length | Layout |
//! |--------|--------|--------|
//! | `positions` | `3N` | `x0, y0, z0, x1, ...` |
//! | `colors` | `3N` | normalized RGB |
//! | `sizes` | `N` | size multiplier |

use crate::color::Rgb;
use glam::Vec3;

/// Parallel position / colour / size arrays for `N` points.
#[derive(Debug, Clone, Default)]
pub struct PointCloud {
    positions: Vec<f32>,
    colors: Vec<f32>,
    sizes: Vec<f32>,
}

impl PointCloud {
    /// Empty cloud with room for `capacity` points.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity * 3),
            colors: Vec::with_capacity(capacity * 3),
            sizes: Vec::with_capacity(capacity),
        }
    }

    /// Append a point. Only used while a generator is filling the cloud.
    pub(crate) fn push(&mut self, position: Vec3, color: Rgb, size: f32) {
        self.positions.extend_from_slice(&position.to_array());
        self.colors.extend_from_slice(&color.to_array());
        self.sizes.push(size);
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Flat `3N` position buffer.
    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Flat `3N` colour buffer.
    #[inline]
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    /// `N` size buffer.
    #[inline]
    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    /// Position of point `i`.
    #[inline]
    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[i * 3..i * 3 + 3])
    }

    /// Colour of point `i`.
    #[inline]
    pub fn color(&self, i: usize) -> Rgb {
        Rgb(Vec3::from_slice(&self.colors[i * 3..i * 3 + 3]))
    }

    #[inline]
    pub(crate) fn set_position(&mut self, i: usize, p: Vec3) {
        p.write_to_slice(&mut self.positions[i * 3..i * 3 + 3]);
    }

    #[inline]
    pub(crate) fn sizes_mut(&mut self) -> &mut [f32] {
        &mut self.sizes
    }

    /// Iterator over all positions.
    pub fn iter_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.positions.chunks_exact(3).map(Vec3::from_slice)
    }

    /// True when the three buffers describe the same number of points.
    pub fn is_consistent(&self) -> bool {
        self.positions.len() == self.sizes.len() * 3 && self.colors.len() == self.sizes.len() * 3
    }
}

/// Line segments, 6 floats each (`x0, y0, z0, x1, y1, z1`).
///
/// Streaks come and go, so a line buffer keeps its capacity and is cleared
/// and refilled rather than reallocated.
#[derive(Debug, Clone, Default)]
pub struct LineBuffer {
    positions: Vec<f32>,
}

impl LineBuffer {
    /// Empty buffer with room for `segments` segments.
    pub fn with_capacity(segments: usize) -> Self {
        Self {
            positions: Vec::with_capacity(segments * 6),
        }
    }

    /// Buffer built from a list of segments.
    pub fn from_segments(segments: &[(Vec3, Vec3)]) -> Self {
        let mut buffer = Self::with_capacity(segments.len());
        for &(a, b) in segments {
            buffer.push(a, b);
        }
        buffer
    }

    pub(crate) fn push(&mut self, a: Vec3, b: Vec3) {
        self.positions.extend_from_slice(&a.to_array());
        self.positions.extend_from_slice(&b.to_array());
    }

    pub(crate) fn clear(&mut self) {
        self.positions.clear();
    }

    /// Number of segments currently in the buffer.
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.positions.len() / 6
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Flat `6 * segments` position buffer.
    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Endpoints of segment `i`.
    pub fn segment(&self, i: usize) -> (Vec3, Vec3) {
        let s = &self.positions[i * 6..i * 6 + 6];
        (Vec3::from_slice(&s[0..3]), Vec3::from_slice(&s[3..6]))
    }

    #[cfg(test)]
    fn capacity_segments(&self) -> usize {
        self.positions.capacity() / 6
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_cloud_layout() {
        let mut cloud = PointCloud::with_capacity(2);
        cloud.push(Vec3::new(1.0, 2.0, 3.0), Rgb::new(0.1, 0.2, 0.3), 1.5);
        cloud.push(Vec3::new(4.0, 5.0, 6.0), Rgb::WHITE, 0.5);

        assert_eq!(cloud.len(), 2);
        assert!(cloud.is_consistent());
        assert_eq!(cloud.positions(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(cloud.sizes(), &[1.5, 0.5]);
        assert_eq!(cloud.position(1), Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(cloud.color(0), Rgb::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_set_position_in_place() {
        let mut cloud = PointCloud::with_capacity(1);
        cloud.push(Vec3::ZERO, Rgb::WHITE, 1.0);
        let ptr = cloud.positions().as_ptr();
        cloud.set_position(0, Vec3::splat(2.0));
        assert_eq!(cloud.position(0), Vec3::splat(2.0));
        assert_eq!(ptr, cloud.positions().as_ptr());
    }

    #[test]
    fn test_line_buffer_reuse() {
        let mut lines = LineBuffer::with_capacity(2);
        lines.push(Vec3::ZERO, Vec3::X);
        lines.push(Vec3::Y, Vec3::Z);
        assert_eq!(lines.segment_count(), 2);
        assert_eq!(lines.segment(1), (Vec3::Y, Vec3::Z));

        let cap = lines.capacity_segments();
        lines.clear();
        assert!(lines.is_empty());
        assert_eq!(lines.capacity_segments(), cap);
    }
}
