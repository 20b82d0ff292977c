//! GPU-side records and shaders for drawing a [`Scene`](crate::Scene).
//!
//! The scene keeps its buffers in local space. Packing bakes each
//! drawable's model matrix into world-space records so the whole frame is
//! two uploads and two draw calls: one instanced quad draw for every point
//! group and one line-list draw for every line group.
//!
//! Colours arrive as sRGB; the shaders convert to linear before blending.
//! Both pipelines blend additively (`One + One`) with premultiplied output
//! and no depth writes.

use crate::buffers::{LineBuffer, PointCloud};
use crate::color::Rgb;
use crate::scene::{Drawable, Geometry};
use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// One point sprite, drawn as an instanced camera-facing quad.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct PointInstance {
    /// World-space centre.
    pub position: [f32; 3],
    /// World-space diameter before the camera's point scale.
    pub size: f32,
    /// sRGB colour and opacity.
    pub color: [f32; 4],
}

impl PointInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32, 2 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PointInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// One end of a line segment.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    /// sRGB colour and opacity.
    pub color: [f32; 4],
}

impl LineVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Per-frame camera uniforms shared by both pipelines.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Uniforms {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    /// `tan(fov_y / 2)`: converts a point size into a world-space diameter
    /// that keeps its apparent size under perspective.
    pub point_scale: f32,
    pub time: f32,
    pub _padding: [f32; 2],
}

impl Uniforms {
    pub fn new(view: Mat4, proj: Mat4, fov_y: f32, time: f32) -> Self {
        Self {
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
            point_scale: (fov_y * 0.5).tan(),
            time,
            _padding: [0.0; 2],
        }
    }
}

/// Append one point cloud, transformed by `model`.
pub fn pack_points(
    cloud: &PointCloud,
    model: Mat4,
    point_size: f32,
    opacity: f32,
    out: &mut Vec<PointInstance>,
) {
    out.reserve(cloud.len());
    for (i, p) in cloud.iter_positions().enumerate() {
        let c = cloud.color(i);
        out.push(PointInstance {
            position: model.transform_point3(p).to_array(),
            size: point_size * cloud.sizes()[i],
            color: [c.r(), c.g(), c.b(), opacity],
        });
    }
}

/// Append every segment of a line buffer, transformed by `model`.
pub fn pack_lines(
    lines: &LineBuffer,
    model: Mat4,
    color: Rgb,
    opacity: f32,
    out: &mut Vec<LineVertex>,
) {
    let rgba = [color.r(), color.g(), color.b(), opacity];
    out.reserve(lines.segment_count() * 2);
    for i in 0..lines.segment_count() {
        let (a, b) = lines.segment(i);
        out.push(LineVertex {
            position: model.transform_point3(a).to_array(),
            color: rgba,
        });
        out.push(LineVertex {
            position: model.transform_point3(b).to_array(),
            color: rgba,
        });
    }
}

/// Reusable CPU staging for one frame.
#[derive(Debug, Default)]
pub struct FrameData {
    pub points: Vec<PointInstance>,
    pub lines: Vec<LineVertex>,
}

impl FrameData {
    /// Clear and refill from a frame's drawables, keeping allocations.
    pub fn pack(&mut self, drawables: &[Drawable<'_>]) {
        self.points.clear();
        self.lines.clear();
        for d in drawables {
            match d.geometry {
                Geometry::Points {
                    cloud,
                    point_size,
                    opacity,
                } => pack_points(cloud, d.model, point_size, opacity, &mut self.points),
                Geometry::Lines {
                    lines,
                    color,
                    opacity,
                } => pack_lines(lines, d.model, color, opacity, &mut self.lines),
            }
        }
    }
}

const COMMON_WGSL: &str = r#"struct Uniforms {
    view: mat4x4<f32>,
    proj: mat4x4<f32>,
    point_scale: f32,
    time: f32,
    padding: vec2<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

fn srgb_to_linear(c: vec3<f32>) -> vec3<f32> {
    return pow(max(c, vec3<f32>(0.0)), vec3<f32>(2.2));
}
"#;

const POINTS_WGSL: &str = r#"
struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) uv: vec2<f32>,
};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) position: vec3<f32>,
    @location(1) size: f32,
    @location(2) color: vec4<f32>,
) -> VertexOutput {
    var quad_vertices = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
    );

    let quad_pos = quad_vertices[vertex_index];
    let half_extent = 0.5 * size * uniforms.point_scale;

    // Expand in view space so the quad always faces the camera
    var view_pos = uniforms.view * vec4<f32>(position, 1.0);
    view_pos.x += quad_pos.x * half_extent;
    view_pos.y += quad_pos.y * half_extent;

    var out: VertexOutput;
    out.clip_position = uniforms.proj * view_pos;
    out.color = color;
    out.uv = quad_pos;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let dist = length(in.uv);
    if dist > 1.0 {
        discard;
    }
    let alpha = (1.0 - smoothstep(0.5, 1.0, dist)) * in.color.a;
    return vec4<f32>(srgb_to_linear(in.color.rgb) * alpha, alpha);
}
"#;

const LINES_WGSL: &str = r#"
struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = uniforms.proj * uniforms.view * vec4<f32>(position, 1.0);
    out.color = color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(srgb_to_linear(in.color.rgb) * in.color.a, in.color.a);
}
"#;

/// WGSL for the point-sprite pipeline.
pub fn point_shader() -> String {
    format!("{}{}", COMMON_WGSL, POINTS_WGSL)
}

/// WGSL for the line pipeline.
pub fn line_shader() -> String {
    format!("{}{}", COMMON_WGSL, LINES_WGSL)
}

/// Additive blending for premultiplied output.
pub const ADDITIVE: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    /// Validates WGSL code using naga.
    fn validate_wgsl(code: &str) -> Result<(), String> {
        let module = naga::front::wgsl::parse_str(code)
            .map_err(|e| format!("WGSL parse error: {:?}", e))?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .map_err(|e| format!("WGSL validation error: {:?}", e))?;

        Ok(())
    }

    #[test]
    fn test_point_shader_validates() {
        validate_wgsl(&point_shader()).unwrap();
    }

    #[test]
    fn test_line_shader_validates() {
        validate_wgsl(&line_shader()).unwrap();
    }

    #[test]
    fn test_record_sizes() {
        assert_eq!(std::mem::size_of::<PointInstance>(), 32);
        assert_eq!(std::mem::size_of::<LineVertex>(), 28);
        // Matches the WGSL struct: two mat4 plus 16 bytes
        assert_eq!(std::mem::size_of::<Uniforms>(), 144);
    }

    #[test]
    fn test_pack_points_bakes_model() {
        let mut cloud = PointCloud::with_capacity(1);
        cloud.push(Vec3::new(1.0, 0.0, 0.0), Rgb::new(0.5, 0.25, 1.0), 2.0);
        let model = Mat4::from_translation(Vec3::new(0.0, -2.5, 0.0));

        let mut out = Vec::new();
        pack_points(&cloud, model, 0.1, 0.9, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].position, [1.0, -2.5, 0.0]);
        assert!((out[0].size - 0.2).abs() < 1e-6);
        assert_eq!(out[0].color, [0.5, 0.25, 1.0, 0.9]);
    }

    #[test]
    fn test_pack_lines() {
        let lines = LineBuffer::from_segments(&[(Vec3::ZERO, Vec3::X)]);
        let model = Mat4::from_scale(Vec3::splat(2.0));
        let mut out = Vec::new();
        pack_lines(&lines, model, Rgb::WHITE, 0.6, &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].position, [2.0, 0.0, 0.0]);
        assert_eq!(out[0].color, [1.0, 1.0, 1.0, 0.6]);
        let bytes: &[u8] = bytemuck::cast_slice(&out);
        assert_eq!(bytes.len(), 56);
    }
}
