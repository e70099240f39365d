//! WGSL source and uniform layout for the field pipeline.

use bytemuck::{Pod, Zeroable};

/// Per-frame uniforms. Layout mirrors `FrameUniforms` in [`FIELD_SHADER`].
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct FrameUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub light_position: [f32; 3],
    pub light_intensity: f32,
    pub light_color: [f32; 3],
    pub point_size: f32,
    pub aspect: f32,
    pub opacity: f32,
    pub light_size: f32,
    pub particle_count: u32,
}

/// Instances `0..particle_count` are particles read from the storage
/// buffers; instance `particle_count`, when drawn, is the light halo. Each instance is a
/// camera-facing quad whose clip-space half size is constant, so it shrinks
/// with distance like a size-attenuated point.
pub const FIELD_SHADER: &str = r#"
struct FrameUniforms {
    view_proj: mat4x4<f32>,
    model: mat4x4<f32>,
    light_position: vec3<f32>,
    light_intensity: f32,
    light_color: vec3<f32>,
    point_size: f32,
    aspect: f32,
    opacity: f32,
    light_size: f32,
    particle_count: u32,
};

@group(0) @binding(0)
var<uniform> uniforms: FrameUniforms;

@group(0) @binding(1)
var<storage, read> positions: array<f32>;

@group(0) @binding(2)
var<storage, read> colors: array<f32>;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) alpha: f32,
    @location(3) @interpolate(flat) halo: u32,
};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @builtin(instance_index) instance_index: u32,
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

    var world_pos: vec4<f32>;
    var color: vec3<f32>;
    var size: f32;
    var alpha: f32;
    var halo: u32;

    if instance_index < uniforms.particle_count {
        let base = instance_index * 3u;
        let local = vec3<f32>(positions[base], positions[base + 1u], positions[base + 2u]);
        world_pos = uniforms.model * vec4<f32>(local, 1.0);
        color = vec3<f32>(colors[base], colors[base + 1u], colors[base + 2u]);
        size = uniforms.point_size;
        alpha = uniforms.opacity;
        halo = 0u;
    } else {
        world_pos = vec4<f32>(uniforms.light_position, 1.0);
        color = uniforms.light_color * (uniforms.light_intensity / 3.0);
        size = uniforms.light_size;
        alpha = 1.0;
        halo = 1u;
    }

    var clip_pos = uniforms.view_proj * world_pos;
    clip_pos.x += quad_pos.x * size * 0.5 / uniforms.aspect;
    clip_pos.y += quad_pos.y * size * 0.5;

    var out: VertexOutput;
    out.clip_position = clip_pos;
    out.color = color;
    out.uv = quad_pos;
    out.alpha = alpha;
    out.halo = halo;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    if in.halo == 0u {
        return vec4<f32>(in.color, in.alpha);
    }

    let dist = length(in.uv);
    if dist > 1.0 {
        discard;
    }
    let glow = 1.0 - smoothstep(0.0, 1.0, dist);
    return vec4<f32>(in.color, in.alpha * glow);
}
"#;
