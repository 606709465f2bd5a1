//! GPU Record Layouts
//!
//! Fixed-layout structs mirrored field-for-field by the raymarch kernel.
//! Both sides read the same bytes, so these layouts are a binary contract:
//! any change here must be made in `shaders/raymarch.wgsl` as well, and the
//! other way around.
//!
//! All records are tightly packed from 4-byte scalar fields (`[f32; 3]`
//! instead of `Vec3`, which would introduce padding). The WGSL mirrors use
//! scalar struct members for the same reason; only trailing `vec4` fields
//! fall on naturally 16-aligned offsets and keep their vector type.
//!
//! # ShapeRecord (64 bytes)
//!
//! | Offset | Field          | Type   |
//! |--------|----------------|--------|
//! | 0      | shape_kind     | i32    |
//! | 4      | blend_mode     | i32    |
//! | 8      | blend_strength | f32    |
//! | 12     | position       | f32 x3 |
//! | 24     | scale          | f32 x3 |
//! | 36     | rotation       | f32 x3 |
//! | 48     | color          | f32 x4 |
//!
//! # LightRecord (52 bytes)
//!
//! | Offset | Field     | Type   |
//! |--------|-----------|--------|
//! | 0      | range     | f32    |
//! | 4      | angle     | f32    |
//! | 8      | intensity | f32    |
//! | 12     | direction | f32 x3 |
//! | 24     | position  | f32 x3 |
//! | 36     | color     | f32 x4 |

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};

/// Byte size of one serialized shape.
pub const SHAPE_RECORD_SIZE: usize = 64;

/// Byte size of one serialized light.
pub const LIGHT_RECORD_SIZE: usize = 52;

/// `angle` value marking a light as omnidirectional (point, directional).
pub const OMNI_LIGHT_ANGLE: f32 = 360.0;

/// Serialized form of one shape, as consumed by the kernel's shape storage
/// buffer.
///
/// `position`, `scale`, and `rotation` are world-space: translation,
/// half-extents, and XYZ Euler angles in radians. `shape_kind` and
/// `blend_mode` carry the raw enum discriminants.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ShapeRecord {
    pub shape_kind: i32,
    pub blend_mode: i32,
    pub blend_strength: f32,
    pub position: [f32; 3],
    pub scale: [f32; 3],
    pub rotation: [f32; 3],
    pub color: [f32; 4],
}

/// Serialized form of one light, as consumed by the kernel's light storage
/// buffer.
///
/// Directional lights use `f32::INFINITY` for `range` and for every
/// `position` component; the kernel never reads a directional light's
/// position. `angle` is [`OMNI_LIGHT_ANGLE`] except for spot lights, where
/// it carries the configured cone angle in degrees.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LightRecord {
    pub range: f32,
    pub angle: f32,
    pub intensity: f32,
    pub direction: [f32; 3],
    pub position: [f32; 3],
    pub color: [f32; 4],
}

/// Per-frame uniforms bound alongside the record buffers.
///
/// 176 bytes; the `pad` tail keeps the size a multiple of 16 for uniform
/// binding.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct KernelUniforms {
    pub camera_to_world: Mat4,
    pub projection_inverse: Mat4,
    pub ambient_color: Vec4,
    pub ambient_intensity: f32,
    pub soft_shadow_coef: f32,
    pub num_shapes: u32,
    pub num_lights: u32,
    pub paint_normals: u32,
    pub pad: [u32; 3],
}

impl Default for KernelUniforms {
    fn default() -> Self {
        Self {
            camera_to_world: Mat4::IDENTITY,
            projection_inverse: Mat4::IDENTITY,
            ambient_color: Vec4::ONE,
            ambient_intensity: 0.1,
            soft_shadow_coef: 4.0,
            num_shapes: 0,
            num_lights: 0,
            paint_normals: 0,
            pad: [0; 3],
        }
    }
}

// Layout drift fails the build, not the frame.
const _: () = assert!(size_of::<ShapeRecord>() == SHAPE_RECORD_SIZE);
const _: () = assert!(size_of::<LightRecord>() == LIGHT_RECORD_SIZE);
const _: () = assert!(size_of::<KernelUniforms>() == 176);

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::offset_of;

    #[test]
    fn shape_record_field_offsets() {
        assert_eq!(offset_of!(ShapeRecord, shape_kind), 0);
        assert_eq!(offset_of!(ShapeRecord, blend_mode), 4);
        assert_eq!(offset_of!(ShapeRecord, blend_strength), 8);
        assert_eq!(offset_of!(ShapeRecord, position), 12);
        assert_eq!(offset_of!(ShapeRecord, scale), 24);
        assert_eq!(offset_of!(ShapeRecord, rotation), 36);
        assert_eq!(offset_of!(ShapeRecord, color), 48);
    }

    #[test]
    fn light_record_field_offsets() {
        assert_eq!(offset_of!(LightRecord, range), 0);
        assert_eq!(offset_of!(LightRecord, angle), 4);
        assert_eq!(offset_of!(LightRecord, intensity), 8);
        assert_eq!(offset_of!(LightRecord, direction), 12);
        assert_eq!(offset_of!(LightRecord, position), 24);
        assert_eq!(offset_of!(LightRecord, color), 36);
    }

    #[test]
    fn kernel_uniforms_field_offsets() {
        assert_eq!(offset_of!(KernelUniforms, camera_to_world), 0);
        assert_eq!(offset_of!(KernelUniforms, projection_inverse), 64);
        assert_eq!(offset_of!(KernelUniforms, ambient_color), 128);
        assert_eq!(offset_of!(KernelUniforms, ambient_intensity), 144);
        assert_eq!(offset_of!(KernelUniforms, soft_shadow_coef), 148);
        assert_eq!(offset_of!(KernelUniforms, num_shapes), 152);
        assert_eq!(offset_of!(KernelUniforms, num_lights), 156);
        assert_eq!(offset_of!(KernelUniforms, paint_normals), 160);
    }

    #[test]
    fn uniforms_size_is_16_aligned() {
        assert_eq!(size_of::<KernelUniforms>() % 16, 0, "Uniforms not aligned to 16 bytes");
    }
}
