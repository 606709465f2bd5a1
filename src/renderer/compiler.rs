//! Record Compilation
//!
//! Turns the extracted descriptor lists into the byte-exact record streams
//! the kernel reads. This is where the frame's ordering is decided:
//! extraction order is arbitrary, but the compiled output is total-ordered
//! so identical scenes always produce identical buffers.
//!
//! Shapes sort by blend operation first. The kernel folds the shape stream
//! sequentially into one distance field, so carving operations (cut, mask)
//! must see the whole union built up before them; grouping by operation
//! also keeps the result independent of authoring order. Ties fall back to
//! the stable per-entity id.

use crate::renderer::extracted::{ExtractedLight, ExtractedShape};
use crate::renderer::records::{LightRecord, ShapeRecord, OMNI_LIGHT_ANGLE};
use crate::scene::light::LightKind;

/// Kernel thread-group edge length; one group covers an 8x8 pixel tile.
/// Must match the `@workgroup_size` attribute in `shaders/raymarch.wgsl`.
pub const WORKGROUP_SIZE: u32 = 8;

/// Compiles shapes into kernel records, sorted by `(blend, id)`.
#[must_use]
pub fn compile_shapes(shapes: &[ExtractedShape]) -> Vec<ShapeRecord> {
    let mut ordered: Vec<&ExtractedShape> = shapes.iter().collect();
    // Unique ids make the key total, so the unstable sort is deterministic
    ordered.sort_unstable_by_key(|s| (s.blend as u32, s.id));

    ordered
        .iter()
        .map(|s| ShapeRecord {
            shape_kind: s.kind as i32,
            blend_mode: s.blend as i32,
            blend_strength: s.blend_strength.clamp(0.0, 1.0),
            position: s.position.to_array(),
            scale: s.scale.to_array(),
            rotation: s.rotation.to_array(),
            color: s.color.to_array(),
        })
        .collect()
}

/// Compiles lights into kernel records, ordered by id.
///
/// Class rules:
/// - directional: infinite range, omni angle, position left as an infinity
///   sentinel the kernel never reads
/// - point: configured range, omni angle, world position
/// - spot: configured range, cone angle in degrees, world position
#[must_use]
pub fn compile_lights(lights: &[ExtractedLight]) -> Vec<LightRecord> {
    let mut ordered: Vec<&ExtractedLight> = lights.iter().collect();
    ordered.sort_unstable_by_key(|l| l.id);

    ordered
        .iter()
        .map(|l| {
            let (range, angle, position) = match &l.kind {
                LightKind::Directional(_) => {
                    (f32::INFINITY, OMNI_LIGHT_ANGLE, [f32::INFINITY; 3])
                }
                LightKind::Point(point) => {
                    (point.range, OMNI_LIGHT_ANGLE, l.position.to_array())
                }
                LightKind::Spot(spot) => (spot.range, spot.cone_angle, l.position.to_array()),
            };

            LightRecord {
                range,
                angle,
                intensity: l.intensity,
                direction: l.direction.to_array(),
                position,
                color: [l.color.x, l.color.y, l.color.z, 1.0],
            }
        })
        .collect()
}

/// Thread-group counts covering a `width` x `height` viewport.
///
/// Partial edge tiles round up; the kernel bounds-checks against the real
/// viewport size.
#[inline]
#[must_use]
pub fn dispatch_groups(width: u32, height: u32) -> (u32, u32, u32) {
    (
        width.div_ceil(WORKGROUP_SIZE),
        height.div_ceil(WORKGROUP_SIZE),
        1,
    )
}
