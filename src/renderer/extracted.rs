//! Frame Extraction
//!
//! Before any GPU work, the renderer snapshots the data it needs out of the
//! scene graph into flat, world-space descriptor lists. After extraction the
//! `Scene` borrow ends; compilation and encoding work only on the snapshot.
//!
//! # Design principles
//! - Copy only what the frame needs: no handles back into scene storage
//! - World-space values are resolved here, once, by decomposing node world
//!   matrices
//! - Output vectors are cleared and refilled to reuse their allocations
//! - Enumeration order is whatever the component maps yield; the compiler
//!   establishes the deterministic order later

use glam::{EulerRot, Vec3, Vec4};

use crate::scene::light::LightKind;
use crate::scene::shape::{BlendMode, ShapeKind};
use crate::scene::Scene;

/// World-space snapshot of one shape, taken at extraction.
///
/// `scale` holds half-extents: authored node scale is the full extent, the
/// kernel's distance functions want the half sizes.
#[derive(Debug, Clone)]
pub struct ExtractedShape {
    /// Stable creation-ordered id, the sort tie-break during compilation.
    pub id: u64,
    pub kind: ShapeKind,
    pub blend: BlendMode,
    pub blend_strength: f32,
    pub color: Vec4,
    /// World translation.
    pub position: Vec3,
    /// World half-extents.
    pub scale: Vec3,
    /// World orientation as XYZ Euler angles in radians.
    pub rotation: Vec3,
}

/// World-space snapshot of one light, taken at extraction.
#[derive(Debug, Clone)]
pub struct ExtractedLight {
    /// Stable creation-ordered id, the sort key during compilation.
    pub id: u64,
    pub kind: LightKind,
    pub color: Vec3,
    pub intensity: f32,
    /// World translation of the owning node.
    pub position: Vec3,
    /// Unit forward axis (-Z) of the owning node.
    pub direction: Vec3,
}

/// Source of per-frame shape and light descriptors.
///
/// The renderer depends on this trait rather than on `Scene` directly, so
/// hosts with their own entity storage can feed the pipeline without going
/// through a scene graph. Implementations must append every currently
/// active descriptor and apply no other filtering; callers never rely on
/// the enumeration order.
pub trait SceneQuery {
    fn collect_shapes(&self, out: &mut Vec<ExtractedShape>);
    fn collect_lights(&self, out: &mut Vec<ExtractedLight>);
}

impl SceneQuery for Scene {
    fn collect_shapes(&self, out: &mut Vec<ExtractedShape>) {
        for (shape, world_matrix) in self.iter_active_shapes() {
            let (scale, rotation, translation) = world_matrix.to_scale_rotation_translation();
            let (rx, ry, rz) = rotation.to_euler(EulerRot::XYZ);

            out.push(ExtractedShape {
                id: shape.id,
                kind: shape.kind,
                blend: shape.blend,
                blend_strength: shape.blend_strength,
                color: shape.color,
                position: translation,
                // Authored scale is the full extent
                scale: scale * 0.5,
                rotation: Vec3::new(rx, ry, rz),
            });
        }
    }

    fn collect_lights(&self, out: &mut Vec<ExtractedLight>) {
        for (light, world_matrix) in self.iter_active_lights() {
            let position = world_matrix.translation.to_vec3();
            let direction = world_matrix.transform_vector3(-Vec3::Z).normalize();

            out.push(ExtractedLight {
                id: light.id,
                kind: light.kind.clone(),
                color: light.color,
                intensity: light.intensity,
                position,
                direction,
            });
        }
    }
}
