use glam::{Vec3, Vec4};

use crate::scene::next_entity_id;

/// Implicit-surface primitive classes evaluated by the raymarch kernel.
///
/// Discriminants are part of the GPU contract: the kernel switches on the
/// raw value, so the order here must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ShapeKind {
    Cube = 0,
    Sphere = 1,
    Torus = 2,
    /// Horizontal ground plane; extents come from the node scale.
    FloorPlane = 3,
    /// Vertical backdrop plane behind the scene.
    BackgroundPlane = 4,
}

/// How a shape's distance field combines with the fields accumulated before
/// it.
///
/// The compiled shape stream is ordered by this enum ascending, so a shape's
/// operation always applies to the union of everything that sorts before it.
/// Discriminants are part of the GPU contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(i32)]
pub enum BlendMode {
    /// Plain union.
    None = 0,
    /// Smooth union, feathered by `blend_strength`.
    Blend = 1,
    /// Subtraction: carves this shape out of the accumulated field.
    Cut = 2,
    /// Intersection: keeps only the overlap with the accumulated field.
    Mask = 3,
}

/// Raymarched primitive component.
///
/// Geometry (position, extents, orientation) comes from the owning node's
/// transform; the component itself only carries the surface class, the
/// field-combination parameters, and the albedo color.
#[derive(Debug, Clone)]
pub struct Shape {
    /// Stable creation-ordered id, the deterministic tie-break when records
    /// are compiled for the GPU.
    pub id: u64,
    pub kind: ShapeKind,
    pub blend: BlendMode,
    /// Smooth-union feather, meaningful for [`BlendMode::Blend`]. Clamped to
    /// `[0, 1]` at record build time.
    pub blend_strength: f32,
    /// RGBA albedo.
    pub color: Vec4,
}

impl Shape {
    #[must_use]
    pub fn new(kind: ShapeKind, color: Vec4) -> Self {
        Self {
            id: next_entity_id(),
            kind,
            blend: BlendMode::None,
            blend_strength: 0.0,
            color,
        }
    }

    /// Sets the blend operation, builder-style.
    #[must_use]
    pub fn with_blend(mut self, blend: BlendMode, strength: f32) -> Self {
        self.blend = blend;
        self.blend_strength = strength;
        self
    }

    /// Opaque white cube, the cheapest starting point for scene authoring.
    #[must_use]
    pub fn cube() -> Self {
        Self::new(ShapeKind::Cube, Vec4::ONE)
    }

    #[must_use]
    pub fn sphere(color: Vec4) -> Self {
        Self::new(ShapeKind::Sphere, color)
    }

    #[must_use]
    pub fn torus(color: Vec4) -> Self {
        Self::new(ShapeKind::Torus, color)
    }

    #[must_use]
    pub fn floor_plane(color: Vec3) -> Self {
        Self::new(ShapeKind::FloorPlane, color.extend(1.0))
    }

    #[must_use]
    pub fn background_plane(color: Vec3) -> Self {
        Self::new(ShapeKind::BackgroundPlane, color.extend(1.0))
    }
}
