use glam::Vec3;

use crate::scene::next_entity_id;

#[derive(Debug, Clone)]
pub struct DirectionalLight {}

#[derive(Debug, Clone)]
pub struct PointLight {
    /// Falloff range in world units.
    pub range: f32,
}

#[derive(Debug, Clone)]
pub struct SpotLight {
    /// Falloff range in world units.
    pub range: f32,
    /// Cone angle in degrees, uploaded to the kernel verbatim.
    pub cone_angle: f32,
}

// High-level abstraction: light component in the scene
#[derive(Debug, Clone)]
pub enum LightKind {
    Directional(DirectionalLight),
    Point(PointLight),
    Spot(SpotLight),
}

/// Light source component.
///
/// The light's direction comes from the owning node's orientation (forward
/// axis, -Z); its position from the node's world translation. Only color,
/// intensity, and the class-specific parameters live here.
#[derive(Debug, Clone)]
pub struct Light {
    /// Stable creation-ordered id, the deterministic tie-break when records
    /// are compiled for the GPU.
    pub id: u64,
    pub color: Vec3,
    pub intensity: f32,
    pub kind: LightKind,
}

impl Light {
    #[must_use]
    pub fn new_directional(color: Vec3, intensity: f32) -> Self {
        Self {
            id: next_entity_id(),
            color,
            intensity,
            kind: LightKind::Directional(DirectionalLight {}),
        }
    }

    #[must_use]
    pub fn new_point(color: Vec3, intensity: f32, range: f32) -> Self {
        Self {
            id: next_entity_id(),
            color,
            intensity,
            kind: LightKind::Point(PointLight { range }),
        }
    }

    #[must_use]
    pub fn new_spot(color: Vec3, intensity: f32, range: f32, cone_angle: f32) -> Self {
        Self {
            id: next_entity_id(),
            color,
            intensity,
            kind: LightKind::Spot(SpotLight { range, cone_angle }),
        }
    }
}
