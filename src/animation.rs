//! Simple Per-Node Animators
//!
//! Small, independent animations that mutate node transforms between frames:
//! - [`Spin`]: continuous rotation about a world axis
//! - [`Orbit`]: circular motion in the XZ plane about a captured origin
//!
//! Animators are owned by an [`AnimationSystem`] keyed by node handle and
//! advanced once per tick with the frame delta time. They touch only the
//! scene graph; the renderer never sees them.

use glam::{Quat, Vec3};
use slotmap::SparseSecondaryMap;

use crate::scene::transform::Transform;
use crate::scene::{NodeHandle, Scene};

/// World axis a [`Spin`] rotates about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinAxis {
    X,
    Y,
    Z,
}

impl SpinAxis {
    #[inline]
    #[must_use]
    fn unit(self) -> Vec3 {
        match self {
            Self::X => Vec3::X,
            Self::Y => Vec3::Y,
            Self::Z => Vec3::Z,
        }
    }
}

/// Continuous rotation about a world axis at a fixed angular velocity.
#[derive(Debug, Clone)]
pub struct Spin {
    pub axis: SpinAxis,
    /// Angular velocity in radians per second.
    pub speed: f32,

    total_angle: f32,
    /// Node rotation at the first tick; the accumulated spin composes onto
    /// it so re-targeting an animator never snaps the node.
    base_rotation: Option<Quat>,
}

impl Spin {
    #[must_use]
    pub fn new(axis: SpinAxis, speed: f32) -> Self {
        Self {
            axis,
            speed,
            total_angle: 0.0,
            base_rotation: None,
        }
    }

    fn apply(&mut self, transform: &mut Transform, dt: f32) {
        let base = *self.base_rotation.get_or_insert(transform.rotation);
        self.total_angle += self.speed * dt;
        transform.rotation = Quat::from_axis_angle(self.axis.unit(), self.total_angle) * base;
    }
}

/// Circular motion in the XZ plane around the node's captured start position.
#[derive(Debug, Clone)]
pub struct Orbit {
    pub radius: f32,
    /// Phase offset in radians, for staggering several orbiters.
    pub phase: f32,
    /// Angular velocity in radians per second.
    pub speed: f32,

    timer: f32,
    /// Center of the orbit, captured from the node on the first tick.
    origin: Option<Vec3>,
}

impl Orbit {
    #[must_use]
    pub fn new(radius: f32, phase: f32, speed: f32) -> Self {
        Self {
            radius,
            phase,
            speed,
            timer: 0.0,
            origin: None,
        }
    }

    fn apply(&mut self, transform: &mut Transform, dt: f32) {
        let origin = *self.origin.get_or_insert(transform.position);
        self.timer += self.speed * dt;
        let x = (self.timer + self.phase).cos();
        let z = (self.timer + self.phase).sin();
        transform.position = origin + self.radius * Vec3::new(x, 0.0, z);
    }
}

/// A single per-node animation behavior.
#[derive(Debug, Clone)]
pub enum Animator {
    Spin(Spin),
    Orbit(Orbit),
}

impl Animator {
    fn apply(&mut self, transform: &mut Transform, dt: f32) {
        match self {
            Self::Spin(spin) => spin.apply(transform, dt),
            Self::Orbit(orbit) => orbit.apply(transform, dt),
        }
    }
}

/// Owns the animators of a scene and drives them each tick.
#[derive(Debug, Default)]
pub struct AnimationSystem {
    animators: SparseSecondaryMap<NodeHandle, Animator>,
}

impl AnimationSystem {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches an animator to `handle`, replacing any previous one.
    pub fn set(&mut self, handle: NodeHandle, animator: Animator) {
        self.animators.insert(handle, animator);
    }

    pub fn remove(&mut self, handle: NodeHandle) {
        self.animators.remove(handle);
    }

    /// Advances every animator by `dt` seconds, writing node transforms.
    ///
    /// Animators whose node has been removed are skipped; they are cleaned
    /// up lazily on the next [`set`](Self::set) for the recycled handle.
    pub fn advance(&mut self, scene: &mut Scene, dt: f32) {
        for (handle, animator) in &mut self.animators {
            if let Some(node) = scene.get_node_mut(handle) {
                animator.apply(&mut node.transform, dt);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn orbit_preserves_radius_about_origin() {
        let mut scene = Scene::new();
        let handle = scene.create_node();
        scene.get_node_mut(handle).unwrap().transform.position = Vec3::new(4.0, 2.0, -1.0);

        let mut system = AnimationSystem::new();
        system.set(handle, Animator::Orbit(Orbit::new(3.0, 0.5, 1.0)));

        for _ in 0..10 {
            system.advance(&mut scene, 0.25);
            let pos = scene.get_node(handle).unwrap().transform.position;
            let offset = pos - Vec3::new(4.0, 2.0, -1.0);
            assert!((offset.length() - 3.0).abs() < EPSILON);
            assert!(offset.y.abs() < EPSILON, "Orbit must stay in the XZ plane");
        }
    }

    #[test]
    fn spin_preserves_position() {
        let mut scene = Scene::new();
        let handle = scene.create_node();
        scene.get_node_mut(handle).unwrap().transform.position = Vec3::new(1.0, 2.0, 3.0);

        let mut system = AnimationSystem::new();
        system.set(handle, Animator::Spin(Spin::new(SpinAxis::Y, 1.0)));

        system.advance(&mut scene, 0.5);
        system.advance(&mut scene, 0.5);

        let transform = &scene.get_node(handle).unwrap().transform;
        assert_eq!(transform.position, Vec3::new(1.0, 2.0, 3.0));

        // One radian of accumulated yaw after two half-second ticks
        let (axis, angle) = transform.rotation.to_axis_angle();
        assert!((angle - 1.0).abs() < 1e-4);
        assert!((axis.y.abs() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn advance_skips_removed_nodes() {
        let mut scene = Scene::new();
        let handle = scene.create_node();

        let mut system = AnimationSystem::new();
        system.set(handle, Animator::Orbit(Orbit::new(1.0, 0.0, 1.0)));

        scene.remove_node(handle);
        // Must not panic
        system.advance(&mut scene, 0.1);
    }
}
