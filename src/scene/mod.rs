//! Scene Graph System
//!
//! Manages the scene hierarchy and its components:
//! - Node: scene node (parent/child relationships and transform)
//! - Transform: TRS component with cached matrices
//! - Scene: scene container and component pools
//! - Camera: camera component
//! - Light: light source component
//! - Shape: implicit-surface primitive component
//! - TransformSystem: decoupled world-matrix update system

pub mod node;
pub mod transform;
pub mod transform_system;
pub mod scene;
pub mod camera;
pub mod light;
pub mod shape;

pub use node::Node;
pub use transform::Transform;
pub use scene::Scene;
pub use camera::Camera;
pub use light::{Light, LightKind};
pub use shape::{BlendMode, Shape, ShapeKind};

use std::sync::atomic::{AtomicU64, Ordering};

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
    pub struct ShapeKey;
    pub struct CameraKey;
    pub struct LightKey;
}

static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(1);

/// Hands out creation-ordered ids for shapes and lights.
///
/// Slotmap keys are recycled on removal, so they cannot serve as a
/// deterministic ordering; these ids are monotonic for the process lifetime.
pub(crate) fn next_entity_id() -> u64 {
    NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed)
}
