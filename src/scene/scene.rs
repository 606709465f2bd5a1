use std::sync::atomic::{AtomicU32, Ordering};

use glam::Affine3A;
use slotmap::{SlotMap, SparseSecondaryMap};

use crate::scene::camera::Camera;
use crate::scene::light::Light;
use crate::scene::node::Node;
use crate::scene::shape::Shape;
use crate::scene::transform::Transform;
use crate::scene::transform_system;
use crate::scene::{CameraKey, LightKey, NodeHandle, ShapeKey};

static NEXT_SCENE_ID: AtomicU32 = AtomicU32::new(1);

/// Scene graph container.
///
/// `Scene` is a pure data layer: nodes hold hierarchy and transforms, while
/// components (shapes, lights, cameras) live in [`SlotMap`] pools and are
/// associated to nodes through secondary maps. The renderer consumes scenes
/// read-only through per-frame extraction and never stores references into
/// them.
pub struct Scene {
    pub id: u32,

    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,

    // ==== Component pools ====
    pub shapes: SlotMap<ShapeKey, Shape>,
    pub cameras: SlotMap<CameraKey, Camera>,
    pub lights: SlotMap<LightKey, Light>,

    // ==== Node → component attachments ====
    shape_components: SparseSecondaryMap<NodeHandle, ShapeKey>,
    camera_components: SparseSecondaryMap<NodeHandle, CameraKey>,
    light_components: SparseSecondaryMap<NodeHandle, LightKey>,
    names: SparseSecondaryMap<NodeHandle, String>,

    /// Node rendered from when the host does not name a camera explicitly.
    pub active_camera: Option<NodeHandle>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed),

            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),

            shapes: SlotMap::with_key(),
            cameras: SlotMap::with_key(),
            lights: SlotMap::with_key(),

            shape_components: SparseSecondaryMap::new(),
            camera_components: SparseSecondaryMap::new(),
            light_components: SparseSecondaryMap::new(),
            names: SparseSecondaryMap::new(),

            active_camera: None,
        }
    }

    // ========================================================================
    // Node creation & removal
    // ========================================================================

    /// Creates an empty node attached to the scene root.
    pub fn create_node(&mut self) -> NodeHandle {
        self.add_node(Node::new())
    }

    /// Creates a named node attached to the scene root.
    pub fn create_node_with_name(&mut self, name: &str) -> NodeHandle {
        let handle = self.create_node();
        self.names.insert(handle, name.to_string());
        handle
    }

    pub fn set_name(&mut self, handle: NodeHandle, name: &str) {
        self.names.insert(handle, name.to_string());
    }

    #[must_use]
    pub fn get_name(&self, handle: NodeHandle) -> Option<&str> {
        self.names.get(handle).map(String::as_str)
    }

    /// Adds a node to the scene as a root node.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    /// Adds a node as a child of `parent`.
    pub fn add_to_parent(&mut self, child: Node, parent: NodeHandle) -> NodeHandle {
        let handle = self.nodes.insert(child);

        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(handle);
        }
        if let Some(c) = self.nodes.get_mut(handle) {
            c.parent = Some(parent);
        }

        handle
    }

    /// Removes a node and its entire subtree, including attached components.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        // Take the children list first to avoid borrow conflicts
        let children = if let Some(node) = self.nodes.get(handle) {
            node.children.clone()
        } else {
            return;
        };

        for child in children {
            self.remove_node(child);
        }

        // Unlink from the parent (or the root list)
        let parent_opt = self.nodes.get(handle).and_then(|n| n.parent);
        if let Some(parent) = parent_opt {
            if let Some(p) = self.nodes.get_mut(parent)
                && let Some(pos) = p.children.iter().position(|&x| x == handle)
            {
                p.children.remove(pos);
            }
        } else if let Some(pos) = self.root_nodes.iter().position(|&x| x == handle) {
            self.root_nodes.remove(pos);
        }

        // Drop attached components
        if let Some(shape_key) = self.shape_components.remove(handle) {
            self.shapes.remove(shape_key);
        }
        if let Some(camera_key) = self.camera_components.remove(handle) {
            self.cameras.remove(camera_key);
        }
        if let Some(light_key) = self.light_components.remove(handle) {
            self.lights.remove(light_key);
        }
        self.names.remove(handle);

        if self.active_camera == Some(handle) {
            self.active_camera = None;
        }

        self.nodes.remove(handle);
    }

    /// Re-parents `child` under `parent`, detaching it from its old parent
    /// (or the root list) first.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent {
            log::warn!("Cannot attach node to itself!");
            return;
        }

        // 1. Detach from old
        let old_parent = self.nodes.get(child).and_then(|n| n.parent);
        if let Some(p) = old_parent {
            if let Some(n) = self.nodes.get_mut(p)
                && let Some(i) = n.children.iter().position(|&x| x == child)
            {
                n.children.remove(i);
            }
        } else if let Some(i) = self.root_nodes.iter().position(|&x| x == child) {
            self.root_nodes.remove(i);
        }

        // 2. Attach to new
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        } else {
            log::error!("Parent node not found during attach!");
            // Put the child back on the root list so it is not orphaned
            self.root_nodes.push(child);
            return;
        }

        // 3. Update the child; force a matrix refresh under the new parent
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
            c.transform.mark_dirty();
        }
    }

    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    // ========================================================================
    // Component management
    // ========================================================================

    /// Attaches a shape component to `handle`, replacing any previous one.
    pub fn set_shape(&mut self, handle: NodeHandle, shape: Shape) -> ShapeKey {
        if let Some(old) = self.shape_components.remove(handle) {
            self.shapes.remove(old);
        }
        let key = self.shapes.insert(shape);
        self.shape_components.insert(handle, key);
        key
    }

    #[must_use]
    pub fn get_shape(&self, handle: NodeHandle) -> Option<&Shape> {
        let key = self.shape_components.get(handle)?;
        self.shapes.get(*key)
    }

    pub fn get_shape_mut(&mut self, handle: NodeHandle) -> Option<&mut Shape> {
        let key = self.shape_components.get(handle)?;
        self.shapes.get_mut(*key)
    }

    /// Attaches a camera component to `handle`, replacing any previous one.
    pub fn set_camera(&mut self, handle: NodeHandle, camera: Camera) -> CameraKey {
        if let Some(old) = self.camera_components.remove(handle) {
            self.cameras.remove(old);
        }
        let key = self.cameras.insert(camera);
        self.camera_components.insert(handle, key);

        // The transform system only syncs camera caches when the world matrix
        // changes; a freshly attached camera on a clean node would otherwise
        // keep its identity view until the node next moves.
        if let Some(node) = self.nodes.get_mut(handle) {
            node.transform.mark_dirty();
        }
        key
    }

    #[must_use]
    pub fn get_camera(&self, handle: NodeHandle) -> Option<&Camera> {
        let key = self.camera_components.get(handle)?;
        self.cameras.get(*key)
    }

    pub fn get_camera_mut(&mut self, handle: NodeHandle) -> Option<&mut Camera> {
        let key = self.camera_components.get(handle)?;
        self.cameras.get_mut(*key)
    }

    /// Attaches a light component to `handle`, replacing any previous one.
    pub fn set_light(&mut self, handle: NodeHandle, light: Light) -> LightKey {
        if let Some(old) = self.light_components.remove(handle) {
            self.lights.remove(old);
        }
        let key = self.lights.insert(light);
        self.light_components.insert(handle, key);
        key
    }

    #[must_use]
    pub fn get_light(&self, handle: NodeHandle) -> Option<&Light> {
        let key = self.light_components.get(handle)?;
        self.lights.get(*key)
    }

    pub fn get_light_mut(&mut self, handle: NodeHandle) -> Option<&mut Light> {
        let key = self.light_components.get(handle)?;
        self.lights.get_mut(*key)
    }

    // ========================================================================
    // Convenience constructors (node + component in one step)
    // ========================================================================

    /// Creates a root node carrying `shape` and returns its handle.
    pub fn add_shape(&mut self, shape: Shape) -> NodeHandle {
        let handle = self.create_node_with_name("Shape");
        self.set_shape(handle, shape);
        handle
    }

    /// Creates a root node carrying `camera` and returns its handle.
    pub fn add_camera(&mut self, camera: Camera) -> NodeHandle {
        let handle = self.create_node_with_name("Camera");
        self.set_camera(handle, camera);
        handle
    }

    /// Creates a root node carrying `light` and returns its handle.
    pub fn add_light(&mut self, light: Light) -> NodeHandle {
        let handle = self.create_node_with_name("Light");
        self.set_light(handle, light);
        handle
    }

    // ========================================================================
    // Component queries
    // ========================================================================

    /// Returns the active camera's (Transform, Camera) pair.
    pub fn query_main_camera_bundle(&mut self) -> Option<(&mut Transform, &mut Camera)> {
        let node_handle = self.active_camera?;
        self.query_camera_bundle(node_handle)
    }

    pub fn query_camera_bundle(
        &mut self,
        handle: NodeHandle,
    ) -> Option<(&mut Transform, &mut Camera)> {
        let camera_key = *self.camera_components.get(handle)?;
        let camera = self.cameras.get_mut(camera_key)?;
        let transform = &mut self.nodes.get_mut(handle)?.transform;
        Some((transform, camera))
    }

    pub fn query_light_bundle(&mut self, handle: NodeHandle) -> Option<(&mut Transform, &Light)> {
        let light_key = *self.light_components.get(handle)?;
        let light = self.lights.get(light_key)?;
        let transform = &mut self.nodes.get_mut(handle)?.transform;
        Some((transform, light))
    }

    pub fn query_shape_bundle(&mut self, handle: NodeHandle) -> Option<(&mut Transform, &Shape)> {
        let shape_key = *self.shape_components.get(handle)?;
        let shape = self.shapes.get(shape_key)?;
        let transform = &mut self.nodes.get_mut(handle)?.transform;
        Some((transform, shape))
    }

    // ========================================================================
    // Active-component iteration
    // ========================================================================

    /// Iterates all shapes on visible nodes, with their world matrices.
    ///
    /// Attachments whose node or pool entry no longer exists are skipped
    /// with a warning rather than aborting the frame.
    pub fn iter_active_shapes(&self) -> impl Iterator<Item = (&Shape, &Affine3A)> {
        self.shape_components.iter().filter_map(|(handle, key)| {
            let Some(node) = self.nodes.get(handle) else {
                log::warn!("Shape attachment references a removed node; skipping");
                return None;
            };
            if !node.visible {
                return None;
            }
            let Some(shape) = self.shapes.get(*key) else {
                log::warn!("Node references a removed shape component; skipping");
                return None;
            };
            Some((shape, &node.transform.world_matrix))
        })
    }

    /// Iterates all lights on visible nodes, with their world matrices.
    ///
    /// Dangling attachments are skipped with a warning, same as shapes.
    pub fn iter_active_lights(&self) -> impl Iterator<Item = (&Light, &Affine3A)> {
        self.light_components.iter().filter_map(|(handle, key)| {
            let Some(node) = self.nodes.get(handle) else {
                log::warn!("Light attachment references a removed node; skipping");
                return None;
            };
            if !node.visible {
                return None;
            }
            let Some(light) = self.lights.get(*key) else {
                log::warn!("Node references a removed light component; skipping");
                return None;
            };
            Some((light, &node.transform.world_matrix))
        })
    }

    // ========================================================================
    // World-matrix update pipeline
    // ========================================================================

    /// Updates world matrices for the whole scene.
    ///
    /// Must run before extraction each frame; the renderer calls it at frame
    /// entry.
    pub fn update_matrix_world(&mut self) {
        // Iterative traversal avoids stack overflow on deep hierarchies
        transform_system::update_hierarchy_iterative(
            &mut self.nodes,
            &mut self.cameras,
            &self.camera_components,
            &self.root_nodes,
        );
    }

    /// Updates world matrices for the subtree rooted at `handle` only.
    pub fn update_subtree(&mut self, handle: NodeHandle) {
        transform_system::update_subtree(
            &mut self.nodes,
            &mut self.cameras,
            &self.camera_components,
            handle,
        );
    }
}
