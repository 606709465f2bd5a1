//! Transform System
//!
//! Performs hierarchical world-matrix updates for the scene graph, decoupled
//! from `Scene` to avoid borrow conflicts. The system only borrows the node
//! `SlotMap`, the camera pool, and the root-node list.

use glam::Affine3A;
use slotmap::{SlotMap, SparseSecondaryMap};

use crate::scene::camera::Camera;
use crate::scene::node::Node;
use crate::scene::{CameraKey, NodeHandle};

/// Updates world matrices for the whole scene hierarchy.
///
/// Uses an explicit stack instead of recursion so deep hierarchies cannot
/// overflow the call stack.
///
/// Cameras attached to updated nodes get their view/projection matrices
/// refreshed in the same pass.
pub fn update_hierarchy_iterative(
    nodes: &mut SlotMap<NodeHandle, Node>,
    cameras: &mut SlotMap<CameraKey, Camera>,
    camera_components: &SparseSecondaryMap<NodeHandle, CameraKey>,
    roots: &[NodeHandle],
) {
    // Work stack: (node handle, parent world matrix, parent changed)
    let mut stack: Vec<(NodeHandle, Affine3A, bool)> = Vec::with_capacity(64);

    for &root_handle in roots.iter().rev() {
        stack.push((root_handle, Affine3A::IDENTITY, false));
    }

    while let Some((node_handle, parent_world_matrix, parent_changed)) = stack.pop() {
        let Some(node) = nodes.get_mut(node_handle) else {
            continue;
        };

        // 1. Update the local matrix
        let local_changed = node.transform.update_local_matrix();
        let world_needs_update = local_changed || parent_changed;

        // 2. Update the world matrix
        if world_needs_update {
            let new_world = parent_world_matrix * *node.transform.local_matrix();
            node.transform.set_world_matrix(new_world);

            // Keep attached cameras in sync
            if let Some(&camera_key) = camera_components.get(node_handle) {
                if let Some(camera) = cameras.get_mut(camera_key) {
                    camera.update_view_projection(&new_world);
                }
            }
        }

        // 3. Collect child info before pushing (avoids double borrow)
        let current_world = node.transform.world_matrix;
        let children_count = node.children.len();

        // 4. Push children in reverse to preserve traversal order
        for i in (0..children_count).rev() {
            if let Some(node) = nodes.get(node_handle) {
                if let Some(&child_handle) = node.children.get(i) {
                    stack.push((child_handle, current_world, world_needs_update));
                }
            }
        }
    }
}

/// Updates the subtree rooted at `root_handle`.
///
/// Used for partial scene-graph refreshes after local mutations.
pub fn update_subtree(
    nodes: &mut SlotMap<NodeHandle, Node>,
    cameras: &mut SlotMap<CameraKey, Camera>,
    camera_components: &SparseSecondaryMap<NodeHandle, CameraKey>,
    root_handle: NodeHandle,
) {
    let parent_world = if let Some(node) = nodes.get(root_handle) {
        if let Some(parent_handle) = node.parent {
            nodes
                .get(parent_handle)
                .map(|p| p.transform.world_matrix)
                .unwrap_or(Affine3A::IDENTITY)
        } else {
            Affine3A::IDENTITY
        }
    } else {
        return;
    };

    update_transform_recursive(
        nodes,
        cameras,
        camera_components,
        root_handle,
        parent_world,
        true,
    );
}

/// Recursively updates a single node and its subtree.
fn update_transform_recursive(
    nodes: &mut SlotMap<NodeHandle, Node>,
    cameras: &mut SlotMap<CameraKey, Camera>,
    camera_components: &SparseSecondaryMap<NodeHandle, CameraKey>,
    node_handle: NodeHandle,
    parent_world_matrix: Affine3A,
    parent_changed: bool,
) {
    // Phase 1: process the current node
    let (current_world_matrix, children_handles, world_needs_update) = {
        let Some(node) = nodes.get_mut(node_handle) else {
            return;
        };

        let local_changed = node.transform.update_local_matrix();
        let world_needs_update = local_changed || parent_changed;

        if world_needs_update {
            let new_world = parent_world_matrix * *node.transform.local_matrix();
            node.transform.set_world_matrix(new_world);

            if let Some(&camera_key) = camera_components.get(node_handle) {
                if let Some(camera) = cameras.get_mut(camera_key) {
                    camera.update_view_projection(&new_world);
                }
            }
        }

        // Collect before releasing the borrow
        let world = node.transform.world_matrix;
        let children: Vec<NodeHandle> = node.children.clone();

        (world, children, world_needs_update)
    };

    // Phase 2: recurse into children
    for child_handle in children_handles {
        update_transform_recursive(
            nodes,
            cameras,
            camera_components,
            child_handle,
            current_world_matrix,
            world_needs_update,
        );
    }
}
