use glam::{Affine3A, Mat4};

/// Perspective camera component.
///
/// Holds projection parameters and the matrix caches the renderer reads
/// every frame. The view matrix is derived from the owning node's world
/// matrix by the transform system; callers never set it directly.
#[derive(Debug, Clone)]
pub struct Camera {
    // === Projection properties ===
    /// Vertical field of view in radians.
    pub fov: f32,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    // Cached matrices, read-only for the renderer
    pub(crate) world_matrix: Affine3A,
    pub(crate) view_matrix: Mat4,
    pub(crate) projection_matrix: Mat4,
    pub(crate) projection_matrix_inverse: Mat4,
}

impl Camera {
    /// Creates a perspective camera. `fov` is the vertical field of view in
    /// degrees.
    #[must_use]
    pub fn new_perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            fov: fov.to_radians(),
            aspect,
            near,
            far,

            world_matrix: Affine3A::IDENTITY,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            projection_matrix_inverse: Mat4::IDENTITY,
        };

        cam.update_projection_matrix();
        cam
    }

    /// Rebuilds the projection matrix from the current parameters.
    ///
    /// Call after mutating `fov`, `aspect`, `near`, or `far`.
    pub fn update_projection_matrix(&mut self) {
        // glam's perspective_rh targets the WGPU/Vulkan depth range (0 to 1)
        self.projection_matrix = Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far);
        self.projection_matrix_inverse = self.projection_matrix.inverse();
    }

    /// Updates the aspect ratio, rebuilding the projection when it changed.
    pub fn set_aspect(&mut self, aspect: f32) {
        if (self.aspect - aspect).abs() > f32::EPSILON {
            self.aspect = aspect;
            self.update_projection_matrix();
        }
    }

    /// Refreshes the view matrix from the owning node's world transform.
    ///
    /// Invoked by the transform system whenever the node moved.
    pub fn update_view_projection(&mut self, world_transform: &Affine3A) {
        self.world_matrix = *world_transform;

        // View matrix = world inverse
        self.view_matrix = Mat4::from(*world_transform).inverse();
    }

    /// Camera-to-world matrix, used to transform ray origins and directions
    /// out of camera space.
    #[inline]
    #[must_use]
    pub fn camera_to_world(&self) -> Mat4 {
        Mat4::from(self.world_matrix)
    }

    /// Inverse projection matrix, used to unproject NDC coordinates back to
    /// camera space.
    #[inline]
    #[must_use]
    pub fn projection_inverse(&self) -> Mat4 {
        self.projection_matrix_inverse
    }

    /// Current view matrix (world inverse).
    #[inline]
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }
}
