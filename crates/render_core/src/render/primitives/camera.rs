//! # Camera
//!
//! A camera is a projection matrix plus a right-handed view matrix (view
//! space looks down -Z). The fixed-function pipeline mirrors world z on
//! upload; the camera itself is never modified by the render state.

use crate::foundation::math::{utils, Mat4, Point3, Vec3};

/// Projection and view matrices for one viewpoint
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    projection: Mat4,
    view: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Mat4::identity(), Mat4::identity())
    }
}

impl Camera {
    /// Create a camera from explicit matrices
    pub fn new(projection: Mat4, view: Mat4) -> Self {
        Self { projection, view }
    }

    /// Create a perspective camera at the origin
    ///
    /// # Arguments
    /// * `fov_degrees` - Vertical field of view in degrees
    /// * `aspect` - Viewport width / height
    /// * `near` - Distance to the near plane (must be > 0)
    /// * `far` - Distance to the far plane (must be > near)
    pub fn perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let projection = Mat4::new_perspective(aspect, utils::deg_to_rad(fov_degrees), near, far);
        Self::new(projection, Mat4::identity())
    }

    /// Create an orthographic camera, typically for 2D overlays
    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        Self::new(
            Mat4::new_orthographic(left, right, bottom, top, near, far),
            Mat4::identity(),
        )
    }

    /// Point the camera from `eye` at `target`
    pub fn look_at(&mut self, eye: Point3, target: Point3, up: Vec3) {
        self.view = Mat4::look_at_rh(&eye, &target, &up);
        log::trace!("Camera view updated: eye={:?} target={:?}", eye, target);
    }

    /// Replace the projection matrix
    pub fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
    }

    /// Replace the view matrix
    pub fn set_view(&mut self, view: Mat4) {
        self.view = view;
    }

    /// Projection matrix
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection
    }

    /// View matrix
    pub fn view_matrix(&self) -> &Mat4 {
        &self.view
    }

    /// Projection * view
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}
