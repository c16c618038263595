//! Perspective camera looking down the negative Z axis at a fixed distance.

use std::f32::consts::FRAC_PI_6;

use crate::engine::math::{Mat4, MathError};

/// Projection parameters plus the distance from the eye to the scene origin.
///
/// The camera uses a right-handed coordinate system and outputs column-major
/// matrices suitable for `glUniformMatrix4fv`.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Vertical field of view in radians.
    pub fov_y: f32,

    /// Aspect ratio of the view (width / height).
    pub aspect: f32,

    /// Distance to the near clipping plane.
    pub near: f32,

    /// Distance to the far clipping plane.
    pub far: f32,

    /// How far the scene origin is pushed in front of the eye.
    pub distance: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov_y: FRAC_PI_6,
            aspect: 1.0,
            near: 0.1,
            far: 100.0,
            distance: 5.0,
        }
    }
}

impl Camera {
    /// Creates a camera with the default lens and the given aspect ratio.
    pub fn new(aspect: f32) -> Self {
        Self {
            aspect,
            ..Self::default()
        }
    }

    /// Sets the camera's Near & Far ranges
    pub fn set_near_far(&mut self, near: f32, far: f32) {
        self.near = near;
        self.far = far;
    }

    /// Sets the camera's FOV from degrees.
    pub fn set_fov(&mut self, degrees: f32) {
        self.fov_y = degrees.to_radians();
    }

    /// Keeps the aspect ratio in step with the framebuffer. Zero-sized
    /// framebuffers (minimized windows) leave it unchanged.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Moves the scene origin `distance` units down the negative Z axis.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::translation(0.0, 0.0, -self.distance)
    }

    pub fn projection_matrix(&self) -> Result<Mat4, MathError> {
        Mat4::perspective(self.fov_y, self.aspect, self.near, self.far)
    }
}
