//! 4x4 transformation matrix value type.
//!
//! # Convention
//! - Vectors are **column vectors** on the right: `Mat4 * v`
//! - Storage is column-major, element `(row, col)` at `4 * col + row`
//! - Transforms chain **right-to-left**: `A * B * v` applies B first, then A
//!
//! `Mat4` is `Copy`, so `a * b` never aliases its output with an operand.
//! [`Mat4::pre_multiply`] and `*=` are the in-place forms.

use std::ops::{Mul, MulAssign};

use super::matrixfuncs::{
    self, MathError, matrix_mul_4x4, perspective_matrix, postmultiply_in_place,
    premultiply_in_place, rotation_x_matrix, rotation_y_matrix, rotation_z_matrix, scale_matrix,
    translation_matrix,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4([f32; 16]);

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4(matrixfuncs::IDENTITY_MATRIX);

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    pub fn rotation_x(angle: f32) -> Self {
        Mat4(rotation_x_matrix(angle))
    }

    pub fn rotation_y(angle: f32) -> Self {
        Mat4(rotation_y_matrix(angle))
    }

    pub fn rotation_z(angle: f32) -> Self {
        Mat4(rotation_z_matrix(angle))
    }

    /// Uniform scale in x, y and z.
    pub fn scale(s: f32) -> Self {
        Mat4(scale_matrix(s))
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        Mat4(translation_matrix(x, y, z))
    }

    /// Perspective projection from a vertical field of view in radians.
    pub fn perspective(vfov: f32, aspect: f32, near: f32, far: f32) -> Result<Self, MathError> {
        perspective_matrix(vfov, aspect, near, far).map(Mat4)
    }

    /// Replaces `self` with `lhs * self`.
    pub fn pre_multiply(&mut self, lhs: &Mat4) {
        premultiply_in_place(&lhs.0, &mut self.0);
    }

    /// Access element at (row, col).
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.0[4 * col + row]
    }

    pub fn as_array(&self) -> &[f32; 16] {
        &self.0
    }

    /// Pointer to the first element, for `glUniformMatrix4fv`.
    pub fn as_ptr(&self) -> *const f32 {
        self.0.as_ptr()
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<[f32; 16]> for Mat4 {
    fn from(data: [f32; 16]) -> Self {
        Mat4(data)
    }
}

impl From<Mat4> for [f32; 16] {
    fn from(m: Mat4) -> Self {
        m.0
    }
}

impl Mul<Mat4> for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Self::Output {
        Mat4(matrix_mul_4x4(&self.0, &rhs.0))
    }
}

/// `self = self * rhs`
impl MulAssign<Mat4> for Mat4 {
    fn mul_assign(&mut self, rhs: Mat4) {
        postmultiply_in_place(&mut self.0, &rhs.0);
    }
}

/// Transform a homogeneous point: Mat4 * [x, y, z, w].
impl Mul<[f32; 4]> for Mat4 {
    type Output = [f32; 4];

    fn mul(self, v: [f32; 4]) -> Self::Output {
        matrixfuncs::transform_point(&self.0, v)
    }
}
