//! Column-major 4x4 matrix kernels over raw `[f32; 16]` arrays.
//!
//! Element `(row, col)` lives at index `4 * col + row`, which is the layout
//! `glUniformMatrix4fv` expects with `transpose = GL_FALSE`.

use std::f32::consts::PI;
use std::fmt;

/// Identity matrix (4x4) representing 'no transformation'.
pub const IDENTITY_MATRIX: [f32; 16] = [
    1.0, 0.0, 0.0, 0.0, // Column 1
    0.0, 1.0, 0.0, 0.0, // Column 2
    0.0, 0.0, 1.0, 0.0, // Column 3
    0.0, 0.0, 0.0, 1.0, // Column 4
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MathError {
    /// The projection parameters do not describe a usable frustum.
    DegenerateProjection {
        vfov: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
}

impl fmt::Display for MathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MathError::DegenerateProjection {
                vfov,
                aspect,
                near,
                far,
            } => write!(
                f,
                "degenerate perspective projection \
                 (vfov={vfov}, aspect={aspect}, near={near}, far={far})"
            ),
        }
    }
}

impl std::error::Error for MathError {}

/// Returns a fresh identity matrix.
///
/// # Returns
/// A 4x4 matrix in column-major order with ones on the diagonal.
pub fn identity_matrix() -> [f32; 16] {
    IDENTITY_MATRIX
}

/// Resets `m` to the identity.
///
/// # Parameters
/// - `m`: the matrix to overwrite.
pub fn set_identity(m: &mut [f32; 16]) {
    *m = IDENTITY_MATRIX;
}

/// Rotation of `angle` radians about the X axis, counter-clockwise when
/// looking down the positive axis towards the origin.
///
/// # Parameters
/// - `angle`: rotation angle in radians.
///
/// # Returns
/// A 4x4 rotation matrix in column-major order; +Y turns towards +Z.
pub fn rotation_x_matrix(angle: f32) -> [f32; 16] {
    let (s, c) = angle.sin_cos();
    let mut m = IDENTITY_MATRIX;
    m[5] = c;
    m[6] = s;
    m[9] = -s;
    m[10] = c;
    m
}

/// Rotation of `angle` radians about the Y axis.
///
/// # Parameters
/// - `angle`: rotation angle in radians.
///
/// # Returns
/// A 4x4 rotation matrix in column-major order; +Z turns towards +X.
pub fn rotation_y_matrix(angle: f32) -> [f32; 16] {
    let (s, c) = angle.sin_cos();
    let mut m = IDENTITY_MATRIX;
    m[0] = c;
    m[2] = -s;
    m[8] = s;
    m[10] = c;
    m
}

/// Rotation of `angle` radians about the Z axis.
///
/// # Parameters
/// - `angle`: rotation angle in radians.
///
/// # Returns
/// A 4x4 rotation matrix in column-major order; +X turns towards +Y.
pub fn rotation_z_matrix(angle: f32) -> [f32; 16] {
    let (s, c) = angle.sin_cos();
    let mut m = IDENTITY_MATRIX;
    m[0] = c;
    m[1] = s;
    m[4] = -s;
    m[5] = c;
    m
}

/// Uniform scale in x, y and z. The homogeneous `w` row is left at 1.
///
/// # Parameters
/// - `s`: the scale factor applied to every axis.
pub fn scale_matrix(s: f32) -> [f32; 16] {
    let mut m = IDENTITY_MATRIX;
    m[0] = s;
    m[5] = s;
    m[10] = s;
    m
}

/// Creates a translation matrix. The offset is stored in the last column.
///
/// # Parameters
/// - `x`, `y`, `z`: the offset along each axis.
///
/// # Returns
/// A 4x4 matrix in column-major order that moves points by `(x, y, z)`.
pub fn translation_matrix(x: f32, y: f32, z: f32) -> [f32; 16] {
    [
        1.0, 0.0, 0.0, 0.0, // Column 1
        0.0, 1.0, 0.0, 0.0, // Column 2
        0.0, 0.0, 1.0, 0.0, // Column 3
        x, y, z, 1.0, // Column 4 (translation components)
    ]
}

/// Symmetric perspective projection in the OpenGL clip-space convention.
///
/// View-space `z = -near` maps to NDC `-1` and `z = -far` to `+1` after the
/// divide by `w = -z`.
///
/// # Parameters
/// - `vfov`: vertical field of view in radians.
/// - `aspect`: viewport width divided by height.
/// - `near`, `far`: distances to the clipping planes.
///
/// # Returns
/// The projection matrix in column-major order.
///
/// # Errors
/// Returns [`MathError::DegenerateProjection`] if `near == far`, if `aspect`
/// is zero or not finite, or if `vfov` is outside `(0, π)`.
pub fn perspective_matrix(
    vfov: f32,
    aspect: f32,
    near: f32,
    far: f32,
) -> Result<[f32; 16], MathError> {
    let degenerate = far == near
        || aspect == 0.0
        || !aspect.is_finite()
        || !(vfov > 0.0 && vfov < PI)
        || !near.is_finite()
        || !far.is_finite();
    if degenerate {
        return Err(MathError::DegenerateProjection {
            vfov,
            aspect,
            near,
            far,
        });
    }

    let f = 1.0 / (vfov / 2.0).tan();
    let depth = far - near;

    Ok([
        f / aspect, 0.0, 0.0, 0.0,
        0.0, f, 0.0, 0.0,
        0.0, 0.0, -(far + near) / depth, -1.0,
        0.0, 0.0, -(2.0 * far * near) / depth, 0.0,
    ])
}

/// Multiplies two 4x4 matrices `a` and `b` (both in column-major order).
///
/// The multiplication is `result = a * b`.
///
/// # Parameters
/// - `a`: the left-hand matrix.
/// - `b`: the right-hand matrix, applied to points first.
///
/// # Returns
/// The product as a new column-major array.
pub fn matrix_mul_4x4(a: &[f32; 16], b: &[f32; 16]) -> [f32; 16] {
    let mut result = [0.0f32; 16];

    // Multiply rows of a by columns of b
    for row in 0..4 {
        for col in 0..4 {
            result[col * 4 + row] = a[row] * b[col * 4]
                + a[4 + row] * b[col * 4 + 1]
                + a[8 + row] * b[col * 4 + 2]
                + a[12 + row] * b[col * 4 + 3];
        }
    }

    result
}

/// Writes `a * b` into `out`.
///
/// # Parameters
/// - `a`, `b`: the left- and right-hand operands.
/// - `out`: receives the product, overwriting its previous contents.
pub fn matrix_mul_4x4_into(a: &[f32; 16], b: &[f32; 16], out: &mut [f32; 16]) {
    *out = matrix_mul_4x4(a, b);
}

/// `m = lhs * m`. The product is formed in scratch storage first, so `m`
/// may be read while it is being replaced.
///
/// # Parameters
/// - `lhs`: the matrix applied after `m`.
/// - `m`: the matrix to update.
pub fn premultiply_in_place(lhs: &[f32; 16], m: &mut [f32; 16]) {
    let scratch = matrix_mul_4x4(lhs, m);
    *m = scratch;
}

/// `m = m * rhs`.
///
/// # Parameters
/// - `m`: the matrix to update.
/// - `rhs`: the matrix applied before `m`.
pub fn postmultiply_in_place(m: &mut [f32; 16], rhs: &[f32; 16]) {
    let scratch = matrix_mul_4x4(m, rhs);
    *m = scratch;
}

/// Applies `m` to the column vector `v`.
///
/// # Returns
/// The transformed homogeneous point `m * v`.
pub fn transform_point(m: &[f32; 16], v: [f32; 4]) -> [f32; 4] {
    let mut out = [0.0f32; 4];
    for (row, value) in out.iter_mut().enumerate() {
        *value = m[row] * v[0] + m[4 + row] * v[1] + m[8 + row] * v[2] + m[12 + row] * v[3];
    }
    out
}
