pub mod mat4;
pub mod matrixfuncs;

pub use mat4::Mat4;
pub use matrixfuncs::MathError;
