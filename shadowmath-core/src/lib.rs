//! Shadowmath Core - 4x4 matrix math for GL ES style renderers
//!
//! Matrices are plain column-major `f32` values that can be uploaded to a
//! shader uniform as they are. The library provides closed-form 4x4 and 3x3
//! inverses, the normal matrix, an N x N Gauss-Jordan inverse, the usual
//! transform builders (rotation, perspective, orthographic, look-at) and a small
//! camera / model-transform layer for composing MVP matrices.
//!
//! Every function is pure; singular inputs are reported through [`Error`].

pub mod error;
pub mod general;
pub mod inverse;
pub mod matrix;
pub mod projection;
pub mod transform;

// Re-export commonly used types
pub use error::{Error, Result, SingularPolicy};
pub use general::{invert_general, SquareMatrix};
pub use inverse::{invert3_into, invert4_into, object_to_normal};
pub use matrix::{Matrix3, Matrix4};
pub use projection::{project_to_screen, Camera, ProjectionMode};
pub use transform::Transform;
