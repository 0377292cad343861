/// Column-major 4x4 and 3x3 matrices
use std::fmt::{self, Debug, Formatter};
use std::ops::{Mul, MulAssign};

use approx::{AbsDiffEq, RelativeEq};
use bytemuck::{Pod, Zeroable};

/// A 4x4 homogeneous transform.
///
/// Storage is column-major: the element at row `i`, column `j` lives at index
/// `j * 4 + i`, which is the layout `glUniformMatrix4fv` expects with
/// `transpose = GL_FALSE`. [`Matrix4::as_bytes`] hands it to an upload as is.
#[repr(transparent)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[derive(Clone, Copy, Default, PartialEq, Zeroable, Pod)]
pub struct Matrix4([f32; 16]);

/// A 3x3 linear transform, column-major (`(i, j)` at `j * 3 + i`).
///
/// Produced by the 3x3 inverse and the normal matrix; embeds into the top-left
/// block of a [`Matrix4`].
#[repr(transparent)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[derive(Clone, Copy, Default, PartialEq, Zeroable, Pod)]
pub struct Matrix3([f32; 9]);

impl Matrix4 {
    /// All zeroes. Not the identity, see [`Matrix4::identity`].
    pub const fn zero() -> Self {
        Self([0.0; 16])
    }

    pub const fn from_cols_array(data: [f32; 16]) -> Self {
        Self(data)
    }

    pub const fn to_cols_array(&self) -> [f32; 16] {
        self.0
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        debug_assert!(row < 4 && col < 4, "Cannot get element ({row}, {col}) of a 4x4 matrix");
        self.0[col * 4 + row]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        debug_assert!(row < 4 && col < 4, "Cannot set element ({row}, {col}) of a 4x4 matrix");
        self.0[col * 4 + row] = value;
    }

    pub fn column(&self, col: usize) -> [f32; 4] {
        let c = col * 4;
        [self.0[c], self.0[c + 1], self.0[c + 2], self.0[c + 3]]
    }

    pub fn row(&self, row: usize) -> [f32; 4] {
        [self.get(row, 0), self.get(row, 1), self.get(row, 2), self.get(row, 3)]
    }

    pub fn transpose(&self) -> Self {
        let mut out = Self::zero();
        for row in 0..4 {
            for col in 0..4 {
                out.set(col, row, self.get(row, col));
            }
        }
        out
    }

    /// `a * b`. The product is accumulated in a temporary, so either operand
    /// may be the destination the caller assigns back to.
    pub fn multiply(a: &Matrix4, b: &Matrix4) -> Matrix4 {
        let mut tmp = [0.0f32; 16];
        for i in 0..4 {
            for j in 0..4 {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += a.0[k * 4 + i] * b.0[j * 4 + k];
                }
                tmp[j * 4 + i] = sum;
            }
        }
        Matrix4(tmp)
    }

    /// Multiplies a homogeneous 4-vector.
    pub fn transform(&self, v: [f32; 4]) -> [f32; 4] {
        let m = &self.0;
        [
            m[0] * v[0] + m[4] * v[1] + m[8] * v[2] + m[12] * v[3],
            m[1] * v[0] + m[5] * v[1] + m[9] * v[2] + m[13] * v[3],
            m[2] * v[0] + m[6] * v[1] + m[10] * v[2] + m[14] * v[3],
            m[3] * v[0] + m[7] * v[1] + m[11] * v[2] + m[15] * v[3],
        ]
    }

    /// Transforms a point (`w = 1`) and returns the homogeneous result
    /// without dividing by `w`.
    pub fn transform_point(&self, p: [f32; 3]) -> [f32; 4] {
        self.transform([p[0], p[1], p[2], 1.0])
    }

    /// Transforms a direction (`w = 0`); translation has no effect.
    pub fn transform_vector(&self, v: [f32; 3]) -> [f32; 3] {
        let [x, y, z, _] = self.transform([v[0], v[1], v[2], 0.0]);
        [x, y, z]
    }

    /// The top-left 3x3 block.
    pub fn upper_left(&self) -> Matrix3 {
        let m = &self.0;
        Matrix3([m[0], m[1], m[2], m[4], m[5], m[6], m[8], m[9], m[10]])
    }
}

impl Matrix3 {
    pub const fn zero() -> Self {
        Self([0.0; 9])
    }

    pub const fn identity() -> Self {
        Self([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0])
    }

    pub const fn from_cols_array(data: [f32; 9]) -> Self {
        Self(data)
    }

    pub const fn to_cols_array(&self) -> [f32; 9] {
        self.0
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        debug_assert!(row < 3 && col < 3, "Cannot get element ({row}, {col}) of a 3x3 matrix");
        self.0[col * 3 + row]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        debug_assert!(row < 3 && col < 3, "Cannot set element ({row}, {col}) of a 3x3 matrix");
        self.0[col * 3 + row] = value;
    }

    pub fn transpose(&self) -> Self {
        let m = &self.0;
        Self([m[0], m[3], m[6], m[1], m[4], m[7], m[2], m[5], m[8]])
    }

    pub fn determinant(&self) -> f32 {
        let m = &self.0;
        det3x3(m[0], m[1], m[2], m[3], m[4], m[5], m[6], m[7], m[8])
    }

    pub fn transform_vector(&self, v: [f32; 3]) -> [f32; 3] {
        let m = &self.0;
        [
            m[0] * v[0] + m[3] * v[1] + m[6] * v[2],
            m[1] * v[0] + m[4] * v[1] + m[7] * v[2],
            m[2] * v[0] + m[5] * v[1] + m[8] * v[2],
        ]
    }

    /// Embeds into a 4x4 with no translation and `w` passed through.
    #[rustfmt::skip]
    pub fn to_matrix4(&self) -> Matrix4 {
        let m = &self.0;
        Matrix4([
            m[0], m[1], m[2], 0.0,
            m[3], m[4], m[5], 0.0,
            m[6], m[7], m[8], 0.0,
            0.0,  0.0,  0.0,  1.0,
        ])
    }
}

#[inline]
pub(crate) fn det2x2(m00: f32, m01: f32, m10: f32, m11: f32) -> f32 {
    m00 * m11 - m01 * m10
}

/// Determinant of the matrix whose columns are `(m00, m01, m02)`,
/// `(m10, m11, m12)` and `(m20, m21, m22)`.
#[allow(clippy::too_many_arguments)]
#[inline]
#[rustfmt::skip]
pub(crate) fn det3x3(
    m00: f32, m01: f32, m02: f32,
    m10: f32, m11: f32, m12: f32,
    m20: f32, m21: f32, m22: f32,
) -> f32 {
    m00 * det2x2(m11, m12, m21, m22) - m10 * det2x2(m01, m02, m21, m22)
        + m20 * det2x2(m01, m02, m11, m12)
}

impl Mul for Matrix4 {
    type Output = Matrix4;

    fn mul(self, rhs: Matrix4) -> Matrix4 {
        Matrix4::multiply(&self, &rhs)
    }
}

impl Mul<&Matrix4> for &Matrix4 {
    type Output = Matrix4;

    fn mul(self, rhs: &Matrix4) -> Matrix4 {
        Matrix4::multiply(self, rhs)
    }
}

impl MulAssign for Matrix4 {
    fn mul_assign(&mut self, rhs: Matrix4) {
        *self = Matrix4::multiply(self, &rhs);
    }
}

impl Mul for Matrix3 {
    type Output = Matrix3;

    fn mul(self, rhs: Matrix3) -> Matrix3 {
        let mut out = Matrix3::zero();
        for i in 0..3 {
            for j in 0..3 {
                let mut sum = 0.0;
                for k in 0..3 {
                    sum += self.get(i, k) * rhs.get(k, j);
                }
                out.set(i, j, sum);
            }
        }
        out
    }
}

impl From<Matrix3> for Matrix4 {
    fn from(m: Matrix3) -> Matrix4 {
        m.to_matrix4()
    }
}

impl From<Matrix4> for Matrix3 {
    fn from(m: Matrix4) -> Matrix3 {
        m.upper_left()
    }
}

// nalgebra stores column-major as well, so the conversions are plain copies.

impl From<Matrix4> for nalgebra::Matrix4<f32> {
    fn from(m: Matrix4) -> Self {
        nalgebra::Matrix4::from_column_slice(&m.0)
    }
}

impl From<nalgebra::Matrix4<f32>> for Matrix4 {
    fn from(m: nalgebra::Matrix4<f32>) -> Self {
        let mut data = [0.0; 16];
        data.copy_from_slice(m.as_slice());
        Matrix4(data)
    }
}

impl From<Matrix3> for nalgebra::Matrix3<f32> {
    fn from(m: Matrix3) -> Self {
        nalgebra::Matrix3::from_column_slice(&m.0)
    }
}

impl From<nalgebra::Matrix3<f32>> for Matrix3 {
    fn from(m: nalgebra::Matrix3<f32>) -> Self {
        let mut data = [0.0; 9];
        data.copy_from_slice(m.as_slice());
        Matrix3(data)
    }
}

macro_rules! impl_approx {
    ($ty:ty) => {
        impl AbsDiffEq for $ty {
            type Epsilon = f32;

            fn default_epsilon() -> f32 {
                f32::EPSILON
            }

            fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
                self.0
                    .iter()
                    .zip(other.0.iter())
                    .all(|(a, b)| a.abs_diff_eq(b, epsilon))
            }
        }

        impl RelativeEq for $ty {
            fn default_max_relative() -> f32 {
                f32::EPSILON
            }

            fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
                self.0
                    .iter()
                    .zip(other.0.iter())
                    .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
            }
        }
    };
}

impl_approx!(Matrix4);
impl_approx!(Matrix3);

impl Debug for Matrix4 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("Matrix4\n")?;
        for row in 0..4 {
            f.write_str("[")?;
            for col in 0..4 {
                write!(f, "{:>+.6}, ", self.get(row, col))?;
            }
            f.write_str("]\n")?;
        }
        Ok(())
    }
}

impl Debug for Matrix3 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("Matrix3\n")?;
        for row in 0..3 {
            f.write_str("[")?;
            for col in 0..3 {
                write!(f, "{:>+.6}, ", self.get(row, col))?;
            }
            f.write_str("]\n")?;
        }
        Ok(())
    }
}
