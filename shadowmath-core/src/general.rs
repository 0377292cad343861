/// N x N inversion by Gauss-Jordan elimination with partial pivoting
use std::mem;
use std::ops::Mul;

use crate::error::{Error, Result};

/// An owned square matrix of any size, stored row-major.
///
/// Row-major here, unlike [`Matrix4`](crate::Matrix4): element `(i, j)` is at
/// `i * n + j`.
#[derive(Debug, Clone, PartialEq)]
pub struct SquareMatrix {
    n: usize,
    data: Vec<f32>,
}

/// Number of elements in an `n x n` matrix, if `n` is usable at all.
fn element_count(n: usize) -> Result<usize> {
    if n == 0 {
        return Err(Error::zero_dimension());
    }
    n.checked_mul(n)
        .filter(|&len| {
            len.checked_mul(mem::size_of::<f32>())
                .is_some_and(|bytes| bytes <= isize::MAX as usize)
        })
        .ok_or_else(|| Error::dimension_overflow(n))
}

fn identity_data(n: usize) -> Vec<f32> {
    let mut data = vec![0.0; n * n];
    for i in 0..n {
        data[i * n + i] = 1.0;
    }
    data
}

impl SquareMatrix {
    pub fn new(n: usize, data: Vec<f32>) -> Result<Self> {
        let len = element_count(n)?;
        if data.len() != len {
            return Err(Error::length_mismatch(n, len, data.len()));
        }
        Ok(Self { n, data })
    }

    pub fn from_rows<const N: usize>(rows: [[f32; N]; N]) -> Result<Self> {
        Self::new(N, rows.iter().flatten().copied().collect())
    }

    pub fn identity(n: usize) -> Result<Self> {
        element_count(n)?;
        Ok(Self {
            n,
            data: identity_data(n),
        })
    }

    pub fn dimension(&self) -> usize {
        self.n
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        debug_assert!(
            row < self.n && col < self.n,
            "Cannot get element ({row}, {col}) of a {0}x{0} matrix",
            self.n
        );
        self.data[row * self.n + col]
    }

    /// Inverts by reducing a working copy to the identity while applying the
    /// same row operations to an identity accumulator.
    ///
    /// Fails with [`Error::SingularMatrix`] as soon as the best pivot in a
    /// column is exactly zero.
    pub fn inverse(&self) -> Result<SquareMatrix> {
        let n = self.n;
        if n == 0 {
            return Err(Error::zero_dimension());
        }
        let mut work = self.data.clone();
        let mut acc = identity_data(n);

        for j in 0..n {
            let k = pivot_row(&work, n, j);
            let pivot = work[k * n + j];
            if pivot == 0.0 {
                log::debug!("gauss-jordan: zero pivot in column {j} of {n}x{n} matrix");
                return Err(Error::SingularMatrix);
            }

            if k != j {
                swap_rows(&mut work, n, j, k);
                swap_rows(&mut acc, n, j, k);
            }

            let scale = 1.0 / pivot;
            for i in 0..n {
                work[j * n + i] *= scale;
                acc[j * n + i] *= scale;
            }

            for l in (0..n).filter(|&l| l != j) {
                let t = work[l * n + j];
                for i in 0..n {
                    work[l * n + i] -= work[j * n + i] * t;
                    acc[l * n + i] -= acc[j * n + i] * t;
                }
            }
        }

        Ok(SquareMatrix { n, data: acc })
    }

    /// Determinant by the same pivoted elimination: the product of the pivots,
    /// negated once per row swap. Exactly `0.0` for a singular matrix.
    pub fn determinant(&self) -> f32 {
        let n = self.n;
        debug_assert!(n > 0, "determinant of an empty matrix");
        let mut work = self.data.clone();
        let mut det = 1.0f32;

        for j in 0..n {
            let k = pivot_row(&work, n, j);
            let pivot = work[k * n + j];
            if pivot == 0.0 {
                return 0.0;
            }
            if k != j {
                swap_rows(&mut work, n, j, k);
                det = -det;
            }
            det *= pivot;

            for l in (j + 1)..n {
                let t = work[l * n + j] / pivot;
                for i in j..n {
                    work[l * n + i] -= work[j * n + i] * t;
                }
            }
        }

        det
    }

    /// `self * rhs`, or [`Error::InvalidArgument`] when the sizes differ.
    pub fn try_mul(&self, rhs: &SquareMatrix) -> Result<SquareMatrix> {
        if self.n != rhs.n {
            return Err(Error::dimension_mismatch(self.n, rhs.n));
        }
        let n = self.n;
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..n {
                data[i * n + j] = (0..n).map(|k| self.get(i, k) * rhs.get(k, j)).sum();
            }
        }
        Ok(SquareMatrix { n, data })
    }
}

/// Row in `j..n` with the largest magnitude in column `j`. Ties keep the
/// earliest row.
fn pivot_row(work: &[f32], n: usize, j: usize) -> usize {
    let mut k = j;
    let mut max = work[j * n + j];
    for i in (j + 1)..n {
        let candidate = work[i * n + j];
        if candidate.abs() > max.abs() {
            k = i;
            max = candidate;
        }
    }
    k
}

fn swap_rows(data: &mut [f32], n: usize, a: usize, b: usize) {
    for i in 0..n {
        data.swap(a * n + i, b * n + i);
    }
}

/// # Panics
///
/// Panics when the sizes differ. [`SquareMatrix::try_mul`] reports that as an
/// error instead.
impl Mul for &SquareMatrix {
    type Output = SquareMatrix;

    fn mul(self, rhs: &SquareMatrix) -> SquareMatrix {
        match self.try_mul(rhs) {
            Ok(product) => product,
            Err(e) => panic!("{e}"),
        }
    }
}

/// Inverse of the row-major `n x n` matrix in `matrix`.
pub fn invert_general(matrix: &[f32], n: usize) -> Result<Vec<f32>> {
    let m = SquareMatrix::new(n, matrix.to_vec())?;
    Ok(m.inverse()?.into_vec())
}
