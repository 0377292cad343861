/// Closed-form inverses by cofactor expansion (Cramer's rule)
use crate::error::{Error, Result, SingularPolicy};
use crate::matrix::{det2x2, det3x3, Matrix3, Matrix4};

/// The sixteen cofactors of a 4x4 matrix, laid out so that `dst[i] / det` is
/// element `i` of the column-major inverse, together with the determinant.
///
/// Fully unrolled. The statement order is part of the numeric behavior, keep it.
struct Cofactors {
    dst: [f32; 16],
    det: f32,
}

impl Cofactors {
    fn of(m: &Matrix4) -> Self {
        let m = m.as_slice();

        // read the transpose
        let src0 = m[0];
        let src4 = m[1];
        let src8 = m[2];
        let src12 = m[3];

        let src1 = m[4];
        let src5 = m[5];
        let src9 = m[6];
        let src13 = m[7];

        let src2 = m[8];
        let src6 = m[9];
        let src10 = m[10];
        let src14 = m[11];

        let src3 = m[12];
        let src7 = m[13];
        let src11 = m[14];
        let src15 = m[15];

        // pairs for the first 8 cofactors
        let atmp0 = src10 * src15;
        let atmp1 = src11 * src14;
        let atmp2 = src9 * src15;
        let atmp3 = src11 * src13;
        let atmp4 = src9 * src14;
        let atmp5 = src10 * src13;
        let atmp6 = src8 * src15;
        let atmp7 = src11 * src12;
        let atmp8 = src8 * src14;
        let atmp9 = src10 * src12;
        let atmp10 = src8 * src13;
        let atmp11 = src9 * src12;

        let dst0 = (atmp0 * src5 + atmp3 * src6 + atmp4 * src7)
            - (atmp1 * src5 + atmp2 * src6 + atmp5 * src7);
        let dst1 = (atmp1 * src4 + atmp6 * src6 + atmp9 * src7)
            - (atmp0 * src4 + atmp7 * src6 + atmp8 * src7);
        let dst2 = (atmp2 * src4 + atmp7 * src5 + atmp10 * src7)
            - (atmp3 * src4 + atmp6 * src5 + atmp11 * src7);
        let dst3 = (atmp5 * src4 + atmp8 * src5 + atmp11 * src6)
            - (atmp4 * src4 + atmp9 * src5 + atmp10 * src6);
        let dst4 = (atmp1 * src1 + atmp2 * src2 + atmp5 * src3)
            - (atmp0 * src1 + atmp3 * src2 + atmp4 * src3);
        let dst5 = (atmp0 * src0 + atmp7 * src2 + atmp8 * src3)
            - (atmp1 * src0 + atmp6 * src2 + atmp9 * src3);
        let dst6 = (atmp3 * src0 + atmp6 * src1 + atmp11 * src3)
            - (atmp2 * src0 + atmp7 * src1 + atmp10 * src3);
        let dst7 = (atmp4 * src0 + atmp9 * src1 + atmp10 * src2)
            - (atmp5 * src0 + atmp8 * src1 + atmp11 * src2);

        // pairs for the second 8 cofactors
        let btmp0 = src2 * src7;
        let btmp1 = src3 * src6;
        let btmp2 = src1 * src7;
        let btmp3 = src3 * src5;
        let btmp4 = src1 * src6;
        let btmp5 = src2 * src5;
        let btmp6 = src0 * src7;
        let btmp7 = src3 * src4;
        let btmp8 = src0 * src6;
        let btmp9 = src2 * src4;
        let btmp10 = src0 * src5;
        let btmp11 = src1 * src4;

        let dst8 = (btmp0 * src13 + btmp3 * src14 + btmp4 * src15)
            - (btmp1 * src13 + btmp2 * src14 + btmp5 * src15);
        let dst9 = (btmp1 * src12 + btmp6 * src14 + btmp9 * src15)
            - (btmp0 * src12 + btmp7 * src14 + btmp8 * src15);
        let dst10 = (btmp2 * src12 + btmp7 * src13 + btmp10 * src15)
            - (btmp3 * src12 + btmp6 * src13 + btmp11 * src15);
        let dst11 = (btmp5 * src12 + btmp8 * src13 + btmp11 * src14)
            - (btmp4 * src12 + btmp9 * src13 + btmp10 * src14);
        let dst12 = (btmp2 * src10 + btmp5 * src11 + btmp1 * src9)
            - (btmp4 * src11 + btmp0 * src9 + btmp3 * src10);
        let dst13 = (btmp8 * src11 + btmp0 * src8 + btmp7 * src10)
            - (btmp6 * src10 + btmp9 * src11 + btmp1 * src8);
        let dst14 = (btmp6 * src9 + btmp11 * src11 + btmp3 * src8)
            - (btmp10 * src11 + btmp2 * src8 + btmp7 * src9);
        let dst15 = (btmp10 * src10 + btmp4 * src8 + btmp9 * src9)
            - (btmp8 * src9 + btmp11 * src10 + btmp5 * src8);

        let det = src0 * dst0 + src1 * dst1 + src2 * dst2 + src3 * dst3;

        Self {
            dst: [
                dst0, dst1, dst2, dst3, dst4, dst5, dst6, dst7, dst8, dst9, dst10, dst11, dst12,
                dst13, dst14, dst15,
            ],
            det,
        }
    }
}

fn on_singular(policy: SingularPolicy, what: &str) -> Result<()> {
    match policy {
        SingularPolicy::Report => {
            log::debug!("{what}: determinant is zero, reporting singular matrix");
            Err(Error::SingularMatrix)
        }
        SingularPolicy::KeepPrevious => {
            log::debug!("{what}: determinant is zero, output left unchanged");
            Ok(())
        }
    }
}

/// Writes the inverse of `m` into `out`.
///
/// A singular `m` never touches `out`; `policy` decides whether that is an
/// error or a silent skip.
pub fn invert4_into(m: &Matrix4, out: &mut Matrix4, policy: SingularPolicy) -> Result<()> {
    let Cofactors { dst, det } = Cofactors::of(m);
    if det == 0.0 {
        return on_singular(policy, "invert4");
    }

    let invdet = 1.0 / det;
    let mut inv = [0.0f32; 16];
    inv[0] = dst[0] * invdet;
    inv[1] = dst[1] * invdet;
    inv[2] = dst[2] * invdet;
    inv[3] = dst[3] * invdet;

    inv[4] = dst[4] * invdet;
    inv[5] = dst[5] * invdet;
    inv[6] = dst[6] * invdet;
    inv[7] = dst[7] * invdet;

    inv[8] = dst[8] * invdet;
    inv[9] = dst[9] * invdet;
    inv[10] = dst[10] * invdet;
    inv[11] = dst[11] * invdet;

    inv[12] = dst[12] * invdet;
    inv[13] = dst[13] * invdet;
    inv[14] = dst[14] * invdet;
    inv[15] = dst[15] * invdet;

    *out = Matrix4::from_cols_array(inv);
    Ok(())
}

/// Writes the top-left 3x3 block of the inverse of `m` into `out`.
///
/// Shares the 4x4 derivation and keeps only the nine cofactors of that block.
/// For an affine `m` (bottom row `0 0 0 1`) this is the inverse of
/// `m.upper_left()`.
pub fn invert3_into(m: &Matrix4, out: &mut Matrix3, policy: SingularPolicy) -> Result<()> {
    let Cofactors { dst, det } = Cofactors::of(m);
    if det == 0.0 {
        return on_singular(policy, "invert3");
    }

    let invdet = 1.0 / det;
    *out = Matrix3::from_cols_array([
        dst[0] * invdet,
        dst[1] * invdet,
        dst[2] * invdet,
        dst[4] * invdet,
        dst[5] * invdet,
        dst[6] * invdet,
        dst[8] * invdet,
        dst[9] * invdet,
        dst[10] * invdet,
    ]);
    Ok(())
}

/// Inverse-transpose of the top-left 3x3 of a model matrix, for carrying
/// normals through non-uniform scale.
pub fn object_to_normal(m: &Matrix4) -> Result<Matrix3> {
    let m = m.as_slice();

    let det = det3x3(m[0], m[1], m[2], m[4], m[5], m[6], m[8], m[9], m[10]);
    if det == 0.0 {
        log::debug!("object_to_normal: upper-left block is singular");
        return Err(Error::SingularMatrix);
    }
    let scale = 1.0 / det;

    // adjugate over determinant, transposed
    Ok(Matrix3::from_cols_array([
        det2x2(m[5], m[6], m[9], m[10]) * scale,
        -det2x2(m[4], m[6], m[8], m[10]) * scale,
        det2x2(m[4], m[5], m[8], m[9]) * scale,
        -det2x2(m[1], m[2], m[9], m[10]) * scale,
        det2x2(m[0], m[2], m[8], m[10]) * scale,
        -det2x2(m[0], m[1], m[8], m[9]) * scale,
        det2x2(m[1], m[2], m[5], m[6]) * scale,
        -det2x2(m[0], m[2], m[4], m[6]) * scale,
        det2x2(m[0], m[1], m[4], m[5]) * scale,
    ]))
}

impl Matrix4 {
    pub fn determinant(&self) -> f32 {
        Cofactors::of(self).det
    }

    pub fn inverse(&self) -> Result<Matrix4> {
        let mut out = Matrix4::zero();
        invert4_into(self, &mut out, SingularPolicy::Report)?;
        Ok(out)
    }

    /// See [`invert3_into`].
    pub fn inverse3(&self) -> Result<Matrix3> {
        let mut out = Matrix3::zero();
        invert3_into(self, &mut out, SingularPolicy::Report)?;
        Ok(out)
    }

    /// See [`object_to_normal`].
    pub fn normal_matrix(&self) -> Result<Matrix3> {
        object_to_normal(self)
    }
}
