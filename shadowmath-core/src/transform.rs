/// Transform builders and model-matrix composition
use crate::error::{Error, Result};
use crate::matrix::Matrix4;

fn length(x: f32, y: f32, z: f32) -> f32 {
    (x * x + y * y + z * z).sqrt()
}

impl Matrix4 {
    #[rustfmt::skip]
    pub const fn identity() -> Self {
        Self::from_cols_array([
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    #[rustfmt::skip]
    pub const fn translation(x: f32, y: f32, z: f32) -> Self {
        Self::from_cols_array([
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            x,   y,   z,   1.0,
        ])
    }

    #[rustfmt::skip]
    pub const fn scaling(x: f32, y: f32, z: f32) -> Self {
        Self::from_cols_array([
            x,   0.0, 0.0, 0.0,
            0.0, y,   0.0, 0.0,
            0.0, 0.0, z,   0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Post-multiplies by a translation: `self = self * translation(x, y, z)`.
    ///
    /// Only the last column changes.
    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        for i in 0..4 {
            let v = self.get(i, 0) * x + self.get(i, 1) * y + self.get(i, 2) * z;
            self.set(i, 3, self.get(i, 3) + v);
        }
    }

    /// Rotation of `angle` degrees about `axis` (Rodrigues).
    ///
    /// The axis is normalized here; it must have a direction. Evaluated in
    /// `f64` and rounded once at the end.
    pub fn rotation(angle: f32, axis: [f32; 3]) -> Result<Self> {
        let [x, y, z] = axis.map(f64::from);
        let len = (x * x + y * y + z * z).sqrt();
        if len == 0.0 || !len.is_finite() {
            log::warn!("rotation: rejecting axis {axis:?}");
            return Err(Error::degenerate_axis(axis));
        }

        let radians = f64::from(angle).to_radians();
        let (s, c) = radians.sin_cos();
        let c1 = 1.0 - c;
        let u = [x / len, y / len, z / len];

        let mut r = [0.0f64; 16];
        r[15] = 1.0;
        for i in 0..3 {
            r[i * 4 + (i + 1) % 3] = u[(i + 2) % 3] * s;
            r[i * 4 + (i + 2) % 3] = -u[(i + 1) % 3] * s;
        }
        for i in 0..3 {
            for j in 0..3 {
                r[i * 4 + j] += c1 * u[i] * u[j] + if i == j { c } else { 0.0 };
            }
        }

        Ok(Self::from_cols_array(r.map(|v| v as f32)))
    }

    /// Symmetric-frustum perspective projection (`gluPerspective`, but with
    /// `fovy` in radians). Clip-space `w` is `-z`.
    pub fn perspective(fovy: f32, aspect: f32, near: f32, far: f32) -> Self {
        debug_assert!(near != far, "perspective: near and far planes coincide");
        debug_assert!(aspect != 0.0, "perspective: zero aspect ratio");

        let (fovy, aspect, near, far) = (
            f64::from(fovy),
            f64::from(aspect),
            f64::from(near),
            f64::from(far),
        );
        let f = 1.0 / (fovy * 0.5).tan();

        let mut p = [0.0f32; 16];
        p[0] = (f / aspect) as f32;
        p[5] = f as f32;
        p[10] = ((near + far) / (near - far)) as f32;
        p[11] = -1.0;
        p[14] = ((2.0 * near * far) / (near - far)) as f32;
        Self::from_cols_array(p)
    }

    /// Parallel projection of the box `[l, r] x [b, t] x [-n, -f]` onto the
    /// clip cube. Note the argument order: top before bottom.
    #[rustfmt::skip]
    pub fn orthographic(l: f32, r: f32, t: f32, b: f32, n: f32, f: f32) -> Self {
        debug_assert!(r != l && t != b && f != n, "orthographic: empty view box");

        let tx = -(r + l) / (r - l);
        let ty = -(t + b) / (t - b);
        let tz = -(f + n) / (f - n);

        Self::from_cols_array([
            2.0 / (r - l), 0.0,           0.0,            0.0,
            0.0,           2.0 / (t - b), 0.0,            0.0,
            0.0,           0.0,           -2.0 / (f - n), 0.0,
            tx,            ty,            tz,             1.0,
        ])
    }

    /// Right-handed view matrix looking from `eye` towards `center`.
    ///
    /// The rotation rows are `(right, true_up, -forward)`; the translation is
    /// `-eye` carried through that rotation.
    pub fn look_at(eye: [f32; 3], center: [f32; 3], up: [f32; 3]) -> Result<Self> {
        let mut fx = center[0] - eye[0];
        let mut fy = center[1] - eye[1];
        let mut fz = center[2] - eye[2];

        let lf = length(fx, fy, fz);
        if lf == 0.0 || !lf.is_finite() {
            log::warn!("look_at: eye and center coincide at {eye:?}");
            return Err(Error::degenerate_view("forward"));
        }
        let rlf = 1.0 / lf;
        fx *= rlf;
        fy *= rlf;
        fz *= rlf;

        // s = f x up
        let mut sx = fy * up[2] - fz * up[1];
        let mut sy = fz * up[0] - fx * up[2];
        let mut sz = fx * up[1] - fy * up[0];

        let ls = length(sx, sy, sz);
        if ls == 0.0 || !ls.is_finite() {
            log::warn!("look_at: up {up:?} is parallel to the view direction");
            return Err(Error::degenerate_view("right"));
        }
        let rls = 1.0 / ls;
        sx *= rls;
        sy *= rls;
        sz *= rls;

        // u = s x f
        let ux = sy * fz - sz * fy;
        let uy = sz * fx - sx * fz;
        let uz = sx * fy - sy * fx;

        #[rustfmt::skip]
        let mut m = Self::from_cols_array([
            sx,  ux,  -fx, 0.0,
            sy,  uy,  -fy, 0.0,
            sz,  uz,  -fz, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ]);
        m.translate(-eye[0], -eye[1], -eye[2]);
        Ok(m)
    }
}

/// Model transform as the demos compose it: `T * S * R`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: [f32; 3],
    pub scale: [f32; 3],
    /// Degrees about `axis`.
    pub rotation_degrees: f32,
    pub axis: [f32; 3],
}

impl Transform {
    pub fn new() -> Self {
        Self {
            translation: [0.0; 3],
            scale: [1.0; 3],
            rotation_degrees: 0.0,
            axis: [0.0, 1.0, 0.0],
        }
    }

    pub fn with_translation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.translation = [x, y, z];
        self
    }

    pub fn with_scale(mut self, x: f32, y: f32, z: f32) -> Self {
        self.scale = [x, y, z];
        self
    }

    pub fn with_rotation(mut self, degrees: f32, axis: [f32; 3]) -> Self {
        self.rotation_degrees = degrees;
        self.axis = axis;
        self
    }

    /// Rotate by a delta in degrees
    pub fn rotate(&mut self, degrees: f32) {
        self.rotation_degrees = (self.rotation_degrees + degrees) % 360.0;
    }

    pub fn matrix(&self) -> Result<Matrix4> {
        let [tx, ty, tz] = self.translation;
        let [sx, sy, sz] = self.scale;
        let r = Matrix4::rotation(self.rotation_degrees, self.axis)?;
        Ok(Matrix4::translation(tx, ty, tz) * (Matrix4::scaling(sx, sy, sz) * r))
    }

    /// Create a model-view-projection matrix
    pub fn mvp(model: &Matrix4, view: &Matrix4, projection: &Matrix4) -> Matrix4 {
        projection * &(view * model)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_identity_layout() {
        let id = Matrix4::identity();
        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(id.get(i, j), if i == j { 1.0 } else { 0.0 });
            }
        }
    }

    #[test]
    fn test_translation_column() {
        let t = Matrix4::translation(1.0, 2.0, 3.0);
        assert_eq!(t.column(3), [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(t.transform_point([0.0, 0.0, 0.0]), [1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_translate_matches_post_multiply() {
        let base = Matrix4::scaling(2.0, 3.0, 4.0);
        let mut m = base;
        m.translate(1.0, -1.0, 0.5);
        assert_eq!(m, base * Matrix4::translation(1.0, -1.0, 0.5));
    }

    #[test]
    fn test_rotation_quarter_turn_about_z() {
        let r = Matrix4::rotation(90.0, [0.0, 0.0, 2.0]).unwrap();
        let p = r.transform_vector([1.0, 0.0, 0.0]);
        assert_abs_diff_eq!(p[0], 0.0, epsilon = EPSILON);
        assert_abs_diff_eq!(p[1], 1.0, epsilon = EPSILON);
        assert_abs_diff_eq!(p[2], 0.0, epsilon = EPSILON);
    }

    #[test]
    fn test_rotation_zero_angle_is_identity() {
        for axis in [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 2.0, 3.0], [-4.0, 0.5, 0.0]] {
            let r = Matrix4::rotation(0.0, axis).unwrap();
            assert_abs_diff_eq!(r, Matrix4::identity(), epsilon = EPSILON);
        }
    }

    #[test]
    fn test_rotation_inverse_angle_cancels() {
        let axis = [0.3, -1.0, 0.7];
        for angle in [15.0, 90.0, 137.5, 270.0] {
            let forward = Matrix4::rotation(angle, axis).unwrap();
            let back = Matrix4::rotation(-angle, axis).unwrap();
            assert_abs_diff_eq!(forward * back, Matrix4::identity(), epsilon = EPSILON);
        }
    }

    #[test]
    fn test_rotation_rejects_zero_axis() {
        assert!(matches!(
            Matrix4::rotation(45.0, [0.0, 0.0, 0.0]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(Matrix4::rotation(45.0, [f32::NAN, 1.0, 0.0]).is_err());
    }

    #[test]
    fn test_perspective_maps_near_plane_to_minus_one() {
        let p = Matrix4::perspective(std::f32::consts::FRAC_PI_4, 1.0, 1.0, 100.0);
        let [_, _, z, w] = p.transform_point([0.0, 0.0, -1.0]);
        assert_abs_diff_eq!(z / w, -1.0, epsilon = EPSILON);
        let [_, _, z, w] = p.transform_point([0.0, 0.0, -100.0]);
        assert_abs_diff_eq!(z / w, 1.0, epsilon = 1e-4);
        assert_eq!(w, 100.0);
    }

    #[test]
    fn test_perspective_matches_nalgebra() {
        let ours = Matrix4::perspective(0.8, 1.5, 0.5, 50.0);
        let theirs: Matrix4 = nalgebra::Matrix4::new_perspective(1.5, 0.8, 0.5, 50.0).into();
        assert_abs_diff_eq!(ours, theirs, epsilon = EPSILON);
    }

    #[test]
    fn test_orthographic_maps_box_corners() {
        let o = Matrix4::orthographic(-2.0, 6.0, 3.0, -1.0, 1.0, 11.0);
        let near = o.transform_point([-2.0, -1.0, -1.0]);
        let far = o.transform_point([6.0, 3.0, -11.0]);
        assert_abs_diff_eq!(near[0], -1.0, epsilon = EPSILON);
        assert_abs_diff_eq!(near[1], -1.0, epsilon = EPSILON);
        assert_abs_diff_eq!(near[2], -1.0, epsilon = EPSILON);
        assert_abs_diff_eq!(far[0], 1.0, epsilon = EPSILON);
        assert_abs_diff_eq!(far[1], 1.0, epsilon = EPSILON);
        assert_abs_diff_eq!(far[2], 1.0, epsilon = EPSILON);
        assert_eq!(far[3], 1.0);
    }

    #[test]
    fn test_look_at_puts_center_on_negative_z() {
        let eye = [0.0, 3.0, 5.0];
        let center = [0.0, 0.0, 0.0];
        let v = Matrix4::look_at(eye, center, [0.0, 1.0, 0.0]).unwrap();
        let [x, y, z, w] = v.transform_point(center);
        assert_abs_diff_eq!(x, 0.0, epsilon = EPSILON);
        assert_abs_diff_eq!(y, 0.0, epsilon = EPSILON);
        assert_abs_diff_eq!(z, -34.0f32.sqrt(), epsilon = EPSILON);
        assert_eq!(w, 1.0);

        let [ex, ey, ez, _] = v.transform_point(eye);
        assert_abs_diff_eq!(ex, 0.0, epsilon = EPSILON);
        assert_abs_diff_eq!(ey, 0.0, epsilon = EPSILON);
        assert_abs_diff_eq!(ez, 0.0, epsilon = EPSILON);
    }

    #[test]
    fn test_look_at_matches_nalgebra() {
        let eye = [-5.0, 5.0, 2.0];
        let ours = Matrix4::look_at(eye, [0.0, 0.0, 0.0], [1.0, 0.0, 0.0]).unwrap();
        let theirs: Matrix4 = nalgebra::Matrix4::look_at_rh(
            &nalgebra::Point3::new(-5.0, 5.0, 2.0),
            &nalgebra::Point3::origin(),
            &nalgebra::Vector3::x(),
        )
        .into();
        assert_abs_diff_eq!(ours, theirs, epsilon = EPSILON);
    }

    #[test]
    fn test_look_at_rejects_degenerate_vectors() {
        let p = [1.0, 2.0, 3.0];
        assert_eq!(
            Matrix4::look_at(p, p, [0.0, 1.0, 0.0]),
            Err(Error::degenerate_view("forward"))
        );
        assert_eq!(
            Matrix4::look_at([0.0, 5.0, 0.0], [0.0; 3], [0.0, 1.0, 0.0]),
            Err(Error::degenerate_view("right"))
        );
    }

    #[test]
    fn test_transform_composes_translate_scale_rotate() {
        let t = Transform::new()
            .with_translation(0.0, 1.0, 0.0)
            .with_scale(2.0, 2.0, 2.0)
            .with_rotation(90.0, [0.0, 1.0, 0.0]);
        let m = t.matrix().unwrap();
        // rotate x onto -z, scale by 2, then lift by 1
        let [x, y, z, _] = m.transform_point([1.0, 0.0, 0.0]);
        assert_abs_diff_eq!(x, 0.0, epsilon = EPSILON);
        assert_abs_diff_eq!(y, 1.0, epsilon = EPSILON);
        assert_abs_diff_eq!(z, -2.0, epsilon = EPSILON);
    }

    #[test]
    fn test_transform_rotate_wraps() {
        let mut t = Transform::default();
        t.rotate(350.0);
        t.rotate(20.0);
        assert_abs_diff_eq!(t.rotation_degrees, 10.0, epsilon = EPSILON);
    }

    #[test]
    fn test_mvp_order() {
        let model = Matrix4::translation(1.0, 0.0, 0.0);
        let view = Matrix4::scaling(2.0, 2.0, 2.0);
        let projection = Matrix4::translation(0.0, 0.0, -1.0);
        let mvp = Transform::mvp(&model, &view, &projection);
        assert_eq!(mvp.transform_point([0.0; 3]), [2.0, 0.0, -1.0, 1.0]);
    }
}
