/// Camera and projection utilities
use std::f32::consts::PI;

use crate::error::Result;
use crate::matrix::Matrix4;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// A viewpoint: the eye camera or the light that renders the shadow map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: [f32; 3],
    pub target: [f32; 3],
    pub up: [f32; 3],
    /// Vertical field of view in radians.
    pub fovy: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            ..Self::soft_shadow_eye()
        }
    }

    /// The eye of the soft-shadow demo scene.
    pub fn soft_shadow_eye() -> Self {
        Self {
            eye: [0.0, 3.0, 5.0],
            target: [0.0, 0.0, 0.0],
            up: [0.0, 1.0, 0.0],
            fovy: PI / 6.0,
            aspect: 1.0,
            near: 0.9,
            far: 100.0,
            mode: ProjectionMode::Perspective,
        }
    }

    /// The light of the soft-shadow demo scene. Its up vector is +X since it
    /// looks down at the origin from above.
    pub fn soft_shadow_light() -> Self {
        Self {
            eye: [-5.0, 5.0, 2.0],
            up: [1.0, 0.0, 0.0],
            ..Self::soft_shadow_eye()
        }
    }

    pub fn view_matrix(&self) -> Result<Matrix4> {
        Matrix4::look_at(self.eye, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4 {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::perspective(self.fovy, self.aspect, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let d = [
                    self.eye[0] - self.target[0],
                    self.eye[1] - self.target[1],
                    self.eye[2] - self.target[2],
                ];
                let height = (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt();
                let width = height * self.aspect;
                Matrix4::orthographic(
                    -width / 2.0,
                    width / 2.0,
                    height / 2.0,
                    -height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }

    /// `projection * view`
    pub fn view_projection(&self) -> Result<Matrix4> {
        Ok(self.projection_matrix() * self.view_matrix()?)
    }

    /// `projection * view * model`
    pub fn mvp(&self, model: &Matrix4) -> Result<Matrix4> {
        Ok(self.view_projection()? * *model)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

/// Projects a model-space point through `mvp` to pixel coordinates.
///
/// Returns `(x, y, depth)` with `y` growing downwards and depth in NDC, or
/// `None` when the point is behind the eye or outside the near/far range.
/// `x` and `y` may fall outside the viewport; rasterizers clip them.
pub fn project_to_screen(
    mvp: &Matrix4,
    point: [f32; 3],
    width: u32,
    height: u32,
) -> Option<(f32, f32, f32)> {
    let [x, y, z, w] = mvp.transform_point(point);

    // at or behind the eye plane
    if w < 1e-6 {
        return None;
    }

    let ndc_x = x / w;
    let ndc_y = y / w;
    let ndc_z = z / w;

    if !(-1.0..=1.0).contains(&ndc_z) {
        return None;
    }

    let screen_x = (ndc_x + 1.0) * 0.5 * width as f32;
    let screen_y = (1.0 - ndc_y) * 0.5 * height as f32;

    Some((screen_x, screen_y, ndc_z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600);
        assert_eq!(camera.mode, ProjectionMode::Perspective);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_view_matrix_moves_eye_to_origin() {
        let camera = Camera::soft_shadow_light();
        let view = camera.view_matrix().unwrap();
        let [x, y, z, _] = view.transform_point(camera.eye);
        assert_abs_diff_eq!(x, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(y, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_target_projects_to_screen_center() {
        let camera = Camera::new(800, 600);
        let mvp = camera.mvp(&Matrix4::identity()).unwrap();
        let (x, y, depth) = project_to_screen(&mvp, [0.0, 0.0, 0.0], 800, 600).unwrap();
        assert_abs_diff_eq!(x, 400.0, epsilon = 1e-2);
        assert_abs_diff_eq!(y, 300.0, epsilon = 1e-2);
        assert!(depth > -1.0 && depth < 1.0);
    }

    #[test]
    fn test_point_behind_eye_is_rejected() {
        let camera = Camera::soft_shadow_eye();
        let mvp = camera.mvp(&Matrix4::identity()).unwrap();
        assert_eq!(project_to_screen(&mvp, [0.0, 6.0, 10.0], 100, 100), None);
    }

    #[test]
    fn test_offscreen_point_keeps_coordinates() {
        let camera = Camera::new(100, 100);
        let mvp = camera.mvp(&Matrix4::identity()).unwrap();
        let (x, _, _) = project_to_screen(&mvp, [20.0, 0.0, 0.0], 100, 100).unwrap();
        assert!(x > 100.0);
    }

    #[test]
    fn test_point_beyond_far_plane_is_rejected() {
        let camera = Camera::soft_shadow_eye();
        let mvp = camera.mvp(&Matrix4::identity()).unwrap();
        assert_eq!(project_to_screen(&mvp, [0.0, -60.0, -100.0], 100, 100), None);
    }

    #[test]
    fn test_orthographic_keeps_target_centered() {
        let mut camera = Camera::soft_shadow_eye();
        camera.mode = ProjectionMode::Orthographic;
        let mvp = camera.mvp(&Matrix4::identity()).unwrap();
        let (x, y, _) = project_to_screen(&mvp, [0.0, 0.0, 0.0], 200, 200).unwrap();
        assert_abs_diff_eq!(x, 100.0, epsilon = 1e-2);
        assert_abs_diff_eq!(y, 100.0, epsilon = 1e-2);
    }
}
