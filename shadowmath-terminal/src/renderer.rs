/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Vector3;
use shadowmath_core::{project_to_screen, Matrix3, Matrix4};
use std::io::{self, Write};

use crate::geometry::{Mesh, Triangle};

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Light that reaches faces turned away from the light
const AMBIENT: f32 = 0.1;

/// ASCII renderer that converts meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
        }
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
    }

    /// Draws `mesh` placed by `model` and seen through `view_projection`.
    ///
    /// Face normals go through the model's normal matrix so non-uniform scale
    /// still shades correctly; `light_dir` points from the scene to the light.
    pub fn render_mesh(
        &mut self,
        mesh: &Mesh,
        model: &Matrix4,
        view_projection: &Matrix4,
        light_dir: [f32; 3],
    ) -> shadowmath_core::Result<()> {
        let mvp = view_projection * model;
        let normal_matrix = model.normal_matrix()?;
        let light = Vector3::from(light_dir).normalize();

        for triangle in &mesh.triangles {
            self.render_triangle(triangle, &mvp, &normal_matrix, &light);
        }
        Ok(())
    }

    fn render_triangle(
        &mut self,
        triangle: &Triangle,
        mvp: &Matrix4,
        normal_matrix: &Matrix3,
        light: &Vector3<f32>,
    ) {
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (coord, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match project_to_screen(
                mvp,
                vertex.position.coords.into(),
                self.width as u32,
                self.height as u32,
            ) {
                Some(projected) => *coord = projected,
                None => return, // Triangle is clipped
            }
        }

        let normal = normal_matrix.transform_vector(triangle.vertices[0].normal.into());
        let normal = Vector3::from(normal);
        let brightness = normal.normalize().dot(light).max(0.0) * (1.0 - AMBIENT) + AMBIENT;
        self.rasterize_triangle(&screen_coords, shade(brightness));
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box, clipped to the screen
        let min_x = (v0.0.min(v1.0).min(v2.0).floor() as i32).max(0);
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i32).min(self.width as i32 - 1);
        let min_y = (v0.1.min(v1.1).min(v2.1).floor() as i32).max(0);
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f32 + 0.5, y as f32 + 0.5);

                let Some((w0, w1, w2)) = barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), p)
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.char_buffer[idx] = character;
                }
            }
        }
    }

    pub fn char_at(&self, x: usize, y: usize) -> char {
        self.char_buffer[y * self.width + x]
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for row in self.char_buffer.chunks(self.width.max(1)) {
            for &c in row {
                // Color based on character intensity
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    '#' | '%' | '@' => Color::Cyan,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            writer.queue(Print("\r\n"))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Map brightness in `[0, 1]` to a ramp character
fn shade(brightness: f32) -> char {
    let last = LUMINOSITY_RAMP.len() - 1;
    let index = ((brightness * last as f32) as usize).min(last);
    LUMINOSITY_RAMP[index]
}

/// Barycentric coordinates of `p` in the triangle, `None` when degenerate
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shadowmath_core::Camera;

    #[test]
    fn test_shade_bounds() {
        assert_eq!(shade(0.0), ' ');
        assert_eq!(shade(1.0), '@');
        assert_eq!(shade(2.0), '@');
    }

    #[test]
    fn test_barycentric_center() {
        let (w0, w1, w2) = barycentric((0.0, 0.0), (3.0, 0.0), (0.0, 3.0), (1.0, 1.0)).unwrap();
        assert!((w0 - 1.0 / 3.0).abs() < 1e-5);
        assert!((w1 - 1.0 / 3.0).abs() < 1e-5);
        assert!((w2 - 1.0 / 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_cube_covers_screen_center() {
        let mut renderer = AsciiRenderer::new(40, 40);
        let camera = Camera::new(40, 40);
        let vp = camera.view_projection().unwrap();
        renderer
            .render_mesh(&Mesh::cube(2.0), &Matrix4::identity(), &vp, camera.eye)
            .unwrap();
        assert_ne!(renderer.char_at(20, 20), ' ');
        assert_eq!(renderer.char_at(0, 0), ' ');
    }

    #[test]
    fn test_flattened_model_is_rejected() {
        let mut renderer = AsciiRenderer::new(10, 10);
        let result = renderer.render_mesh(
            &Mesh::cube(1.0),
            &Matrix4::scaling(1.0, 0.0, 1.0),
            &Matrix4::identity(),
            [0.0, 1.0, 0.0],
        );
        assert!(result.is_err());
    }
}
