/// Meshes for the viewer scene
use nalgebra::{Point3, Vector3};

/// A vertex with a position and a face normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self {
            position: Point3::from(position),
            normal: Vector3::from(normal),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Face normal from the winding order (counter-clockwise is front)
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        (v1 - v0).cross(&(v2 - v0)).normalize()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Adds the quad `a b c d` (counter-clockwise) as two triangles.
    fn add_quad(&mut self, corners: [[f32; 3]; 4], normal: [f32; 3]) {
        let [a, b, c, d] = corners.map(|p| Vertex::new(p, normal));
        self.add_triangle(Triangle::new(a, b, c));
        self.add_triangle(Triangle::new(a, c, d));
    }

    /// Axis-aligned cube centered on the origin
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let mut mesh = Self::new();

        mesh.add_quad([[-h, -h, h], [h, -h, h], [h, h, h], [-h, h, h]], [0.0, 0.0, 1.0]);
        mesh.add_quad([[h, -h, -h], [-h, -h, -h], [-h, h, -h], [h, h, -h]], [0.0, 0.0, -1.0]);
        mesh.add_quad([[-h, h, h], [h, h, h], [h, h, -h], [-h, h, -h]], [0.0, 1.0, 0.0]);
        mesh.add_quad([[-h, -h, -h], [h, -h, -h], [h, -h, h], [-h, -h, h]], [0.0, -1.0, 0.0]);
        mesh.add_quad([[h, -h, h], [h, -h, -h], [h, h, -h], [h, h, h]], [1.0, 0.0, 0.0]);
        mesh.add_quad([[-h, -h, -h], [-h, -h, h], [-h, h, h], [-h, h, -h]], [-1.0, 0.0, 0.0]);

        mesh
    }

    /// Unit floor square in the XZ plane facing +Y; scale it with the model matrix.
    pub fn floor() -> Self {
        let mut mesh = Self::new();
        mesh.add_quad(
            [[-1.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 0.0, -1.0], [-1.0, 0.0, -1.0]],
            [0.0, 1.0, 0.0],
        );
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_cube_winding_matches_normals() {
        let cube = Mesh::cube(2.0);
        assert_eq!(cube.triangles.len(), 12);
        for triangle in &cube.triangles {
            let computed = triangle.calculate_normal();
            let declared = triangle.vertices[0].normal;
            assert_abs_diff_eq!(computed.dot(&declared), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_floor_faces_up() {
        let floor = Mesh::floor();
        for triangle in &floor.triangles {
            assert_abs_diff_eq!(triangle.calculate_normal().y, 1.0, epsilon = 1e-6);
        }
    }
}
