/// Triangle mesh types produced by the primitive catalog
use nalgebra::{Matrix4, Point3, Vector3};

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
        }
    }

    pub fn from_parts(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices
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

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2).normalize()
    }

    /// Twice the triangle area; zero for collapsed faces such as sphere poles
    pub fn doubled_area(&self) -> f32 {
        let v0 = self.vertices[0].position;
        let edge1 = self.vertices[1].position - v0;
        let edge2 = self.vertices[2].position - v0;
        edge1.cross(&edge2).norm()
    }

    /// Copy of this triangle with positions and normals moved by `matrix`
    pub fn transformed(&self, matrix: &Matrix4<f32>) -> Self {
        let map = |v: &Vertex| {
            let normal = matrix.transform_vector(&v.normal);
            let normal = if normal.norm() > 0.0 { normal.normalize() } else { normal };
            Vertex::from_parts(matrix.transform_point(&v.position), normal)
        };
        Self::new(
            map(&self.vertices[0]),
            map(&self.vertices[1]),
            map(&self.vertices[2]),
        )
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    /// Build from a shared vertex list and a flat index buffer.
    ///
    /// Collapsed triangles are dropped.
    pub fn from_indexed(vertices: &[Vertex], indices: &[u32]) -> Self {
        let mut mesh = Self::with_capacity(indices.len() / 3);
        for face in indices.chunks_exact(3) {
            let triangle = Triangle::new(
                vertices[face[0] as usize],
                vertices[face[1] as usize],
                vertices[face[2] as usize],
            );
            if triangle.doubled_area() > f32::EPSILON {
                mesh.add_triangle(triangle);
            }
        }
        mesh
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Axis-aligned bounds of all vertex positions, `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let mut points = self.triangles.iter().flat_map(|t| t.vertices.iter().map(|v| v.position));
        let first = points.next()?;
        Some(points.fold((first, first), |(min, max), p| (min.inf(&p), max.sup(&p))))
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Mesh {
        let vertices = [
            Vertex::new(0.0, 0.0, 0.0, 0.0, 0.0, 1.0),
            Vertex::new(1.0, 0.0, 0.0, 0.0, 0.0, 1.0),
            Vertex::new(1.0, 1.0, 0.0, 0.0, 0.0, 1.0),
            Vertex::new(0.0, 1.0, 0.0, 0.0, 0.0, 1.0),
        ];
        Mesh::from_indexed(&vertices, &[0, 1, 2, 0, 2, 3])
    }

    #[test]
    fn test_from_indexed_skips_collapsed_faces() {
        let vertices = [
            Vertex::new(0.0, 0.0, 0.0, 0.0, 0.0, 1.0),
            Vertex::new(1.0, 0.0, 0.0, 0.0, 0.0, 1.0),
            Vertex::new(0.0, 1.0, 0.0, 0.0, 0.0, 1.0),
        ];
        let mesh = Mesh::from_indexed(&vertices, &[0, 1, 2, 0, 0, 1]);
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_face_normal() {
        let mesh = quad();
        let normal = mesh.triangles[0].calculate_normal();
        assert!((normal - Vector3::z()).norm() < 1e-6);
    }

    #[test]
    fn test_bounds() {
        let (min, max) = quad().bounds().unwrap();
        assert_eq!(min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Point3::new(1.0, 1.0, 0.0));
        assert!(Mesh::new().bounds().is_none());
    }

    #[test]
    fn test_transformed_triangle() {
        let m = Matrix4::new_translation(&Vector3::new(0.0, 0.0, 2.0));
        let t = quad().triangles[0].transformed(&m);
        assert_eq!(t.vertices[0].position, Point3::new(0.0, 0.0, 2.0));
        assert!((t.vertices[0].normal - Vector3::z()).norm() < 1e-6);
    }
}
