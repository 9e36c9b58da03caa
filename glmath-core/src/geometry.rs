/// Geometry primitives for 3D rendering
use crate::vector::Vec3;

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
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

    /// Counter-clockwise winding normal; zero for a degenerate triangle.
    pub fn face_normal(&self) -> Vec3 {
        let [v0, v1, v2] = self.vertices.map(|v| v.position);
        (v1 - v0).cross(v2 - v0).normalize()
    }

    pub fn centroid(&self) -> Vec3 {
        let [a, b, c] = self.vertices.map(|v| v.position);
        (a + b + c) / 3.0
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Adds a quad `a b c d` (counter-clockwise seen from outside) as two
    /// triangles sharing the normal `n`.
    fn add_quad(&mut self, [a, b, c, d]: [Vec3; 4], n: Vec3) {
        let v = |p| Vertex::new(p, n);
        self.add_triangle(Triangle::new(v(a), v(b), v(c)));
        self.add_triangle(Triangle::new(v(a), v(c), v(d)));
    }

    /// Cube of edge `size` centred on the origin.
    pub fn cube(size: f32) -> Self {
        let half = size / 2.0;
        Self::cuboid(Vec3::splat(-half), Vec3::splat(half))
    }

    /// Axis-aligned box spanning `min` to `max`, 12 outward-facing triangles.
    pub fn cuboid(min: Vec3, max: Vec3) -> Self {
        let (x0, y0, z0) = (min.x, min.y, min.z);
        let (x1, y1, z1) = (max.x, max.y, max.z);
        let p = Vec3::new;
        let mut mesh = Self::with_capacity(12);

        // Front face
        mesh.add_quad(
            [p(x0, y0, z1), p(x1, y0, z1), p(x1, y1, z1), p(x0, y1, z1)],
            Vec3::Z,
        );
        // Back face
        mesh.add_quad(
            [p(x1, y0, z0), p(x0, y0, z0), p(x0, y1, z0), p(x1, y1, z0)],
            -Vec3::Z,
        );
        // Top face
        mesh.add_quad(
            [p(x0, y1, z1), p(x1, y1, z1), p(x1, y1, z0), p(x0, y1, z0)],
            Vec3::Y,
        );
        // Bottom face
        mesh.add_quad(
            [p(x0, y0, z0), p(x1, y0, z0), p(x1, y0, z1), p(x0, y0, z1)],
            -Vec3::Y,
        );
        // Right face
        mesh.add_quad(
            [p(x1, y0, z1), p(x1, y0, z0), p(x1, y1, z0), p(x1, y1, z1)],
            Vec3::X,
        );
        // Left face
        mesh.add_quad(
            [p(x0, y0, z0), p(x0, y0, z1), p(x0, y1, z1), p(x0, y1, z0)],
            -Vec3::X,
        );

        mesh
    }
}
