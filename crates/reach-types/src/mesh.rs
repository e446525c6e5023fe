use serde::{Deserialize, Serialize};

/// An indexed triangle mesh, used for robot triangulation and iso-shells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    /// Vertex positions [x, y, z, x, y, z, ...]
    pub positions: Vec<f32>,
    /// Triangle indices [i0, i1, i2, ...]
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn vertex(&self, i: usize) -> [f64; 3] {
        [
            self.positions[i * 3] as f64,
            self.positions[i * 3 + 1] as f64,
            self.positions[i * 3 + 2] as f64,
        ]
    }

    pub fn add_vertex(&mut self, pos: [f64; 3]) -> u32 {
        let idx = self.vertex_count() as u32;
        self.positions.push(pos[0] as f32);
        self.positions.push(pos[1] as f32);
        self.positions.push(pos[2] as f32);
        idx
    }

    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Add a planar quad as two triangles (a, b, c) and (a, c, d).
    pub fn add_quad(&mut self, corners: [[f64; 3]; 4]) {
        let a = self.add_vertex(corners[0]);
        let b = self.add_vertex(corners[1]);
        let c = self.add_vertex(corners[2]);
        let d = self.add_vertex(corners[3]);
        self.add_triangle(a, b, c);
        self.add_triangle(a, c, d);
    }

    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.vertex_count() as u32;
        self.positions.extend_from_slice(&other.positions);
        for &idx in &other.indices {
            self.indices.push(idx + offset);
        }
    }

    /// Apply `f` to every vertex position in place.
    pub fn map_vertices(&mut self, mut f: impl FnMut([f64; 3]) -> [f64; 3]) {
        for i in 0..self.vertex_count() {
            let p = f(self.vertex(i));
            self.positions[i * 3] = p[0] as f32;
            self.positions[i * 3 + 1] = p[1] as f32;
            self.positions[i * 3 + 2] = p[2] as f32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_offsets_indices() {
        let mut a = TriangleMesh::new();
        a.add_quad([[0.0; 3], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]]);
        let b = a.clone();
        a.merge(&b);
        assert_eq!(a.vertex_count(), 8);
        assert_eq!(a.triangle_count(), 4);
        assert_eq!(&a.indices[6..9], &[4, 5, 6]);
    }

    #[test]
    fn map_vertices_translates() {
        let mut m = TriangleMesh::new();
        m.add_vertex([1.0, 2.0, 3.0]);
        m.map_vertices(|p| [p[0] + 1.0, p[1], p[2] - 3.0]);
        assert_eq!(m.vertex(0), [2.0, 2.0, 0.0]);
    }
}
