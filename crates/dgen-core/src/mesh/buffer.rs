//! Append-only triangle buffer

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Approximate GPU memory per vertex (position, normal, uv, tangent)
pub const BYTES_PER_VERTEX: usize = 48;

const QUAD_UVS: [Vec2; 4] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(0.0, 1.0),
];

/// Vertices, UVs and triangle indices of one merged mesh.
///
/// Triangles are wound counter-clockwise when seen from outside.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryBuffer {
    pub positions: Vec<Vec3>,
    /// One UV per position
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl GeometryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Rough memory footprint once uploaded
    pub fn estimated_bytes(&self) -> usize {
        self.vertex_count() * BYTES_PER_VERTEX
    }

    /// Append a quad with explicit UVs, corners in counter-clockwise order
    pub fn add_quad_uv(&mut self, corners: [Vec3; 4], uvs: [Vec2; 4]) {
        let start = self.positions.len() as u32;
        self.positions.extend(corners);
        self.uvs.extend(uvs);
        self.indices
            .extend([start, start + 1, start + 2, start, start + 2, start + 3]);
    }

    /// Append a quad with the unit UV square
    pub fn add_quad(&mut self, corners: [Vec3; 4]) {
        self.add_quad_uv(corners, QUAD_UVS);
    }

    /// Append an axis-aligned box between `min` and `max`: four sides and a
    /// top cap, no bottom
    pub fn add_box(&mut self, min: Vec3, max: Vec3) {
        let v0 = Vec3::new(min.x, min.y, min.z);
        let v1 = Vec3::new(max.x, min.y, min.z);
        let v2 = Vec3::new(max.x, min.y, max.z);
        let v3 = Vec3::new(min.x, min.y, max.z);
        let v4 = Vec3::new(min.x, max.y, min.z);
        let v5 = Vec3::new(max.x, max.y, min.z);
        let v6 = Vec3::new(max.x, max.y, max.z);
        let v7 = Vec3::new(min.x, max.y, max.z);

        // +Z, -Z, -X, +X, top
        self.add_quad([v3, v2, v6, v7]);
        self.add_quad([v1, v0, v4, v5]);
        self.add_quad([v0, v3, v7, v4]);
        self.add_quad([v2, v1, v5, v6]);
        self.add_quad([v7, v6, v5, v4]);
    }

    /// Append another buffer, rebasing its indices
    pub fn append(&mut self, other: &GeometryBuffer) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.uvs.extend_from_slice(&other.uvs);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Axis-aligned bounds, `None` when empty
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p))),
        )
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.uvs.clear();
        self.indices.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face_normal(buf: &GeometryBuffer, tri: usize) -> Vec3 {
        let i = &buf.indices[tri * 3..tri * 3 + 3];
        let (a, b, c) = (
            buf.positions[i[0] as usize],
            buf.positions[i[1] as usize],
            buf.positions[i[2] as usize],
        );
        (b - a).cross(c - a).normalize()
    }

    #[test]
    fn test_quad_layout() {
        let mut buf = GeometryBuffer::new();
        buf.add_quad([Vec3::ZERO, Vec3::X, Vec3::X + Vec3::Y, Vec3::Y]);
        assert_eq!(buf.vertex_count(), 4);
        assert_eq!(buf.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(buf.uvs[2], Vec2::ONE);
    }

    #[test]
    fn test_box_has_five_outward_faces() {
        let mut buf = GeometryBuffer::new();
        buf.add_box(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 2.0, 1.0));
        assert_eq!(buf.vertex_count(), 20);
        assert_eq!(buf.triangle_count(), 10);

        let expected = [Vec3::Z, Vec3::NEG_Z, Vec3::NEG_X, Vec3::X, Vec3::Y];
        for (face, normal) in expected.iter().enumerate() {
            for tri in [face * 2, face * 2 + 1] {
                assert!(face_normal(&buf, tri).abs_diff_eq(*normal, 1e-6));
            }
        }
    }

    #[test]
    fn test_append_rebases_indices() {
        let mut a = GeometryBuffer::new();
        a.add_box(Vec3::ZERO, Vec3::ONE);
        let mut b = GeometryBuffer::new();
        b.add_quad([Vec3::ZERO, Vec3::X, Vec3::ONE, Vec3::Z]);

        a.append(&b);
        assert_eq!(a.vertex_count(), 24);
        assert_eq!(&a.indices[a.indices.len() - 6..], &[20, 21, 22, 20, 22, 23]);
        assert_eq!(a.uvs.len(), a.positions.len());
    }

    #[test]
    fn test_bounds_and_estimate() {
        let mut buf = GeometryBuffer::new();
        assert!(buf.bounds().is_none());
        buf.add_box(Vec3::new(-0.5, 0.0, 1.0), Vec3::new(2.5, 3.0, 1.3));
        let (lo, hi) = buf.bounds().unwrap();
        assert_eq!(lo, Vec3::new(-0.5, 0.0, 1.0));
        assert_eq!(hi, Vec3::new(2.5, 3.0, 1.3));
        assert_eq!(buf.estimated_bytes(), 20 * 48);

        buf.clear();
        assert!(buf.is_empty());
    }
}
