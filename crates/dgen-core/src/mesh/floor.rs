//! Floor quads for rooms and corridors

use glam::{Vec2, Vec3};

use super::GeometryBuffer;
use crate::dungeon::{Area, Rect};

fn add_floor_quad(buffer: &mut GeometryBuffer, rect: &Rect) {
    let (x0, z0) = (rect.min.x as f32, rect.min.y as f32);
    let (x1, z1) = (rect.max.x as f32, rect.max.y as f32);
    // counter-clockwise seen from above
    let corners = [(x0, z0), (x0, z1), (x1, z1), (x1, z0)];
    buffer.add_quad_uv(
        corners.map(|(x, z)| Vec3::new(x, 0.0, z)),
        corners.map(|(x, z)| Vec2::new(x, z)),
    );
}

/// Upward-facing quads covering every area cell once, UVs in world units.
///
/// Corridor legs reach into rooms and into each other, so each rect is
/// clipped against the rects emitted before it and quads never overlap.
pub fn build_floor<'a>(areas: impl IntoIterator<Item = Area<'a>>) -> GeometryBuffer {
    let mut buffer = GeometryBuffer::new();
    let mut covered: Vec<Rect> = Vec::new();
    for area in areas {
        for rect in area.rects().into_iter().filter(Rect::is_valid) {
            let mut pieces = vec![rect];
            for done in covered.iter().filter(|c| c.intersects(&rect)) {
                pieces = pieces.iter().flat_map(|p| p.subtract(done)).collect();
            }
            for piece in &pieces {
                add_floor_quad(&mut buffer, piece);
            }
            covered.push(rect);
        }
    }
    buffer
}
