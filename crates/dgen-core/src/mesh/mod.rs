//! Mesh output: the merged wall mesh and floor quads

mod buffer;
mod floor;
mod walls;

pub use buffer::{BYTES_PER_VERTEX, GeometryBuffer};
pub use floor::build_floor;
pub use walls::{
    CornerKind, Orientation, Sides, WallMeshBuilder, WallSegment, WallSettings, WallStats,
    blocked_sides, classify_corner, detect_boundaries, detect_corners, merge_segments,
};
