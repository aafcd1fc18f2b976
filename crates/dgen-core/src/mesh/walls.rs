//! Wall mesh synthesis
//!
//! Walls are derived from the grid alone:
//! 1. Every Floor or Corridor cell puts a unit segment on each edge shared
//!    with a missing, Empty or Wall neighbour
//! 2. Collinear unit segments are merged into runs
//! 3. Corners where runs meet at an angle get a pillar
//! 4. Runs and pillars are emitted as boxes into one [`GeometryBuffer`]
//!
//! Grid cell `(x, y)` covers world `x..x+1` by `z = y..y+1`, so edges and
//! corners sit on integer world coordinates.

use std::collections::{BTreeMap, BTreeSet};

use bitflags::bitflags;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::GeometryBuffer;
use crate::DungeonConfig;
use crate::dungeon::{CellType, DungeonGrid, Position};

bitflags! {
    /// Sides of a cell facing a wall-blocking neighbour
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Sides: u8 {
        const NORTH = 0x01;
        const SOUTH = 0x02;
        const EAST = 0x04;
        const WEST = 0x08;
    }
}

/// Direction a wall segment runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Orientation {
    /// On the line `y = start.y`, running towards +x
    Horizontal,
    /// On the line `x = start.x`, running towards +y
    Vertical,
}

/// A straight wall run along grid edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WallSegment {
    pub start: Position,
    pub length: u32,
    pub orientation: Orientation,
}

impl WallSegment {
    pub const fn unit(start: Position, orientation: Orientation) -> Self {
        Self {
            start,
            length: 1,
            orientation,
        }
    }

    /// `(line, along)` coordinates of the segment start
    const fn key(&self) -> (i32, i32) {
        match self.orientation {
            Orientation::Horizontal => (self.start.y, self.start.x),
            Orientation::Vertical => (self.start.x, self.start.y),
        }
    }

    const fn from_key(orientation: Orientation, line: i32, along: i32, length: u32) -> Self {
        let start = match orientation {
            Orientation::Horizontal => Position::new(along, line),
            Orientation::Vertical => Position::new(line, along),
        };
        Self {
            start,
            length,
            orientation,
        }
    }
}

/// Why a corner received a pillar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CornerKind {
    /// Walkable cell with both orthogonal neighbours blocked
    Outer,
    /// Blocked cell with both orthogonal neighbours and the diagonal walkable
    Inner,
    /// Floor and Corridor meet around a blocked diagonal
    Transition,
    /// Walkable cell and orthogonals around a blocked diagonal
    Connection,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallSettings {
    pub wall_height: f32,
    /// Thickness of segment boxes
    pub wall_thickness: f32,
    pub use_corner_pillars: bool,
    /// Side length of pillar boxes
    pub corner_pillar_size: f32,
}

impl Default for WallSettings {
    fn default() -> Self {
        Self {
            wall_height: 3.0,
            wall_thickness: 0.3,
            use_corner_pillars: true,
            corner_pillar_size: 0.6,
        }
    }
}

impl From<&DungeonConfig> for WallSettings {
    fn from(config: &DungeonConfig) -> Self {
        Self {
            wall_height: config.wall_height,
            use_corner_pillars: config.use_corner_pillars,
            corner_pillar_size: config.corner_pillar_size,
            ..Self::default()
        }
    }
}

/// Counters describing one wall build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallStats {
    pub horizontal_segments: usize,
    pub vertical_segments: usize,
    /// Unit edges before merging
    pub unit_segments: usize,
    pub pillars: usize,
    pub vertices: usize,
    pub triangles: usize,
    pub estimated_bytes: usize,
}

impl WallStats {
    /// Merged segments of both orientations
    pub fn segments(&self) -> usize {
        self.horizontal_segments + self.vertical_segments
    }
}

fn is_walkable(grid: &DungeonGrid, pos: Position) -> bool {
    grid.cell_type(pos).is_some_and(|t| t.is_walkable())
}

/// Sides of `pos` whose neighbour is missing, Empty or Wall
pub fn blocked_sides(grid: &DungeonGrid, pos: Position) -> Sides {
    let blocks = |dx, dy| {
        grid.cell_type(pos.offset(dx, dy))
            .is_none_or(|t| t.blocks_wall())
    };
    let mut sides = Sides::empty();
    sides.set(Sides::NORTH, blocks(0, 1));
    sides.set(Sides::SOUTH, blocks(0, -1));
    sides.set(Sides::EAST, blocks(1, 0));
    sides.set(Sides::WEST, blocks(-1, 0));
    sides
}

/// Unit segments on every blocked edge of a Floor or Corridor cell.
///
/// Horizontal units come first ordered by `(y, x)`, then vertical units
/// ordered by `(x, y)`; shared edges appear once.
pub fn detect_boundaries(grid: &DungeonGrid) -> Vec<WallSegment> {
    let mut units = BTreeSet::new();
    for cell in grid.iter().filter(|c| c.cell_type.is_open_area()) {
        let Position { x, y } = cell.position;
        let sides = blocked_sides(grid, cell.position);
        if sides.contains(Sides::NORTH) {
            units.insert((Orientation::Horizontal, y + 1, x));
        }
        if sides.contains(Sides::SOUTH) {
            units.insert((Orientation::Horizontal, y, x));
        }
        if sides.contains(Sides::EAST) {
            units.insert((Orientation::Vertical, x + 1, y));
        }
        if sides.contains(Sides::WEST) {
            units.insert((Orientation::Vertical, x, y));
        }
    }

    units
        .into_iter()
        .map(|(o, line, along)| WallSegment::from_key(o, line, along, 1))
        .collect()
}

/// Fuse unit segments that continue each other on the same line.
///
/// A run only grows while the next unit starts exactly one cell further
/// along; any gap starts a new run.
pub fn merge_segments(units: &[WallSegment]) -> Vec<WallSegment> {
    let keys: BTreeSet<(Orientation, i32, i32)> = units
        .iter()
        .flat_map(|s| {
            let (line, along) = s.key();
            (0..s.length as i32).map(move |k| (s.orientation, line, along + k))
        })
        .collect();

    let mut merged: Vec<WallSegment> = Vec::new();
    let mut run: Option<(Orientation, i32, i32, u32)> = None;
    for (orientation, line, along) in keys {
        match run {
            Some((o, l, start, len))
                if o == orientation && l == line && start + len as i32 == along =>
            {
                run = Some((o, l, start, len + 1));
            }
            _ => {
                if let Some((o, l, start, len)) = run {
                    merged.push(WallSegment::from_key(o, l, start, len));
                }
                run = Some((orientation, line, along, 1));
            }
        }
    }
    if let Some((o, l, start, len)) = run {
        merged.push(WallSegment::from_key(o, l, start, len));
    }
    merged
}

/// Classify the corner of `cell` between directions `d1` (west/east) and
/// `d2` (south/north)
pub fn classify_corner(
    grid: &DungeonGrid,
    cell: Position,
    d1: (i32, i32),
    d2: (i32, i32),
) -> Option<CornerKind> {
    let side1 = cell.offset(d1.0, d1.1);
    let side2 = cell.offset(d2.0, d2.1);
    let diagonal = cell.offset(d1.0 + d2.0, d1.1 + d2.1);

    let current = is_walkable(grid, cell);
    let open1 = is_walkable(grid, side1);
    let open2 = is_walkable(grid, side2);
    let open_diagonal = is_walkable(grid, diagonal);

    if current && !open1 && !open2 {
        return Some(CornerKind::Outer);
    }
    if !current && open1 && open2 && open_diagonal {
        return Some(CornerKind::Inner);
    }
    if current && open1 && open2 && !open_diagonal {
        let types = [cell, side1, side2].map(|p| grid.cell_type(p).unwrap_or(CellType::Empty));
        let all_open = types.iter().all(CellType::is_open_area);
        let mixed = types.iter().any(|&t| t != types[0]);
        if all_open && mixed {
            return Some(CornerKind::Transition);
        }
        return Some(CornerKind::Connection);
    }
    None
}

/// Corner offset and the two neighbour directions, for SW, SE, NW, NE
const CORNERS: [((i32, i32), (i32, i32), (i32, i32)); 4] = [
    ((0, 0), (-1, 0), (0, -1)),
    ((1, 0), (1, 0), (0, -1)),
    ((0, 1), (-1, 0), (0, 1)),
    ((1, 1), (1, 0), (0, 1)),
];

/// Corner positions needing a pillar; the first cell that classifies a
/// corner decides its kind
pub fn detect_corners(grid: &DungeonGrid) -> BTreeMap<Position, CornerKind> {
    let mut corners = BTreeMap::new();
    for cell in grid.iter().filter(|c| c.cell_type.is_open_area()) {
        for (offset, d1, d2) in CORNERS {
            let corner = cell.position.offset(offset.0, offset.1);
            if corners.contains_key(&corner) {
                continue;
            }
            if let Some(kind) = classify_corner(grid, cell.position, d1, d2) {
                corners.insert(corner, kind);
            }
        }
    }
    corners
}

/// Builds the merged wall mesh of a grid
#[derive(Debug, Clone, Default)]
pub struct WallMeshBuilder {
    settings: WallSettings,
}

impl WallMeshBuilder {
    pub fn new(settings: WallSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &WallSettings {
        &self.settings
    }

    fn emit_segment(&self, buffer: &mut GeometryBuffer, segment: &WallSegment) {
        let h = self.settings.wall_height;
        let t = self.settings.wall_thickness / 2.0;
        let (x, z) = (segment.start.x as f32, segment.start.y as f32);
        let len = segment.length as f32;
        let (min, max) = match segment.orientation {
            Orientation::Horizontal => (Vec3::new(x, 0.0, z - t), Vec3::new(x + len, h, z + t)),
            Orientation::Vertical => (Vec3::new(x - t, 0.0, z), Vec3::new(x + t, h, z + len)),
        };
        buffer.add_box(min, max);
    }

    fn emit_pillar(&self, buffer: &mut GeometryBuffer, corner: Position) {
        let half = self.settings.corner_pillar_size / 2.0;
        let center = Vec3::new(corner.x as f32, 0.0, corner.y as f32);
        buffer.add_box(
            center - Vec3::new(half, 0.0, half),
            center + Vec3::new(half, self.settings.wall_height, half),
        );
    }

    /// Build the wall mesh for `grid`
    pub fn build(&self, grid: &DungeonGrid) -> (GeometryBuffer, WallStats) {
        let mut buffer = GeometryBuffer::new();
        let mut stats = WallStats::default();
        if grid.is_empty() {
            return (buffer, stats);
        }

        let units = detect_boundaries(grid);
        let segments = merge_segments(&units);
        for segment in &segments {
            self.emit_segment(&mut buffer, segment);
        }

        let corners = if self.settings.use_corner_pillars {
            detect_corners(grid)
        } else {
            BTreeMap::new()
        };
        for &corner in corners.keys() {
            self.emit_pillar(&mut buffer, corner);
        }

        stats.unit_segments = units.len();
        stats.horizontal_segments = segments
            .iter()
            .filter(|s| s.orientation == Orientation::Horizontal)
            .count();
        stats.vertical_segments = segments.len() - stats.horizontal_segments;
        stats.pillars = corners.len();
        stats.vertices = buffer.vertex_count();
        stats.triangles = buffer.triangle_count();
        stats.estimated_bytes = buffer.estimated_bytes();

        log::debug!(
            "walls: {} units merged into {} segments, {} pillars, {} vertices, {} triangles",
            stats.unit_segments,
            stats.segments(),
            stats.pillars,
            stats.vertices,
            stats.triangles
        );

        (buffer, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::{NodeId, Rect, Room, RoomId};

    fn grid_with_room(width: u32, length: u32, rect: Rect) -> DungeonGrid {
        let mut grid = DungeonGrid::new(width, length);
        grid.stamp_rooms(&[Room::new(RoomId(0), rect, NodeId(0))]);
        grid
    }

    fn fill(grid: &mut DungeonGrid, rect: Rect, cell_type: CellType) {
        for pos in rect.cells() {
            grid.set_cell_type(pos, cell_type, None);
        }
    }

    #[test]
    fn test_blocked_sides() {
        let grid = grid_with_room(6, 6, Rect::from_coords(1, 1, 3, 2));
        let sides = blocked_sides(&grid, Position::new(1, 1));
        assert_eq!(sides, Sides::NORTH | Sides::SOUTH | Sides::WEST);
        let edge = blocked_sides(&grid, Position::new(0, 0));
        assert!(edge.contains(Sides::SOUTH | Sides::WEST));
    }

    #[test]
    fn test_single_cell_has_four_units() {
        let grid = grid_with_room(5, 5, Rect::from_size(2, 2, 1, 1));
        let units = detect_boundaries(&grid);
        assert_eq!(
            units,
            vec![
                WallSegment::unit(Position::new(2, 2), Orientation::Horizontal),
                WallSegment::unit(Position::new(2, 3), Orientation::Horizontal),
                WallSegment::unit(Position::new(2, 2), Orientation::Vertical),
                WallSegment::unit(Position::new(3, 2), Orientation::Vertical),
            ]
        );
    }

    #[test]
    fn test_shared_edges_are_not_walls() {
        let grid = grid_with_room(8, 8, Rect::from_size(1, 1, 3, 2));
        let units = detect_boundaries(&grid);
        // perimeter of a 3x2 room
        assert_eq!(units.len(), 10);
    }

    #[test]
    fn test_run_of_units_merges_into_one() {
        let units: Vec<_> = (0..7)
            .map(|x| WallSegment::unit(Position::new(x + 3, 5), Orientation::Horizontal))
            .collect();
        let merged = merge_segments(&units);
        assert_eq!(
            merged,
            vec![WallSegment {
                start: Position::new(3, 5),
                length: 7,
                orientation: Orientation::Horizontal,
            }]
        );
    }

    #[test]
    fn test_gaps_and_lines_break_runs() {
        let units = vec![
            WallSegment::unit(Position::new(0, 0), Orientation::Vertical),
            WallSegment::unit(Position::new(0, 1), Orientation::Vertical),
            WallSegment::unit(Position::new(0, 3), Orientation::Vertical),
            WallSegment::unit(Position::new(1, 2), Orientation::Vertical),
            WallSegment::unit(Position::new(0, 2), Orientation::Horizontal),
            WallSegment::unit(Position::new(1, 2), Orientation::Horizontal),
        ];
        let merged = merge_segments(&units);
        let lengths: Vec<(Orientation, Position, u32)> = merged
            .iter()
            .map(|s| (s.orientation, s.start, s.length))
            .collect();
        assert_eq!(
            lengths,
            vec![
                (Orientation::Horizontal, Position::new(0, 2), 2),
                (Orientation::Vertical, Position::new(0, 0), 2),
                (Orientation::Vertical, Position::new(0, 3), 1),
                (Orientation::Vertical, Position::new(1, 2), 1),
            ]
        );
    }

    #[test]
    fn test_room_walls_merge_to_four_sides() {
        let grid = grid_with_room(12, 12, Rect::from_size(2, 3, 5, 4));
        let merged = merge_segments(&detect_boundaries(&grid));
        assert_eq!(merged.len(), 4);
        let total: u32 = merged.iter().map(|s| s.length).sum();
        assert_eq!(total, 18);
    }

    #[test]
    fn test_room_has_four_outer_corners() {
        let grid = grid_with_room(10, 10, Rect::from_size(2, 2, 3, 3));
        let corners = detect_corners(&grid);
        let expected: Vec<Position> = [(2, 2), (2, 5), (5, 2), (5, 5)]
            .into_iter()
            .map(|(x, y)| Position::new(x, y))
            .collect();
        assert_eq!(corners.keys().copied().collect::<Vec<_>>(), expected);
        assert!(corners.values().all(|&k| k == CornerKind::Outer));
    }

    #[test]
    fn test_l_turn_corner() {
        // Floor at (1,1), (2,1), (1,2); (2,2) blocked
        let mut grid = DungeonGrid::new(5, 5);
        fill(&mut grid, Rect::from_coords(1, 1, 3, 2), CellType::Floor);
        fill(&mut grid, Rect::from_size(1, 2, 1, 1), CellType::Floor);
        assert_eq!(
            classify_corner(&grid, Position::new(1, 1), (1, 0), (0, 1)),
            Some(CornerKind::Connection)
        );
        assert_eq!(detect_corners(&grid).get(&Position::new(2, 2)), Some(&CornerKind::Connection));
    }

    #[test]
    fn test_transition_corner() {
        let mut grid = DungeonGrid::new(5, 5);
        fill(&mut grid, Rect::from_coords(1, 1, 3, 2), CellType::Floor);
        fill(&mut grid, Rect::from_size(1, 2, 1, 1), CellType::Corridor);
        assert_eq!(
            classify_corner(&grid, Position::new(1, 1), (1, 0), (0, 1)),
            Some(CornerKind::Transition)
        );
    }

    #[test]
    fn test_inner_corner() {
        let mut grid = DungeonGrid::new(5, 5);
        fill(&mut grid, Rect::from_coords(0, 0, 3, 3), CellType::Floor);
        grid.set_cell_type(Position::new(1, 1), CellType::Wall, None);
        assert_eq!(
            classify_corner(&grid, Position::new(1, 1), (1, 0), (0, 1)),
            Some(CornerKind::Inner)
        );
        // One side open, one side blocked: a straight wall, no corner
        assert_eq!(classify_corner(&grid, Position::new(0, 1), (1, 0), (0, 1)), None);
    }

    #[test]
    fn test_empty_and_unwalkable_grids() {
        let builder = WallMeshBuilder::default();
        let (buffer, stats) = builder.build(&DungeonGrid::new(0, 0));
        assert!(buffer.is_empty());
        assert_eq!(stats, WallStats::default());

        let (buffer, stats) = builder.build(&DungeonGrid::new(6, 6));
        assert!(buffer.is_empty());
        assert_eq!(stats.segments(), 0);
        assert_eq!(stats.pillars, 0);
    }

    #[test]
    fn test_build_counts_boxes() {
        let grid = grid_with_room(10, 10, Rect::from_size(2, 2, 3, 3));
        let (buffer, stats) = WallMeshBuilder::default().build(&grid);
        assert_eq!(stats.horizontal_segments, 2);
        assert_eq!(stats.vertical_segments, 2);
        assert_eq!(stats.unit_segments, 12);
        assert_eq!(stats.pillars, 4);
        // 8 boxes of 5 quads
        assert_eq!(stats.vertices, 8 * 20);
        assert_eq!(stats.triangles, 8 * 10);
        assert_eq!(buffer.vertex_count(), stats.vertices);
        assert_eq!(stats.estimated_bytes, stats.vertices * 48);
    }

    #[test]
    fn test_pillars_can_be_disabled() {
        let grid = grid_with_room(10, 10, Rect::from_size(2, 2, 3, 3));
        let settings = WallSettings {
            use_corner_pillars: false,
            ..WallSettings::default()
        };
        let (_, stats) = WallMeshBuilder::new(settings).build(&grid);
        assert_eq!(stats.pillars, 0);
        assert_eq!(stats.vertices, 4 * 20);
    }

    #[test]
    fn test_segment_geometry_bounds() {
        let grid = grid_with_room(10, 10, Rect::from_size(2, 3, 4, 1));
        let settings = WallSettings {
            use_corner_pillars: false,
            wall_height: 2.5,
            ..WallSettings::default()
        };
        let (buffer, _) = WallMeshBuilder::new(settings).build(&grid);
        let (lo, hi) = buffer.bounds().unwrap();
        assert!(lo.abs_diff_eq(Vec3::new(1.85, 0.0, 2.85), 1e-5));
        assert!(hi.abs_diff_eq(Vec3::new(6.15, 2.5, 4.15), 1e-5));
    }

    #[test]
    fn test_doors_leave_openings() {
        let mut grid = grid_with_room(10, 10, Rect::from_size(2, 2, 3, 3));
        let before = detect_boundaries(&grid).len();
        grid.set_cell_type(Position::new(5, 3), CellType::Door, None);
        assert_eq!(detect_boundaries(&grid).len(), before - 1);
    }
}
