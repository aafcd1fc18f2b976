//! Cell-level occupancy map
//!
//! Rooms and corridors are rasterized into a dense grid over
//! `[0, width) x [0, length)`, stored row by row (`y * width + x`).
//! Out-of-bounds reads return `None` and out-of-bounds writes are ignored.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::{CellType, Corridor, GridCell, ObjectHandle, Position, Room, RoomId};

const NEIGHBOURS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DungeonGrid {
    width: i32,
    length: i32,
    cells: Vec<GridCell>,
}

impl DungeonGrid {
    /// Create a grid of Empty cells
    pub fn new(width: u32, length: u32) -> Self {
        let width = width.min(i32::MAX as u32) as i32;
        let length = length.min(i32::MAX as u32) as i32;
        let cells = (0..length)
            .flat_map(|y| (0..width).map(move |x| GridCell::empty(Position::new(x, y))))
            .collect();
        Self {
            width,
            length,
            cells,
        }
    }

    pub fn width(&self) -> u32 {
        self.width as u32
    }

    pub fn length(&self) -> u32 {
        self.length as u32
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width || pos.y >= self.length {
            return None;
        }
        Some(pos.y as usize * self.width as usize + pos.x as usize)
    }

    pub fn cell(&self, pos: Position) -> Option<&GridCell> {
        self.index(pos).map(|i| &self.cells[i])
    }

    fn cell_mut(&mut self, pos: Position) -> Option<&mut GridCell> {
        self.index(pos).map(|i| &mut self.cells[i])
    }

    pub fn cell_type(&self, pos: Position) -> Option<CellType> {
        self.cell(pos).map(|c| c.cell_type)
    }

    /// Overwrite the type and owner of a cell
    pub fn set_cell_type(&mut self, pos: Position, cell_type: CellType, owner: Option<RoomId>) {
        if let Some(cell) = self.cell_mut(pos) {
            cell.cell_type = cell_type;
            cell.room = owner;
        }
    }

    /// Rasterize room floors, then the walls around them.
    ///
    /// Walls cover the four sides one cell outside each room, corners
    /// excluded, and never replace Floor.
    pub fn stamp_rooms(&mut self, rooms: &[Room]) {
        for room in rooms {
            for pos in room.rect.cells() {
                self.set_cell_type(pos, CellType::Floor, Some(room.id));
            }
        }

        for room in rooms {
            let r = room.rect;
            let bottom_top = (r.min.x..r.max.x)
                .flat_map(|x| [Position::new(x, r.min.y - 1), Position::new(x, r.max.y)]);
            let left_right = (r.min.y..r.max.y)
                .flat_map(|y| [Position::new(r.min.x - 1, y), Position::new(r.max.x, y)]);
            for pos in bottom_top.chain(left_right) {
                if matches!(self.cell_type(pos), Some(t) if t != CellType::Floor) {
                    self.set_cell_type(pos, CellType::Wall, Some(room.id));
                }
            }
        }
    }

    /// Rasterize corridor legs; Floor cells are left untouched
    pub fn stamp_corridors(&mut self, corridors: &[Corridor]) {
        for corridor in corridors {
            for pos in corridor.cells() {
                if matches!(self.cell_type(pos), Some(t) if t != CellType::Floor) {
                    self.set_cell_type(pos, CellType::Corridor, None);
                }
            }
        }
    }

    /// Check if the cell is Floor and unoccupied
    pub fn is_cell_available(&self, pos: Position) -> bool {
        self.cell(pos).is_some_and(GridCell::is_available)
    }

    /// Free floor cells inside `room`, x-major
    pub fn available_cells_in_room(&self, room: &Room) -> Vec<Position> {
        room.rect
            .cells()
            .filter(|&pos| self.is_cell_available(pos))
            .collect()
    }

    /// Mark a cell as holding `object`; returns false if the cell does not exist
    pub fn occupy_cell(&mut self, pos: Position, object: ObjectHandle) -> bool {
        match self.cell_mut(pos) {
            Some(cell) => {
                cell.occupied = true;
                cell.object = Some(object);
                true
            }
            None => false,
        }
    }

    /// Remove any object from a cell
    pub fn clear_cell(&mut self, pos: Position) {
        if let Some(cell) = self.cell_mut(pos) {
            cell.clear_object();
        }
    }

    /// Check if every cell within `radius` (square) of `center` is available.
    ///
    /// False when the square leaves the grid.
    pub fn has_clear_space(&self, center: Position, radius: u32) -> bool {
        let r = i64::from(radius);
        let (x, y) = (i64::from(center.x), i64::from(center.y));
        let fits = x - r >= 0
            && y - r >= 0
            && x + r < i64::from(self.width)
            && y + r < i64::from(self.length);
        if !fits {
            return false;
        }
        // the square fits, so r < width and every offset stays in range
        let r = r as i32;
        (-r..=r).all(|dx| (-r..=r).all(|dy| self.is_cell_available(center.offset(dx, dy))))
    }

    pub fn iter(&self) -> impl Iterator<Item = &GridCell> {
        self.cells.iter()
    }

    /// Number of cells of the given type
    pub fn count(&self, cell_type: CellType) -> usize {
        self.cells.iter().filter(|c| c.cell_type == cell_type).count()
    }

    /// Reset every cell to Empty
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = GridCell::empty(cell.position);
        }
    }

    /// Walkable cells reachable from `start` through 4-neighbour steps
    fn flood(&self, start: Position) -> Vec<bool> {
        let mut seen = vec![false; self.cells.len()];
        let Some(first) = self.index(start) else {
            return seen;
        };
        if !self.cells[first].cell_type.is_walkable() {
            return seen;
        }

        seen[first] = true;
        let mut queue = VecDeque::from([start]);
        while let Some(pos) = queue.pop_front() {
            for (dx, dy) in NEIGHBOURS {
                let next = pos.offset(dx, dy);
                let Some(i) = self.index(next) else {
                    continue;
                };
                if !seen[i] && self.cells[i].cell_type.is_walkable() {
                    seen[i] = true;
                    queue.push_back(next);
                }
            }
        }
        seen
    }

    /// Number of walkable cells reachable from `start`, 0 if it is not walkable
    pub fn reachable_from(&self, start: Position) -> usize {
        self.flood(start).into_iter().filter(|&s| s).count()
    }

    /// Floor cells that cannot be reached from `start`
    pub fn unreachable_floor(&self, start: Position) -> Vec<Position> {
        let seen = self.flood(start);
        self.cells
            .iter()
            .zip(seen)
            .filter(|(c, s)| c.cell_type == CellType::Floor && !s)
            .map(|(c, _)| c.position)
            .collect()
    }
}
