//! Grid cell types

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::{ObjectHandle, Position, RoomId};

/// Cell classification
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum CellType {
    #[default]
    Empty = 0,
    Floor = 1,
    Wall = 2,
    Corridor = 3,
    Door = 4,
}

impl CellType {
    /// Check if this is passable (can walk through)
    pub const fn is_walkable(&self) -> bool {
        matches!(self, CellType::Floor | CellType::Corridor | CellType::Door)
    }

    /// Check if a neighbour of this type puts a wall on the shared edge
    pub const fn blocks_wall(&self) -> bool {
        matches!(self, CellType::Empty | CellType::Wall)
    }

    /// Check if wall geometry is generated around this cell
    pub const fn is_open_area(&self) -> bool {
        matches!(self, CellType::Floor | CellType::Corridor)
    }

    /// Get the display character for this cell type
    pub const fn symbol(&self) -> char {
        match self {
            CellType::Empty => ' ',
            CellType::Floor => '.',
            CellType::Wall => '#',
            CellType::Corridor => ',',
            CellType::Door => '+',
        }
    }
}

/// A single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GridCell {
    pub position: Position,

    /// Terrain classification
    pub cell_type: CellType,

    /// Room owning this cell (rooms and their border walls only)
    pub room: Option<RoomId>,

    /// Something was placed here by the spawner
    pub occupied: bool,

    /// Handle returned by the spawner for the placed object
    pub object: Option<ObjectHandle>,
}

impl GridCell {
    /// Create an empty cell at `position`
    pub const fn empty(position: Position) -> Self {
        Self {
            position,
            cell_type: CellType::Empty,
            room: None,
            occupied: false,
            object: None,
        }
    }

    /// Check if an object can be placed here
    pub const fn is_available(&self) -> bool {
        matches!(self.cell_type, CellType::Floor) && !self.occupied
    }

    /// Forget any placed object
    pub fn clear_object(&mut self) {
        self.occupied = false;
        self.object = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_walkable_types() {
        let walkable: Vec<_> = CellType::iter().filter(|t| t.is_walkable()).collect();
        assert_eq!(
            walkable,
            vec![CellType::Floor, CellType::Corridor, CellType::Door]
        );
    }

    #[test]
    fn test_wall_blocking_types() {
        assert!(CellType::Empty.blocks_wall());
        assert!(CellType::Wall.blocks_wall());
        assert!(!CellType::Door.blocks_wall());
        assert!(!CellType::Floor.blocks_wall());
        assert!(!CellType::Corridor.blocks_wall());
    }

    #[test]
    fn test_default_cell_is_empty() {
        let cell = GridCell::default();
        assert_eq!(cell.cell_type, CellType::Empty);
        assert!(cell.room.is_none());
        assert!(!cell.is_available());
    }

    #[test]
    fn test_floor_availability() {
        let mut cell = GridCell::empty(Position::new(1, 2));
        cell.cell_type = CellType::Floor;
        assert!(cell.is_available());

        cell.occupied = true;
        cell.object = Some(ObjectHandle(7));
        assert!(!cell.is_available());

        cell.clear_object();
        assert!(cell.is_available());
        assert!(cell.object.is_none());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(CellType::Corridor.to_string(), "Corridor");
        assert_eq!(CellType::Floor.symbol(), '.');
    }
}
