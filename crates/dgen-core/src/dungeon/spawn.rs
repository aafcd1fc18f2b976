//! Object placement hooks
//!
//! The generator never creates objects itself. A host implements
//! [`ObjectSpawner`] and the grid only records which cells hold something.

use serde::{Deserialize, Serialize};

use super::{DungeonGrid, Position, Room};

/// Opaque handle to an object owned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectHandle(pub u64);

/// Host-side object factory
pub trait ObjectSpawner {
    /// Create `object` at `pos` inside `room`; `None` if nothing was created
    fn spawn(&mut self, object: &str, pos: Position, room: &Room) -> Option<ObjectHandle>;
}

/// Ask `spawner` for `object` at `pos` and record it on the grid.
///
/// The spawner is only called when the cell is free floor.
pub fn place_object<S: ObjectSpawner + ?Sized>(
    grid: &mut DungeonGrid,
    spawner: &mut S,
    object: &str,
    pos: Position,
    room: &Room,
) -> Option<ObjectHandle> {
    if !grid.is_cell_available(pos) {
        return None;
    }
    let handle = spawner.spawn(object, pos, room)?;
    grid.occupy_cell(pos, handle);
    Some(handle)
}
