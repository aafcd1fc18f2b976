//! Dungeon layout
//!
//! Contains space partitioning, room carving, corridors, the cell grid and
//! room type assignment.

mod area;
mod bsp;
mod carve;
mod cell;
mod corridor;
mod grid;
mod rect;
mod room;
mod room_type;
mod spawn;

pub use area::Area;
pub use bsp::{NodeId, PartitionNode, PartitionTree, SplitAxis, partition};
pub use carve::{CarveSettings, carve_room, carve_rooms};
pub use cell::{CellType, GridCell};
pub use corridor::{ConnectivityTracker, Corridor, connect};
pub use grid::DungeonGrid;
pub use rect::{Axis, Position, Rect};
pub use room::{Room, RoomId, RoomType, RoomTypeConfig, RoomTypeData};
pub use room_type::{assign_room_types, room_by_type, rooms_by_type};
pub use spawn::{ObjectHandle, ObjectSpawner, place_object};
