//! Room types and structures
//!
//! Defines the semantic room roles and the configuration table that drives
//! their weighted assignment:
//! - 6 room types from Start to Puzzle
//! - Room struct with its carved rect, owning leaf and assigned type

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::{NodeId, Position, Rect};

/// Index of a room in the generated room list
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct RoomId(pub usize);

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Semantic role of a room
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
    Display, EnumIter,
)]
pub enum RoomType {
    /// Player entry room, always the first room
    Start,
    /// Room furthest from the start
    Boss,
    #[default]
    Normal,
    Shop,
    Trap,
    Puzzle,
}

impl RoomType {
    /// Types placed by fixed rules rather than weighted selection
    pub const fn is_fixed(&self) -> bool {
        matches!(self, RoomType::Start | RoomType::Boss)
    }
}

/// Per-type configuration entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomTypeData {
    pub room_type: RoomType,
    /// Display name for hosts
    pub name: String,
    /// RGBA tint used by debug renderers
    pub debug_color: [f32; 4],
    /// Opaque names of objects the host may spawn in this room
    pub object_pool: Vec<String>,
    pub min_objects: u32,
    pub max_objects: u32,
    /// At most one room of this type per dungeon
    pub is_unique: bool,
    /// Relative selection weight in `[0, 100]`
    pub spawn_weight: f32,
}

impl Default for RoomTypeData {
    fn default() -> Self {
        Self {
            room_type: RoomType::Normal,
            name: String::new(),
            debug_color: [1.0, 1.0, 1.0, 1.0],
            object_pool: Vec::new(),
            min_objects: 0,
            max_objects: 5,
            is_unique: false,
            spawn_weight: 10.0,
        }
    }
}

impl RoomTypeData {
    /// Entry for `room_type` with default settings and the type name
    pub fn new(room_type: RoomType) -> Self {
        Self {
            room_type,
            name: room_type.to_string(),
            ..Self::default()
        }
    }

    /// Set the selection weight
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.spawn_weight = weight;
        self
    }

    /// Mark the type as unique
    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    /// Weight clamped to its valid range
    pub fn weight(&self) -> f32 {
        if self.spawn_weight.is_nan() {
            0.0
        } else {
            self.spawn_weight.clamp(0.0, 100.0)
        }
    }
}

/// Ordered table of room type entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomTypeConfig {
    pub room_types: Vec<RoomTypeData>,
}

impl RoomTypeConfig {
    pub fn new(room_types: Vec<RoomTypeData>) -> Self {
        Self { room_types }
    }

    /// First entry configured for `room_type`
    pub fn get(&self, room_type: RoomType) -> Option<&RoomTypeData> {
        self.room_types.iter().find(|d| d.room_type == room_type)
    }

    /// Check if the table has no entries
    pub fn is_empty(&self) -> bool {
        self.room_types.is_empty()
    }
}

/// A carved room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    /// Floor area, strictly inside its leaf
    pub rect: Rect,
    /// Partition leaf the room was carved in
    pub leaf: NodeId,
    pub room_type: RoomType,
    pub type_data: Option<RoomTypeData>,
}

impl Room {
    /// Create an untyped room
    pub fn new(id: RoomId, rect: Rect, leaf: NodeId) -> Self {
        Self {
            id,
            rect,
            leaf,
            room_type: RoomType::Normal,
            type_data: None,
        }
    }

    /// Set the room type and its configuration entry
    pub fn set_type(&mut self, room_type: RoomType, data: Option<RoomTypeData>) {
        self.room_type = room_type;
        self.type_data = data;
    }

    /// Centre cell of the room
    pub fn center(&self) -> Position {
        self.rect.center()
    }

    /// Host-side name, e.g. `Boss_3`
    pub fn label(&self) -> String {
        format!("{}_{}", self.room_type, self.id)
    }

    /// Check if a cell is inside the room
    pub fn contains(&self, pos: Position) -> bool {
        self.rect.contains(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_room_type_order() {
        let all: Vec<_> = RoomType::iter().collect();
        assert_eq!(all.len(), 6);
        assert_eq!(all[0], RoomType::Start);
        assert_eq!(all[5], RoomType::Puzzle);
        assert_eq!(RoomType::default(), RoomType::Normal);
    }

    #[test]
    fn test_fixed_types() {
        assert!(RoomType::Start.is_fixed());
        assert!(RoomType::Boss.is_fixed());
        assert!(!RoomType::Shop.is_fixed());
    }

    #[test]
    fn test_room_label() {
        let mut room = Room::new(RoomId(3), Rect::from_size(1, 1, 4, 4), NodeId(7));
        assert_eq!(room.label(), "Normal_3");
        room.set_type(RoomType::Boss, None);
        assert_eq!(room.label(), "Boss_3");
    }

    #[test]
    fn test_config_get_returns_first_entry() {
        let config = RoomTypeConfig::new(vec![
            RoomTypeData::new(RoomType::Shop).with_weight(5.0),
            RoomTypeData::new(RoomType::Shop).with_weight(50.0),
            RoomTypeData::new(RoomType::Trap),
        ]);
        assert_eq!(config.get(RoomType::Shop).unwrap().spawn_weight, 5.0);
        assert!(config.get(RoomType::Puzzle).is_none());
    }

    #[test]
    fn test_weight_is_clamped() {
        assert_eq!(RoomTypeData::new(RoomType::Trap).with_weight(250.0).weight(), 100.0);
        assert_eq!(RoomTypeData::new(RoomType::Trap).with_weight(-1.0).weight(), 0.0);
        assert_eq!(RoomTypeData::new(RoomType::Trap).with_weight(f32::NAN).weight(), 0.0);
    }

    #[test]
    fn test_type_data_defaults_from_json() {
        let data: RoomTypeData = serde_json::from_str(r#"{"room_type":"Shop","is_unique":true}"#).unwrap();
        assert_eq!(data.room_type, RoomType::Shop);
        assert!(data.is_unique);
        assert_eq!(data.max_objects, 5);
        assert_eq!(data.spawn_weight, 10.0);
    }
}
