//! Generation parameters

use serde::{Deserialize, Serialize};

use crate::GenerationError;
use crate::dungeon::{Axis, RoomTypeConfig};

/// Largest accepted dungeon side, in cells
pub const MAX_DIMENSION: u32 = 4096;

/// Allowed range of the bottom corner modifier
pub const BOTTOM_MODIFIER_RANGE: (f32, f32) = (0.0, 0.3);
/// Allowed range of the top corner modifier
pub const TOP_MODIFIER_RANGE: (f32, f32) = (0.7, 1.0);
/// Allowed range of the corner pillar size
pub const PILLAR_SIZE_RANGE: (f32, f32) = (0.3, 1.0);

/// Everything `generate` needs besides the seed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    pub dungeon_width: u32,
    pub dungeon_length: u32,
    pub room_width_min: u32,
    pub room_length_min: u32,
    /// Depth budget of every partition branch
    pub max_iterations: u32,
    pub room_bottom_corner_modifier: f32,
    pub room_top_corner_modifier: f32,
    /// Margin between a room and its partition, 0 to 2
    pub room_offset: u32,
    pub corridor_width: u32,
    pub wall_height: f32,
    pub use_corner_pillars: bool,
    pub corner_pillar_size: f32,
    /// Type table; `None` leaves every room but Start and Boss Normal
    pub room_types: Option<RoomTypeConfig>,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            dungeon_width: 120,
            dungeon_length: 120,
            room_width_min: 12,
            room_length_min: 12,
            max_iterations: 6,
            room_bottom_corner_modifier: 0.1,
            room_top_corner_modifier: 0.9,
            room_offset: 1,
            corridor_width: 2,
            wall_height: 3.0,
            use_corner_pillars: true,
            corner_pillar_size: 0.6,
            room_types: None,
        }
    }
}

fn check_dimension(field: &'static str, value: u32) -> Result<(), GenerationError> {
    if value == 0 || value > MAX_DIMENSION {
        return Err(GenerationError::InvalidDimension { field, value });
    }
    Ok(())
}

fn check_range(field: &'static str, value: f32, (min, max): (f32, f32)) -> Result<(), GenerationError> {
    if !(min..=max).contains(&value) {
        return Err(GenerationError::ModifierOutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

impl DungeonConfig {
    /// Check every parameter; nothing is generated from an invalid config
    pub fn validate(&self) -> Result<(), GenerationError> {
        check_dimension("dungeon_width", self.dungeon_width)?;
        check_dimension("dungeon_length", self.dungeon_length)?;
        check_dimension("room_width_min", self.room_width_min)?;
        check_dimension("room_length_min", self.room_length_min)?;

        if self.room_width_min > self.dungeon_width {
            return Err(GenerationError::RoomLargerThanDungeon {
                axis: Axis::X,
                room: self.room_width_min,
                dungeon: self.dungeon_width,
            });
        }
        if self.room_length_min > self.dungeon_length {
            return Err(GenerationError::RoomLargerThanDungeon {
                axis: Axis::Y,
                room: self.room_length_min,
                dungeon: self.dungeon_length,
            });
        }

        check_range(
            "room_bottom_corner_modifier",
            self.room_bottom_corner_modifier,
            BOTTOM_MODIFIER_RANGE,
        )?;
        check_range(
            "room_top_corner_modifier",
            self.room_top_corner_modifier,
            TOP_MODIFIER_RANGE,
        )?;

        if self.room_offset > 2 {
            return Err(GenerationError::InvalidOffset(self.room_offset));
        }
        if self.corridor_width == 0
            || self.corridor_width > self.dungeon_width.min(self.dungeon_length)
        {
            return Err(GenerationError::InvalidCorridorWidth(self.corridor_width));
        }
        if !(self.wall_height.is_finite() && self.wall_height > 0.0) {
            return Err(GenerationError::InvalidWallHeight);
        }
        if !(PILLAR_SIZE_RANGE.0..=PILLAR_SIZE_RANGE.1).contains(&self.corner_pillar_size) {
            return Err(GenerationError::InvalidPillarSize(self.corner_pillar_size));
        }
        Ok(())
    }
}
