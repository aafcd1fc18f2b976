//! Generation errors

use thiserror::Error;

use crate::dungeon::Axis;

/// Configuration rejected before any generation work starts
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    #[error("{field} must be between 1 and {max}, got {value}", max = crate::config::MAX_DIMENSION)]
    InvalidDimension { field: &'static str, value: u32 },

    #[error("minimum room size {room} exceeds dungeon size {dungeon} along {axis:?}")]
    RoomLargerThanDungeon { axis: Axis, room: u32, dungeon: u32 },

    #[error("{field} must be within [{min}, {max}], got {value}")]
    ModifierOutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("room offset must be 0, 1 or 2, got {0}")]
    InvalidOffset(u32),

    #[error("corridor width must be between 1 and the shorter dungeon side, got {0}")]
    InvalidCorridorWidth(u32),

    #[error("wall height must be positive and finite")]
    InvalidWallHeight,

    #[error("corner pillar size must be within [0.3, 1.0], got {0}")]
    InvalidPillarSize(f32),
}
