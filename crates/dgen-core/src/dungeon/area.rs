use super::{Corridor, Rect, Room};

/// A walkable area of the layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Area<'a> {
    Room(&'a Room),
    Corridor(&'a Corridor),
}

impl Area<'_> {
    /// Rectangles covered by the area
    pub fn rects(&self) -> Vec<Rect> {
        match self {
            Area::Room(room) => vec![room.rect],
            Area::Corridor(corridor) => corridor.rects().collect(),
        }
    }

    pub fn is_room(&self) -> bool {
        matches!(self, Area::Room(_))
    }
}
