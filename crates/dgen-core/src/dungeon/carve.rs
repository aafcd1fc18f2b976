//! Room carving inside partition leaves

use dgen_rng::RandomSource;

use super::{PartitionTree, Rect, Room, RoomId};
use crate::DungeonConfig;

/// Parameters controlling where a room may sit inside its leaf
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarveSettings {
    /// Fraction of the usable span the bottom-left corner may move into
    pub bottom_modifier: f32,
    /// Fraction of the usable span the top-right corner starts from
    pub top_modifier: f32,
    /// Margin kept between the room and its leaf boundary
    pub offset: i32,
    pub min_width: i32,
    pub min_length: i32,
}

impl From<&DungeonConfig> for CarveSettings {
    fn from(config: &DungeonConfig) -> Self {
        Self {
            bottom_modifier: config.room_bottom_corner_modifier,
            top_modifier: config.room_top_corner_modifier,
            offset: config.room_offset as i32,
            min_width: config.room_width_min as i32,
            min_length: config.room_length_min as i32,
        }
    }
}

/// Usable `(lo, hi)` of a leaf side after the offset, or the whole side when
/// the offset leaves nothing
fn inset(min: i32, max: i32, offset: i32) -> (i32, i32) {
    let (lo, hi) = (min + offset, max - offset);
    if hi - lo < 1 { (min, max) } else { (lo, hi) }
}

fn draw_bottom<R: RandomSource>(lo: i32, hi: i32, modifier: f32, rng: &mut R) -> i32 {
    let span = hi - lo;
    let reach = (span as f32 * modifier).floor() as i32;
    rng.range(lo, lo + reach).clamp(lo, hi - 1)
}

fn draw_top<R: RandomSource>(lo: i32, hi: i32, modifier: f32, rng: &mut R) -> i32 {
    let span = hi - lo;
    let start = lo + (span as f32 * modifier).floor() as i32;
    rng.range(start, hi).clamp(lo, hi)
}

/// Grow `[bottom, top)` to at least `min(min_dim, hi - lo)` cells without
/// leaving `[lo, hi]`: the top moves up first, then the bottom moves down
fn clamp_extent(bottom: i32, top: i32, lo: i32, hi: i32, min_dim: i32) -> (i32, i32) {
    let want = min_dim.min(hi - lo).max(1);
    let mut top = top;
    let mut bottom = bottom;
    if top - bottom < want {
        top = (bottom + want).min(hi);
    }
    if top - bottom < want {
        bottom = (top - want).max(lo);
    }
    (bottom, top)
}

/// Carve a room rectangle inside `leaf`.
///
/// Draw order is bottom x, bottom y, top x, top y.
pub fn carve_room<R: RandomSource>(leaf: &Rect, settings: &CarveSettings, rng: &mut R) -> Rect {
    let (x_lo, x_hi) = inset(leaf.min.x, leaf.max.x, settings.offset);
    let (y_lo, y_hi) = inset(leaf.min.y, leaf.max.y, settings.offset);

    let bottom_x = draw_bottom(x_lo, x_hi, settings.bottom_modifier, rng);
    let bottom_y = draw_bottom(y_lo, y_hi, settings.bottom_modifier, rng);
    let top_x = draw_top(x_lo, x_hi, settings.top_modifier, rng);
    let top_y = draw_top(y_lo, y_hi, settings.top_modifier, rng);

    let (x0, x1) = clamp_extent(bottom_x, top_x, x_lo, x_hi, settings.min_width);
    let (y0, y1) = clamp_extent(bottom_y, top_y, y_lo, y_hi, settings.min_length);

    Rect::from_coords(x0, y0, x1, y1)
}

/// Carve one room per leaf in depth-first leaf order and record each room on
/// its leaf
pub fn carve_rooms<R: RandomSource>(
    tree: &mut PartitionTree,
    settings: &CarveSettings,
    rng: &mut R,
) -> Vec<Room> {
    let mut rooms = Vec::new();
    for leaf in tree.leaves() {
        let Some(node) = tree.node(leaf) else {
            continue;
        };
        let rect = carve_room(&node.rect, settings, rng);
        let id = RoomId(rooms.len());
        tree.set_room(leaf, id);
        rooms.push(Room::new(id, rect, leaf));
    }

    log::debug!("carved {} rooms", rooms.len());
    rooms
}
