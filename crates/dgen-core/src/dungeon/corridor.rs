//! Corridor generation
//!
//! Walks the partition tree deepest first and joins the two subtrees of every
//! internal node with one corridor:
//! 1. A straight corridor between the closest pair of rooms that face each
//!    other across the split with at least `corridor_width` cells of overlap
//! 2. Otherwise an L-shaped corridor between the pair with the closest
//!    centres
//!
//! Every leg reaches one cell into the room (or leg) it starts from, so the
//! rooms under a node are connected once both of its subtrees are.

use serde::{Deserialize, Serialize};

use super::{Axis, NodeId, PartitionTree, Position, Rect, Room, RoomId};
use crate::config::MAX_DIMENSION;

/// A connector between two rooms of sibling subtrees
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corridor {
    /// Leg leaving the `from` room
    pub rect: Rect,
    /// Perpendicular leg into the `to` room, for L-shaped corridors
    pub bend: Option<Rect>,
    pub width: u32,
    /// Internal partition node this corridor serves
    pub node: NodeId,
    pub from: RoomId,
    pub to: RoomId,
}

impl Corridor {
    /// Legs of the corridor, primary first
    pub fn rects(&self) -> impl Iterator<Item = Rect> + '_ {
        std::iter::once(self.rect).chain(self.bend)
    }

    /// Every cell covered by a leg (cells shared by both legs appear twice)
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        std::iter::once(&self.rect)
            .chain(self.bend.as_ref())
            .flat_map(|r| r.cells())
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.rects().any(|r| r.contains(pos))
    }

    pub fn is_straight(&self) -> bool {
        self.bend.is_none()
    }
}

/// Tracks room connectivity using equivalence classes
#[derive(Debug, Clone)]
pub struct ConnectivityTracker {
    /// Each room's equivalence class (rooms in same class are connected)
    class: Vec<usize>,
}

impl ConnectivityTracker {
    /// Create a new tracker for the given number of rooms
    pub fn new(num_rooms: usize) -> Self {
        Self {
            class: (0..num_rooms).collect(),
        }
    }

    /// Check if two rooms are connected (in same equivalence class)
    pub fn are_connected(&self, a: RoomId, b: RoomId) -> bool {
        match (self.class.get(a.0), self.class.get(b.0)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    /// Merge equivalence classes when rooms are connected
    pub fn merge(&mut self, a: RoomId, b: RoomId) {
        let (Some(&new_class), Some(&old_class)) = (self.class.get(a.0), self.class.get(b.0))
        else {
            return;
        };
        for eq in &mut self.class {
            if *eq == old_class {
                *eq = new_class;
            }
        }
    }

    /// Check if all rooms are connected
    pub fn all_connected(&self) -> bool {
        match self.class.first() {
            Some(&first) => self.class.iter().all(|&c| c == first),
            None => true,
        }
    }
}

/// Start of a `width`-wide band centred on `center`, kept inside `[lo, hi)`
/// where possible
fn centred_band(center: i32, lo: i32, hi: i32, width: i32) -> i32 {
    center
        .saturating_sub(width / 2)
        .clamp(lo, lo.max(hi.saturating_sub(width)))
}

fn axis_coord(pos: Position, axis: Axis) -> i32 {
    match axis {
        Axis::X => pos.x,
        Axis::Y => pos.y,
    }
}

/// Straight corridor across the gap between `a` (low side) and `b`
fn straight(a: &Rect, b: &Rect, axis: Axis, width: i32) -> Rect {
    let across = axis.other();
    let (a0, a1) = a.span(across);
    let (b0, b1) = b.span(across);
    let (lo, hi) = (a0.max(b0), a1.min(b1));
    let start = lo.saturating_add(hi.saturating_sub(lo).saturating_sub(width) / 2);

    let along = (a.span(axis).1.saturating_sub(1), b.span(axis).0.saturating_add(1));
    Rect::from_spans(axis, along, (start, start.saturating_add(width)))
}

/// L-shaped corridor: a leg from `a` across the split, then a leg into `b`
fn bent(a: &Rect, b: &Rect, axis: Axis, width: i32) -> (Rect, Rect) {
    let across = axis.other();
    let (a0, a1) = a.span(across);
    let (b_along0, b_along1) = b.span(axis);
    let (b0, b1) = b.span(across);

    let leg_across = centred_band(axis_coord(a.center(), across), a0, a1, width);
    let bend_along = centred_band(axis_coord(b.center(), axis), b_along0, b_along1, width);

    let leg_end = leg_across.saturating_add(width);
    let bend_end = bend_along.saturating_add(width);

    let primary = Rect::from_spans(
        axis,
        (a.span(axis).1.saturating_sub(1), bend_end),
        (leg_across, leg_end),
    );
    let bend = Rect::from_spans(
        axis,
        (bend_along, bend_end),
        (leg_across.min(b1.saturating_sub(1)), leg_end.max(b0.saturating_add(1))),
    );
    (primary, bend)
}

fn rooms_under<'a>(tree: &PartitionTree, id: NodeId, rooms: &'a [Room]) -> Vec<&'a Room> {
    tree.leaves_under(id)
        .into_iter()
        .filter_map(|leaf| tree.node(leaf).and_then(|n| n.room))
        .filter_map(|room| rooms.get(room.0))
        .collect()
}

/// Join the two subtrees of `node`
fn join(
    tree: &PartitionTree,
    node: NodeId,
    rooms: &[Room],
    width: i32,
) -> Option<Corridor> {
    let n = tree.node(node)?;
    let [low, high] = n.children?;
    let axis = n.split?.axis();
    let across = axis.other();

    let low_rooms = rooms_under(tree, low, rooms);
    let high_rooms = rooms_under(tree, high, rooms);

    let mut best_straight: Option<(i32, &Room, &Room)> = None;
    let mut best_bent: Option<(i32, &Room, &Room)> = None;
    for &a in &low_rooms {
        for &b in &high_rooms {
            if a.rect.overlap(&b.rect, across) >= width {
                let gap = b.rect.span(axis).0 - a.rect.span(axis).1;
                if best_straight.is_none_or(|(g, _, _)| gap < g) {
                    best_straight = Some((gap, a, b));
                }
            }
            let dist = a.center().manhattan(b.center());
            if best_bent.is_none_or(|(d, _, _)| dist < d) {
                best_bent = Some((dist, a, b));
            }
        }
    }

    if let Some((_, a, b)) = best_straight {
        return Some(Corridor {
            rect: straight(&a.rect, &b.rect, axis, width),
            bend: None,
            width: width as u32,
            node,
            from: a.id,
            to: b.id,
        });
    }

    let (_, a, b) = best_bent?;
    let (rect, bend) = bent(&a.rect, &b.rect, axis, width);
    Some(Corridor {
        rect,
        bend: Some(bend),
        width: width as u32,
        node,
        from: a.id,
        to: b.id,
    })
}

/// Build one corridor per internal node, deepest nodes first.
///
/// The result is a pure function of the tree and the rooms. Widths are
/// clamped to `1..=MAX_DIMENSION`.
pub fn connect(tree: &PartitionTree, rooms: &[Room], corridor_width: u32) -> Vec<Corridor> {
    let width = corridor_width.clamp(1, MAX_DIMENSION) as i32;
    let mut tracker = ConnectivityTracker::new(rooms.len());

    let corridors: Vec<Corridor> = tree
        .internal_nodes_deepest_first()
        .into_iter()
        .filter_map(|node| join(tree, node, rooms, width))
        .inspect(|c| tracker.merge(c.from, c.to))
        .collect();

    log::debug!(
        "connected {} rooms with {} corridors ({} bent)",
        rooms.len(),
        corridors.len(),
        corridors.iter().filter(|c| !c.is_straight()).count()
    );
    if !tracker.all_connected() {
        log::warn!("corridor graph does not connect every room");
    }

    corridors
}
