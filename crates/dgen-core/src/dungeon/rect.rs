//! Integer grid positions and axis-aligned rectangles
//!
//! A rectangle is half-open: `min` is inclusive, `max` is exclusive, so a room
//! of width W starting at x spans `[x, x + W)`.

use serde::{Deserialize, Serialize};

/// A cell coordinate on the dungeon grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Position shifted by `(dx, dy)`
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Euclidean distance between two positions
    pub fn distance(self, other: Position) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    /// Manhattan distance between two positions
    pub fn manhattan(self, other: Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// Axis of a rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Along x (width)
    X,
    /// Along y (length)
    Y,
}

impl Axis {
    pub const fn other(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

/// A half-open axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// Bottom-left corner (inclusive)
    pub min: Position,
    /// Top-right corner (exclusive)
    pub max: Position,
}

impl Rect {
    /// Create a rectangle from its bottom-left and top-right corners
    pub const fn new(min: Position, max: Position) -> Self {
        Self { min, max }
    }

    /// Create a rectangle from raw corner coordinates
    pub const fn from_coords(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            min: Position::new(x0, y0),
            max: Position::new(x1, y1),
        }
    }

    /// Create a rectangle from its origin and size
    pub const fn from_size(x: i32, y: i32, width: i32, length: i32) -> Self {
        Self::from_coords(x, y, x + width, y + length)
    }

    /// Extent along x
    pub const fn width(&self) -> i32 {
        self.max.x - self.min.x
    }

    /// Extent along y
    pub const fn length(&self) -> i32 {
        self.max.y - self.min.y
    }

    /// `(min, max)` along the given axis
    pub const fn span(&self, axis: Axis) -> (i32, i32) {
        match axis {
            Axis::X => (self.min.x, self.max.x),
            Axis::Y => (self.min.y, self.max.y),
        }
    }

    /// Number of cells covered, 0 for degenerate rectangles
    pub fn area(&self) -> i64 {
        if self.is_valid() {
            self.width() as i64 * self.length() as i64
        } else {
            0
        }
    }

    /// Floor-divided centre cell
    pub const fn center(&self) -> Position {
        Position::new(
            (self.min.x + self.max.x).div_euclid(2),
            (self.min.y + self.max.y).div_euclid(2),
        )
    }

    /// Bottom-right corner
    pub const fn bottom_right(&self) -> Position {
        Position::new(self.max.x, self.min.y)
    }

    /// Top-left corner
    pub const fn top_left(&self) -> Position {
        Position::new(self.min.x, self.max.y)
    }

    /// Check if the rectangle covers at least one cell
    pub const fn is_valid(&self) -> bool {
        self.max.x > self.min.x && self.max.y > self.min.y
    }

    /// Check if a cell lies inside the rectangle
    pub const fn contains(&self, pos: Position) -> bool {
        pos.x >= self.min.x && pos.x < self.max.x && pos.y >= self.min.y && pos.y < self.max.y
    }

    /// Check if this rectangle fully contains another
    pub const fn contains_rect(&self, other: &Rect) -> bool {
        self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && self.max.x >= other.max.x
            && self.max.y >= other.max.y
    }

    /// Check if two rectangles share at least one cell
    pub const fn intersects(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// Calculate the intersection of two rectangles
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }

        Some(Rect::from_coords(
            self.min.x.max(other.min.x),
            self.min.y.max(other.min.y),
            self.max.x.min(other.max.x),
            self.max.y.min(other.max.y),
        ))
    }

    /// Cells of `self` outside `other`, as up to four disjoint rectangles
    pub fn subtract(&self, other: &Rect) -> Vec<Rect> {
        let Some(cut) = self.intersection(other) else {
            return if self.is_valid() { vec![*self] } else { Vec::new() };
        };
        [
            Rect::from_coords(self.min.x, self.min.y, self.max.x, cut.min.y),
            Rect::from_coords(self.min.x, cut.max.y, self.max.x, self.max.y),
            Rect::from_coords(self.min.x, cut.min.y, cut.min.x, cut.max.y),
            Rect::from_coords(cut.max.x, cut.min.y, self.max.x, cut.max.y),
        ]
        .into_iter()
        .filter(Rect::is_valid)
        .collect()
    }

    /// Length of the shared interval of two rectangles along `axis`
    pub fn overlap(&self, other: &Rect, axis: Axis) -> i32 {
        let (a0, a1) = self.span(axis);
        let (b0, b1) = other.span(axis);
        (a1.min(b1) - a0.max(b0)).max(0)
    }

    /// Build a rectangle from spans given as `(along, across)` relative to `axis`
    pub const fn from_spans(axis: Axis, along: (i32, i32), across: (i32, i32)) -> Rect {
        match axis {
            Axis::X => Rect::from_coords(along.0, across.0, along.1, across.1),
            Axis::Y => Rect::from_coords(across.0, along.0, across.1, along.1),
        }
    }

    /// Iterate over every cell, x-major (column by column)
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (self.min.x..self.max.x)
            .flat_map(move |x| (self.min.y..self.max.y).map(move |y| Position::new(x, y)))
    }
}
