//! Binary space partitioning
//!
//! The dungeon area is split recursively into a binary tree of rectangles.
//! Nodes live in an arena addressed by [`NodeId`]; children never outlive
//! their tree and never point back into another tree.

use std::collections::VecDeque;

use dgen_rng::RandomSource;
use serde::{Deserialize, Serialize};

use super::{Axis, Rect, RoomId};
use crate::config::MAX_DIMENSION;

/// Index of a node in a [`PartitionTree`]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct NodeId(pub usize);

/// Direction of the cut that produced a node's children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SplitAxis {
    /// Cut along a vertical line, dividing the width
    Vertical,
    /// Cut along a horizontal line, dividing the length
    Horizontal,
}

impl SplitAxis {
    /// Axis on which the split coordinate lies
    pub const fn axis(self) -> Axis {
        match self {
            SplitAxis::Vertical => Axis::X,
            SplitAxis::Horizontal => Axis::Y,
        }
    }
}

/// A node of the partition tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionNode {
    pub id: NodeId,
    pub rect: Rect,
    pub parent: Option<NodeId>,
    /// Low side first, then high side along the split axis
    pub children: Option<[NodeId; 2]>,
    pub depth: u32,
    pub split: Option<SplitAxis>,
    /// Room carved in this leaf
    pub room: Option<RoomId>,
}

impl PartitionNode {
    pub const fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// Arena-backed partition tree; node 0 is the root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionTree {
    nodes: Vec<PartitionNode>,
}

impl PartitionTree {
    /// Tree consisting of a single root leaf
    pub fn new(root: Rect) -> Self {
        Self {
            nodes: vec![PartitionNode {
                id: NodeId(0),
                rect: root,
                parent: None,
                children: None,
                depth: 0,
                split: None,
                room: None,
            }],
        }
    }

    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> Option<&PartitionNode> {
        self.nodes.get(id.0)
    }

    /// All nodes in creation (breadth-first) order
    pub fn nodes(&self) -> &[PartitionNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Deepest node depth
    pub fn max_depth(&self) -> u32 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Leaves in depth-first order, first child before second
    pub fn leaves(&self) -> Vec<NodeId> {
        self.leaves_under(self.root())
    }

    /// Leaves of the subtree rooted at `id`, depth-first
    pub fn leaves_under(&self, id: NodeId) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.node(current) else {
                continue;
            };
            match node.children {
                Some([low, high]) => {
                    stack.push(high);
                    stack.push(low);
                }
                None => leaves.push(current),
            }
        }
        leaves
    }

    /// Nodes that have children, deepest first, ties by id
    pub fn internal_nodes_deepest_first(&self) -> Vec<NodeId> {
        let mut internal: Vec<&PartitionNode> =
            self.nodes.iter().filter(|n| !n.is_leaf()).collect();
        internal.sort_by(|a, b| b.depth.cmp(&a.depth));
        internal.into_iter().map(|n| n.id).collect()
    }

    /// Split a leaf at coordinate `at` and return its two children
    pub(crate) fn split(&mut self, id: NodeId, split: SplitAxis, at: i32) -> [NodeId; 2] {
        let (rect, depth) = {
            let node = &self.nodes[id.0];
            (node.rect, node.depth)
        };
        let (low, high) = match split {
            SplitAxis::Vertical => (
                Rect::from_coords(rect.min.x, rect.min.y, at, rect.max.y),
                Rect::from_coords(at, rect.min.y, rect.max.x, rect.max.y),
            ),
            SplitAxis::Horizontal => (
                Rect::from_coords(rect.min.x, rect.min.y, rect.max.x, at),
                Rect::from_coords(rect.min.x, at, rect.max.x, rect.max.y),
            ),
        };

        let mut ids = [NodeId(0); 2];
        for (slot, child) in ids.iter_mut().zip([low, high]) {
            *slot = NodeId(self.nodes.len());
            self.nodes.push(PartitionNode {
                id: *slot,
                rect: child,
                parent: Some(id),
                children: None,
                depth: depth + 1,
                split: None,
                room: None,
            });
        }

        let node = &mut self.nodes[id.0];
        node.children = Some(ids);
        node.split = Some(split);
        ids
    }

    pub(crate) fn set_room(&mut self, id: NodeId, room: RoomId) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.room = Some(room);
        }
    }
}

/// Pick the cut for `rect`, or `None` if it is too small to split
fn choose_split<R: RandomSource>(
    rect: &Rect,
    min_width: i32,
    min_length: i32,
    rng: &mut R,
) -> Option<SplitAxis> {
    let can_vertical = rect.width() >= 2 * min_width;
    let can_horizontal = rect.length() >= 2 * min_length;

    match (can_vertical, can_horizontal) {
        (false, false) => None,
        (true, false) => Some(SplitAxis::Vertical),
        (false, true) => Some(SplitAxis::Horizontal),
        (true, true) => {
            if rect.width() > rect.length() {
                Some(SplitAxis::Vertical)
            } else if rect.length() > rect.width() {
                Some(SplitAxis::Horizontal)
            } else if rng.coin() {
                Some(SplitAxis::Vertical)
            } else {
                Some(SplitAxis::Horizontal)
            }
        }
    }
}

/// Partition a `width` x `length` area.
///
/// A node splits while its depth is below `max_iterations` and one of its
/// sides can hold two minimum-size children. Nodes are processed breadth
/// first, so node ids grow with depth.
pub fn partition<R: RandomSource>(
    width: u32,
    length: u32,
    max_iterations: u32,
    min_room_width: u32,
    min_room_length: u32,
    rng: &mut R,
) -> PartitionTree {
    let width = width.min(MAX_DIMENSION) as i32;
    let length = length.min(MAX_DIMENSION) as i32;
    let min_width = min_room_width.clamp(1, MAX_DIMENSION) as i32;
    let min_length = min_room_length.clamp(1, MAX_DIMENSION) as i32;

    let mut tree = PartitionTree::new(Rect::from_size(0, 0, width, length));
    let mut queue = VecDeque::from([tree.root()]);

    while let Some(id) = queue.pop_front() {
        let node = &tree.nodes[id.0];
        if node.depth >= max_iterations {
            continue;
        }
        let rect = node.rect;
        let Some(split) = choose_split(&rect, min_width, min_length, rng) else {
            continue;
        };

        let at = match split {
            SplitAxis::Vertical => {
                rng.range_inclusive(rect.min.x + min_width, rect.max.x - min_width)
            }
            SplitAxis::Horizontal => {
                rng.range_inclusive(rect.min.y + min_length, rect.max.y - min_length)
            }
        };

        let children = tree.split(id, split, at);
        queue.extend(children);
    }

    log::debug!(
        "partitioned {}x{} into {} nodes ({} leaves, depth {})",
        width,
        length,
        tree.len(),
        tree.leaves().len(),
        tree.max_depth()
    );

    tree
}
