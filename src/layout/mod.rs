// Tidy tree layouter.
//
// Goals:
// - Nodes of equal depth share one rail (the caller maps depth to y)
// - Every parent is centered over its leftmost and rightmost descendants
// - Neighboring subtrees keep at least `min_distance` apart on every level
// - Context free: a subtree is drawn the same wherever it is attached
// - Linear time: threads let contour walks skip exhausted subtrees, and a
//   walk stops once a single subtree is left, recording that subtree's
//   cached extent instead of descending through it
//
// Passes:
// 1. Relative (children before parents): for each parent, walk the contours
//    of all child subtrees together, push neighbors apart, thread exhausted
//    boundaries, and center the parent over the realized span. Offsets are
//    stored relative to the parent, extents relative to the node itself.
// 2. Normalization: walk the left contour of the whole tree to find the
//    smallest offset.
// 3. Petrify (parents before children): turn offsets into absolute positions
//    with the root shifted so the smallest position is exactly 0. Threads are
//    consumed on the way.
//
// Submodules:
// - unit: fixed-point coordinates
// - contour: per-child left/right boundary cursors
// - thread: shortcut links between contours
// - push_apart: minimum-distance enforcement
// - span: leftmost/rightmost descendant tracking

use std::fmt;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::tree::{NodeId, Tree};

mod contour;
mod push_apart;
mod span;
mod thread;
mod unit;

use contour::ContourWalker;
use push_apart::push_apart;
use span::{Extent, SpanAggregator};
use thread::{ThreadTable, thread_left, thread_right};

pub use unit::Coord;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Minimum horizontal distance between two nodes on the same depth.
    pub min_distance: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { min_distance: 1.0 }
    }
}

impl LayoutConfig {
    /// Largest accepted `min_distance`. Widths grow with the node count times
    /// this value and must stay inside the fixed-point range.
    pub const MAX_MIN_DISTANCE: f64 = 1.0e6;

    /// Reject settings the layout cannot honor. Non-positive distances are
    /// accepted and clamped to one raw unit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = self.min_distance;
        if !d.is_finite() {
            return Err(ConfigError { msg: format!("min_distance must be a finite number, got {}", d) });
        }
        if d > Self::MAX_MIN_DISTANCE {
            return Err(ConfigError {
                msg: format!("min_distance {} exceeds the maximum of {}", d, Self::MAX_MIN_DISTANCE),
            });
        }
        Ok(())
    }

    /// The distance actually used. NaN falls back to the default; anything
    /// else is clamped into `[EPSILON, MAX_MIN_DISTANCE]`.
    fn min_distance(&self) -> Coord {
        let d = if self.min_distance.is_nan() {
            Self::default().min_distance
        } else {
            self.min_distance.min(Self::MAX_MIN_DISTANCE)
        };
        Coord::from_f64(d).max(Coord::EPSILON)
    }
}

/// A layout setting out of range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigError {
    pub msg: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Config error: {}", self.msg)
    }
}

impl std::error::Error for ConfigError {}

/// What a layout call produced, besides the positions written into the tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutSummary {
    pub nodes: usize,
    /// Largest position; the smallest is always 0.
    pub width: Coord,
    /// Deepest rail.
    pub depth: usize,
}

/// Assign every node of `tree` its absolute position.
///
/// Calling this again on the same tree reproduces the same positions.
pub fn layout_tree(tree: &mut Tree, cfg: &LayoutConfig) -> LayoutSummary {
    let positions = {
        let mut layouter = Layouter::new(tree, cfg.min_distance());
        layouter.relative_pass();
        let shift = -layouter.left_contour_min();
        layouter.petrify(shift)
    };

    for (node, position) in tree.nodes.iter_mut().zip(positions) {
        node.position = position;
    }

    let summary = LayoutSummary {
        nodes: tree.len(),
        width: tree.nodes.iter().map(|n| n.position).max().unwrap_or(Coord::ZERO),
        depth: tree.max_depth(),
    };
    debug!("layout: {} nodes, width {}, depth {}", summary.nodes, summary.width, summary.depth);
    summary
}

struct Layouter<'a> {
    tree: &'a Tree,
    min_distance: Coord,
    /// Position relative to the parent (root: 0).
    offsets: Vec<Coord>,
    threads: ThreadTable,
    /// Levels below each node (leaf: 0). Bounds the contour walk.
    heights: Vec<usize>,
    /// Extreme positions of each finished subtree, relative to its root.
    extents: Vec<Extent>,
}

impl<'a> Layouter<'a> {
    fn new(tree: &'a Tree, min_distance: Coord) -> Self {
        let mut heights = vec![0; tree.len()];
        for nid in tree.post_order() {
            heights[nid.0] = tree
                .children(nid)
                .iter()
                .map(|c| heights[c.0] + 1)
                .max()
                .unwrap_or(0);
        }
        Self {
            tree,
            min_distance,
            offsets: vec![Coord::ZERO; tree.len()],
            threads: ThreadTable::default(),
            heights,
            extents: (0..tree.len()).map(|i| Extent::leaf(NodeId(i))).collect(),
        }
    }

    fn relative_pass(&mut self) {
        for nid in self.tree.post_order() {
            self.layout_children(nid);
        }
        debug!("relative pass done, {} threads", self.threads.len());
    }

    fn layout_children(&mut self, parent: NodeId) {
        let tree = self.tree;
        let children = tree.children(parent);
        match children.len() {
            0 => return,
            1 => {
                // The child subtree is already centered on its own root.
                let child = children[0];
                self.offsets[child.0] = Coord::ZERO;
                let e = self.extents[child.0];
                self.extents[parent.0] = Extent::around(parent, e.lo, e.hi, e.hi_node);
                return;
            }
            _ => {}
        }

        // gaps[i]: distance from child i-1 to child i while the walk runs.
        let mut gaps: Vec<Coord> = (0..children.len())
            .map(|i| if i == 0 { Coord::ZERO } else { self.min_distance })
            .collect();
        let mut walker = ContourWalker::new(children);
        let mut span = SpanAggregator::new(children);

        // Each step goes one level deeper, so the deepest child bounds the walk.
        let max_steps = children.iter().map(|c| self.heights[c.0]).max().unwrap_or(0) + 1;
        let mut steps = 0;

        trace!("#{} children {:?}", tree.node(parent).name, names(tree, children));
        while !walker.is_done() {
            steps += 1;
            assert!(
                steps <= max_steps,
                "contour walk under #{} did not terminate within {} levels",
                tree.node(parent).name,
                max_steps
            );
            trace!("  level {}, active {:?}", steps, walker.active);

            walker.advance(tree, &self.offsets, &self.threads);
            let survivors = walker.survivors();
            push_apart(&walker, &survivors, &mut gaps, self.min_distance);

            let leftmost = thread_left(tree, &walker, &gaps, &mut self.threads);
            let rightmost = thread_right(tree, &walker, &gaps, &mut self.threads);

            walker.retire(survivors);
            if let &[only] = walker.active.as_slice() {
                // Nothing left to push against; the rest of this subtree is
                // covered by its extent.
                span.record_subtree(only, self.extents[children[only].0]);
                break;
            }
            if walker.is_done() {
                break;
            }
            let (left, right) = (walker.left[leftmost], walker.right[rightmost]);
            if left.is_live() {
                span.record_left(leftmost, left.offset);
            }
            if right.is_live() {
                span.record_right(rightmost, right.node, right.offset);
            }
        }

        let (lo, hi) = span.extent(&gaps);
        let mut current = -(lo + hi).half();
        for (child, gap) in children.iter().zip(&gaps) {
            current += *gap;
            self.offsets[child.0] = current;
        }

        let first = self.offsets[children[0].0];
        let rightmost = span.rightmost_node(&gaps).unwrap_or(parent);
        self.extents[parent.0] = Extent::around(parent, first + lo, first + hi, rightmost);

        debug!(
            "#{} span [{}, {}] rightmost #{} offsets {:?}",
            tree.node(parent).name,
            lo,
            hi,
            tree.node(rightmost).name,
            children.iter().map(|c| self.offsets[c.0].to_string()).collect::<Vec<_>>()
        );
    }

    /// Smallest offset (relative to the root) along the left contour of the
    /// whole tree. The left contour reaches the leftmost node of every depth,
    /// so this is the smallest position overall.
    fn left_contour_min(&self) -> Coord {
        let mut cursor = self.tree.root;
        let mut offset = Coord::ZERO;
        let mut min = Coord::ZERO;
        loop {
            if let Some(thread) = self.threads.get(cursor) {
                offset += thread.offset;
                cursor = thread.target;
            } else if let Some(&first) = self.tree.children(cursor).first() {
                offset += self.offsets[first.0];
                cursor = first;
            } else {
                break;
            }
            min = min.min(offset);
        }
        trace!("left contour minimum {}", min);
        min
    }

    /// Absolute positions, indexed by node, with the root at `root_position`.
    fn petrify(&mut self, root_position: Coord) -> Vec<Coord> {
        let tree = self.tree;
        let mut positions = vec![Coord::ZERO; tree.len()];
        positions[tree.root.0] = root_position;
        self.threads.take(tree.root);
        for nid in tree.pre_order() {
            for &child in tree.children(nid) {
                positions[child.0] = positions[nid.0] + self.offsets[child.0];
                self.threads.take(child);
            }
        }
        debug_assert!(self.threads.is_empty(), "threads left after petrify");
        positions
    }
}

fn names<'t>(tree: &'t Tree, nids: &[NodeId]) -> Vec<&'t str> {
    nids.iter().map(|&n| tree.node(n).name.as_str()).collect()
}

#[cfg(test)]
mod tests;
