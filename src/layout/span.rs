// Span aggregator: extreme descendants of one sibling group.
//
// The leftmost and rightmost roles move between subtrees as shallow ones run
// out, and gaps keep growing while deeper levels are compared. Extremes are
// therefore recorded per child index, in that child's own frame, and only
// converted into the frame of child 0 once the gaps are final.
//
// Every finished subtree also keeps its own extent, so a walk that is down to
// one subtree can record that subtree whole and stop.

use super::unit::Coord;
use crate::tree::NodeId;

/// Leftmost and rightmost positions in a subtree, root included, relative to
/// the subtree root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub lo: Coord,
    pub hi: Coord,
    /// Node at `hi`, for diagnostics.
    pub hi_node: NodeId,
}

impl Extent {
    pub fn leaf(node: NodeId) -> Self {
        Self { lo: Coord::ZERO, hi: Coord::ZERO, hi_node: node }
    }

    /// Descendant extremes `[lo, hi]` seen from `root`, widened to cover the
    /// root itself.
    pub fn around(root: NodeId, lo: Coord, hi: Coord, hi_node: NodeId) -> Self {
        let (hi, hi_node) = if hi < Coord::ZERO { (Coord::ZERO, root) } else { (hi, hi_node) };
        Self { lo: lo.min(Coord::ZERO), hi, hi_node }
    }
}

#[derive(Debug)]
pub struct SpanAggregator {
    leftmost: Vec<Option<Coord>>,
    rightmost: Vec<Option<(NodeId, Coord)>>,
}

impl SpanAggregator {
    /// Seeded with the first and last child themselves.
    pub fn new(children: &[NodeId]) -> Self {
        let n = children.len();
        let mut leftmost = vec![None; n];
        let mut rightmost = vec![None; n];
        if let (Some(_), Some(&last)) = (children.first(), children.last()) {
            leftmost[0] = Some(Coord::ZERO);
            rightmost[n - 1] = Some((last, Coord::ZERO));
        }
        Self { leftmost, rightmost }
    }

    pub fn record_left(&mut self, index: usize, offset: Coord) {
        let slot = &mut self.leftmost[index];
        *slot = Some(slot.map_or(offset, |o| o.min(offset)));
    }

    pub fn record_right(&mut self, index: usize, node: NodeId, offset: Coord) {
        let slot = &mut self.rightmost[index];
        if slot.is_none_or(|(_, o)| o < offset) {
            *slot = Some((node, offset));
        }
    }

    /// Record everything below child `index` at once.
    pub fn record_subtree(&mut self, index: usize, extent: Extent) {
        self.record_left(index, extent.lo);
        self.record_right(index, extent.hi_node, extent.hi);
    }

    /// `(leftmost, rightmost)` descendant positions relative to child 0.
    pub fn extent(&self, gaps: &[Coord]) -> (Coord, Coord) {
        let mut distance = Coord::ZERO;
        let mut lo = Coord::ZERO;
        let mut hi = Coord::ZERO;
        for (i, gap) in gaps.iter().enumerate() {
            if i > 0 {
                distance += *gap;
            }
            if let Some(offset) = self.leftmost[i] {
                lo = lo.min(distance + offset);
            }
            if let Some((_, offset)) = self.rightmost[i] {
                hi = hi.max(distance + offset);
            }
        }
        (lo, hi)
    }

    /// Node holding the rightmost position, for diagnostics.
    pub fn rightmost_node(&self, gaps: &[Coord]) -> Option<NodeId> {
        let mut distance = Coord::ZERO;
        let mut best: Option<(NodeId, Coord)> = None;
        for (i, gap) in gaps.iter().enumerate() {
            if i > 0 {
                distance += *gap;
            }
            if let Some((node, offset)) = self.rightmost[i] {
                if best.is_none_or(|(_, b)| b < distance + offset) {
                    best = Some((node, distance + offset));
                }
            }
        }
        best.map(|(node, _)| node)
    }
}
