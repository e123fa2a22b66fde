// Threads: temporary shortcut edges between contours.
//
// When the outermost subtree of a sibling group runs out of depth, the last
// node on its outer boundary is linked to the live cursor of the next
// subtree inward at the same depth. Later walks (the parent's siblings, the
// normalization walk) cross the gap in one hop instead of rescanning.
//
// Threads live in a side table keyed by source node; the tree itself is never
// touched. Every entry is consumed by the final absolute pass.

use std::collections::HashMap;

use log::trace;

use super::contour::ContourWalker;
use super::unit::Coord;
use crate::tree::{NodeId, Tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thread {
    pub target: NodeId,
    /// `target` position minus source position.
    pub offset: Coord,
}

#[derive(Debug, Default)]
pub struct ThreadTable {
    links: HashMap<NodeId, Thread>,
}

impl ThreadTable {
    pub fn get(&self, source: NodeId) -> Option<Thread> {
        self.links.get(&source).copied()
    }

    pub fn link(&mut self, source: NodeId, target: NodeId, offset: Coord) {
        let previous = self.links.insert(source, Thread { target, offset });
        debug_assert!(previous.is_none(), "node {:?} threaded twice", source);
    }

    pub fn take(&mut self, source: NodeId) -> Option<Thread> {
        self.links.remove(&source)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Thread the leftmost active subtree into its successor once its right
/// boundary has run out. Returns the child index now holding the leftmost
/// role.
///
/// `active` is the active list from before the current step was retired.
pub fn thread_left(
    tree: &Tree,
    walker: &ContourWalker,
    gaps: &[Coord],
    threads: &mut ThreadTable,
) -> usize {
    let active = &walker.active;
    let leftmost = active[0];
    if active.len() < 2 || walker.right[leftmost].is_live() {
        return leftmost;
    }

    // Skip subtrees exhausted in the same step.
    let Some(&next) = active[1..].iter().find(|&&i| walker.left[i].is_live()) else {
        return leftmost;
    };

    let distance: Coord = gaps[leftmost + 1..=next].iter().sum();
    let source = walker.left[leftmost];
    let target = walker.left[next];
    let offset = distance + target.offset - source.offset;
    trace!(
        "    thread left #{} -> #{} ({})",
        tree.node(source.node).name,
        tree.node(target.node).name,
        offset
    );
    threads.link(source.node, target.node, offset);
    next
}

/// Mirror of [`thread_left`] for the rightmost active subtree, linking toward
/// the previous subtree that still has a live right boundary.
pub fn thread_right(
    tree: &Tree,
    walker: &ContourWalker,
    gaps: &[Coord],
    threads: &mut ThreadTable,
) -> usize {
    let active = &walker.active;
    let rightmost = active[active.len() - 1];
    if active.len() < 2 || walker.left[rightmost].is_live() {
        return rightmost;
    }

    let Some(&prev) = active[..active.len() - 1]
        .iter()
        .rev()
        .find(|&&i| walker.right[i].is_live())
    else {
        return rightmost;
    };

    let distance: Coord = gaps[prev + 1..=rightmost].iter().sum();
    let source = walker.right[rightmost];
    let target = walker.right[prev];
    let offset = target.offset - source.offset - distance;
    trace!(
        "    thread right #{} -> #{} ({})",
        tree.node(source.node).name,
        tree.node(target.node).name,
        offset
    );
    threads.link(source.node, target.node, offset);
    prev
}
