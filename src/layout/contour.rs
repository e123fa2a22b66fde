// Contour walker for the children of one node.
//
// Every child subtree gets two cursors: one walking its left boundary and one
// walking its right boundary, both one depth level per step. A boundary step
// follows the node's thread if it has one, otherwise descends to the first
// (left) or last (right) child, otherwise the cursor is exhausted and keeps
// the last node it reached so the thread manager can link from it.
//
// Offsets are relative to the root of the child subtree the cursor belongs to.

use log::trace;

use super::thread::ThreadTable;
use super::unit::Coord;
use crate::tree::{NodeId, Tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
pub struct Cursor {
    /// Node reached on this boundary, or the last one reached once exhausted.
    pub node: NodeId,
    /// `node` position minus the position of the subtree root.
    pub offset: Coord,
    pub exhausted: bool,
}

impl Cursor {
    fn at(root: NodeId) -> Self {
        Self { node: root, offset: Coord::ZERO, exhausted: false }
    }

    pub fn is_live(&self) -> bool {
        !self.exhausted
    }

    /// Move one level down this boundary.
    fn step(&mut self, side: Side, tree: &Tree, offsets: &[Coord], threads: &ThreadTable) {
        if self.exhausted {
            return;
        }
        if let Some(thread) = threads.get(self.node) {
            trace!(
                "    {:?} cursor #{} -> thread #{} (+{})",
                side,
                tree.node(self.node).name,
                tree.node(thread.target).name,
                thread.offset
            );
            self.offset += thread.offset;
            self.node = thread.target;
            return;
        }
        let children = tree.children(self.node);
        let next = match side {
            Side::Left => children.first(),
            Side::Right => children.last(),
        };
        match next {
            Some(&child) => {
                self.offset += offsets[child.0];
                self.node = child;
            }
            None => self.exhausted = true,
        }
    }
}

/// Dual cursors over all children of one parent.
#[derive(Debug)]
pub struct ContourWalker {
    pub left: Vec<Cursor>,
    pub right: Vec<Cursor>,
    /// Child indexes still taking part in the walk, ascending.
    pub active: Vec<usize>,
}

impl ContourWalker {
    pub fn new(children: &[NodeId]) -> Self {
        Self {
            left: children.iter().map(|&c| Cursor::at(c)).collect(),
            right: children.iter().map(|&c| Cursor::at(c)).collect(),
            active: (0..children.len()).collect(),
        }
    }

    pub fn is_done(&self) -> bool {
        self.active.is_empty()
    }

    /// Advance both cursors of every active child by one level.
    pub fn advance(&mut self, tree: &Tree, offsets: &[Coord], threads: &ThreadTable) {
        for &i in &self.active {
            self.left[i].step(Side::Left, tree, offsets, threads);
            self.right[i].step(Side::Right, tree, offsets, threads);
        }
    }

    /// Indexes that stay active after the last `advance`.
    ///
    /// A neighboring pair compares the right boundary of its left member with
    /// the left boundary of its right member. The first active index is only
    /// ever a left member, so it lives as long as its right boundary does;
    /// every other index is the right member of the pair before it, so it
    /// lives as long as its left boundary does.
    pub fn survivors(&self) -> Vec<usize> {
        self.active
            .iter()
            .enumerate()
            .filter(|&(k, &i)| if k == 0 { self.right[i].is_live() } else { self.left[i].is_live() })
            .map(|(_, &i)| i)
            .collect()
    }

    pub fn retire(&mut self, survivors: Vec<usize>) {
        self.active = survivors;
    }
}
