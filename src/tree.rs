//
// Tree model: an ordered rooted tree stored in a contiguous arena.
//
// What this does:
// - Nodes are addressed by NodeId (index into Tree::nodes)
// - Children order is insertion order and is never changed
// - TreeBuilder validates the shape before a Tree exists:
//     - a node has at most one parent (no shared children, no self loops)
//     - exactly one root
//     - every node reachable from the root (no cycles)
// - Depths are assigned once the shape is known
//
// The layout engine only ever sees a validated Tree, so it never has to
// defend against malformed graphs.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use serde::Serialize;

use crate::layout::Coord;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub nid: NodeId,
    /// Unique name (identifier in text input, number in JSON input)
    pub name: String,
    /// Display label (optional)
    pub label: Option<String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Distance from the root (root = 0). Informational only.
    pub depth: usize,
    /// Absolute horizontal coordinate, valid after layout.
    pub position: Coord,
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Tree {
    pub root: NodeId,
    pub nodes: Vec<Node>,
}

impl Tree {
    /// Build from `[parent, child, child, ...]` rows of numeric names.
    /// Child `0` is skipped so binary test cases with empty slots still work.
    pub fn from_relations(rows: &[Vec<u32>]) -> Result<Tree, TreeError> {
        let mut builder = TreeBuilder::new();
        for row in rows {
            let Some((&parent, children)) = row.split_first() else {
                continue;
            };
            let parent = builder.node(&parent.to_string());
            for &child in children.iter().filter(|&&c| c != 0) {
                let child = builder.node(&child.to_string());
                builder.add_child(parent, child)?;
            }
        }
        builder.build()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, nid: NodeId) -> &Node {
        &self.nodes[nid.0]
    }

    pub fn children(&self, nid: NodeId) -> &[NodeId] {
        &self.nodes[nid.0].children
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().find(|n| n.name == name).map(|n| n.nid)
    }

    /// Position of the node called `name`, if any.
    pub fn position_of(&self, name: &str) -> Option<Coord> {
        self.find(name).map(|nid| self.node(nid).position)
    }

    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Pre-order traversal: parent before children, children left to right.
    pub fn pre_order(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(nid) = stack.pop() {
            out.push(nid);
            stack.extend(self.children(nid).iter().rev());
        }
        out
    }

    /// Post-order traversal: children (left to right) before parent.
    pub fn post_order(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(nid) = stack.pop() {
            out.push(nid);
            stack.extend(self.children(nid).iter());
        }
        out.reverse();
        out
    }
}

/// Structural problems found while assembling a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TreeError {
    Empty,
    UnknownNode(NodeId),
    SelfLoop { node: String },
    SharedChild { child: String, first_parent: String, second_parent: String },
    MultipleRoots { roots: Vec<String> },
    Cycle { node: String },
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::Empty => write!(f, "tree has no nodes"),
            TreeError::UnknownNode(nid) => write!(f, "unknown node index {}", nid.0),
            TreeError::SelfLoop { node } => write!(f, "node {} cannot be its own child", node),
            TreeError::SharedChild { child, first_parent, second_parent } => write!(
                f,
                "node {} already has parent {}; cannot also be a child of {}",
                child, first_parent, second_parent
            ),
            TreeError::MultipleRoots { roots } => {
                write!(f, "tree must have exactly one root, found: {}", roots.join(", "))
            }
            TreeError::Cycle { node } => write!(f, "node {} is part of a cycle", node),
        }
    }
}
impl std::error::Error for TreeError {}

struct PendingNode {
    name: String,
    label: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Incrementally assembles a tree, rejecting shared children as they are added
/// and cycles / stray roots when built.
#[derive(Default)]
pub struct TreeBuilder {
    nodes: Vec<PendingNode>,
    by_name: HashMap<String, NodeId>,
}

impl Default for PendingNode {
    fn default() -> Self {
        Self { name: String::new(), label: None, parent: None, children: Vec::new() }
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the node called `name`, creating it if needed.
    pub fn node(&mut self, name: &str) -> NodeId {
        if let Some(&nid) = self.by_name.get(name) {
            return nid;
        }
        let nid = NodeId(self.nodes.len());
        self.nodes.push(PendingNode { name: name.to_string(), ..PendingNode::default() });
        self.by_name.insert(name.to_string(), nid);
        nid
    }

    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    pub fn set_label(&mut self, nid: NodeId, label: Option<String>) -> Result<(), TreeError> {
        self.check(nid)?;
        self.nodes[nid.0].label = label;
        Ok(())
    }

    /// Append `child` as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.check(parent)?;
        self.check(child)?;
        if parent == child {
            return Err(TreeError::SelfLoop { node: self.nodes[child.0].name.clone() });
        }
        if let Some(existing) = self.nodes[child.0].parent {
            return Err(TreeError::SharedChild {
                child: self.nodes[child.0].name.clone(),
                first_parent: self.nodes[existing.0].name.clone(),
                second_parent: self.nodes[parent.0].name.clone(),
            });
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    fn check(&self, nid: NodeId) -> Result<(), TreeError> {
        if nid.0 < self.nodes.len() { Ok(()) } else { Err(TreeError::UnknownNode(nid)) }
    }

    pub fn build(self) -> Result<Tree, TreeError> {
        if self.nodes.is_empty() {
            return Err(TreeError::Empty);
        }

        let roots: Vec<NodeId> = (0..self.nodes.len())
            .map(NodeId)
            .filter(|nid| self.nodes[nid.0].parent.is_none())
            .collect();

        let root = match roots.as_slice() {
            [root] => *root,
            // Every node has a parent, so following parents must loop.
            [] => return Err(TreeError::Cycle { node: self.nodes[0].name.clone() }),
            _ => {
                return Err(TreeError::MultipleRoots {
                    roots: roots.iter().map(|r| self.nodes[r.0].name.clone()).collect(),
                });
            }
        };

        // Breadth-first from the root assigns depths and finds unreachable nodes.
        let mut depth: Vec<Option<usize>> = vec![None; self.nodes.len()];
        depth[root.0] = Some(0);
        let mut queue = VecDeque::from([root]);
        while let Some(nid) = queue.pop_front() {
            let d = depth[nid.0].unwrap_or(0);
            for &child in &self.nodes[nid.0].children {
                depth[child.0] = Some(d + 1);
                queue.push_back(child);
            }
        }

        // With one parent per node and a single root, anything unreachable
        // hangs off a cycle.
        if let Some(stray) = depth.iter().position(Option::is_none) {
            return Err(TreeError::Cycle { node: self.nodes[stray].name.clone() });
        }

        let nodes = self
            .nodes
            .into_iter()
            .zip(depth)
            .enumerate()
            .map(|(i, (p, d))| Node {
                nid: NodeId(i),
                name: p.name,
                label: p.label,
                parent: p.parent,
                children: p.children,
                depth: d.unwrap_or(0),
                position: Coord::ZERO,
            })
            .collect();

        Ok(Tree { root, nodes })
    }
}
