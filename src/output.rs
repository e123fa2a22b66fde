//! Output types for frontend and CLI consumption.
//!
//! These structs are serialized to JSON; a frontend maps `depth` to y and
//! `position` to x.

use serde::Serialize;

use crate::layout::{Coord, LayoutSummary};
use crate::parser::SourceError;
use crate::tree::Tree;

/// A laid-out node
#[derive(Debug, Clone, Serialize)]
pub struct NodeOutput {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub depth: usize,
    pub position: Coord,
    /// Position rounded to the nearest grid column
    pub column: i64,
}

/// A parent-child edge
#[derive(Debug, Clone, Serialize)]
pub struct EdgeOutput {
    pub parent: String,
    pub child: String,
}

/// Error information for editor markers
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub message: String,
    pub line: usize,       // 1-based line number
    pub column: usize,     // 1-based column number
    pub end_line: usize,   // 1-based end line (same as line for single-line errors)
    pub end_column: usize, // 1-based end column
}

impl From<&SourceError> for ErrorInfo {
    fn from(e: &SourceError) -> Self {
        let (line, column) = e.location();
        let end_column = match e {
            // Highlight at least one character
            SourceError::Parse(_) => column + 1,
            // Highlight the whole line
            SourceError::Compile(_) | SourceError::Config(_) => 1000,
        };
        ErrorInfo {
            message: e.message().to_string(),
            line,
            column,
            end_line: line,
            end_column,
        }
    }
}

/// The combined output
#[derive(Debug, Clone, Serialize)]
pub struct TreeOutput {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<NodeOutput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<EdgeOutput>,
    pub width: Coord,
    pub depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl TreeOutput {
    /// Nodes in pre-order, edges in pre-order of their parent.
    pub fn from_tree(tree: &Tree, summary: &LayoutSummary) -> Self {
        let order = tree.pre_order();
        let nodes = order
            .iter()
            .map(|&nid| {
                let n = tree.node(nid);
                NodeOutput {
                    id: n.name.clone(),
                    label: n.label.clone(),
                    depth: n.depth,
                    position: n.position,
                    column: n.position.round(),
                }
            })
            .collect();
        let edges = order
            .iter()
            .flat_map(|&nid| {
                tree.children(nid).iter().map(move |&c| EdgeOutput {
                    parent: tree.node(nid).name.clone(),
                    child: tree.node(c).name.clone(),
                })
            })
            .collect();
        TreeOutput { nodes, edges, width: summary.width, depth: summary.depth, error: None }
    }

    pub fn from_error(e: &SourceError) -> Self {
        TreeOutput {
            nodes: vec![],
            edges: vec![],
            width: Coord::ZERO,
            depth: 0,
            error: Some(ErrorInfo::from(e)),
        }
    }
}
