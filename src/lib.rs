//! Tidy drawing of ordered rooted trees.
//!
//! Every node gets a depth (its rail) and a horizontal position such that
//! neighbors on a rail keep a minimum distance, parents are centered over
//! their leftmost and rightmost descendants, and identical subtrees are
//! drawn identically wherever they appear.
//!
//! ```text
//! tree
//! 1 -> 2, 3, 4
//! 2 -> 5
//! 3 -> 6, 7
//! ```

pub mod generate;
pub mod layout;
pub mod output;
pub mod parser;
pub mod render;
pub mod tree;
mod wasm;

pub use layout::{ConfigError, Coord, LayoutConfig, LayoutSummary, layout_tree};
pub use parser::SourceError;
pub use tree::{Node, NodeId, Tree, TreeBuilder, TreeError};

/// Parse and compile edge-list source text.
pub fn parse_source(input: &str) -> Result<Tree, SourceError> {
    let ast = parser::parse_file(input)?;
    Ok(parser::compile(&ast)?)
}

/// Parse, compile and lay out edge-list source text in one call.
pub fn layout_text(input: &str, cfg: &LayoutConfig) -> Result<(Tree, LayoutSummary), SourceError> {
    cfg.validate()?;
    let mut tree = parse_source(input)?;
    let summary = layout_tree(&mut tree, cfg);
    Ok((tree, summary))
}
