//
// Compile step: FileAst (surface AST) -> Tree (layout-ready arena)
//
// What this does:
// - Creates nodes in order of first mention (declaration or relation)
// - Attaches children in order of appearance; repeated statements for the
//   same parent append
// - Applies labels from `node` declarations (a later label replaces an
//   earlier one)
// - Reports structural problems against the line that caused them:
//     - shared child / self loop: the relation that adds the edge
//     - multiple roots / cycles: the first statement mentioning the node
//
// The root does not have to be declared first; it is the unique node
// without a parent.

use std::collections::HashMap;

use serde::Serialize;

use crate::parser::{FileAst, Ident, Stmt};
use crate::tree::{NodeId, Tree, TreeBuilder, TreeError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileError {
    pub msg: String,
    pub line: usize, // 1-based line number
    pub col: usize,  // 1-based column (usually 1)
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Compile error at {}:{}: {}", self.line, self.col, self.msg)
    }
}
impl std::error::Error for CompileError {}

pub fn compile(ast: &FileAst) -> Result<Tree, CompileError> {
    let mut ctx = CompileCtx::default();
    for stmt in &ast.items {
        ctx.compile_stmt(stmt)?;
    }
    ctx.finish()
}

#[derive(Default)]
struct CompileCtx {
    builder: TreeBuilder,
    /// Line of the first statement mentioning each node.
    first_seen: HashMap<String, usize>,
    last_line: usize,
}

impl CompileCtx {
    fn compile_stmt(&mut self, stmt: &Stmt) -> Result<(), CompileError> {
        match stmt {
            Stmt::Comment(_) => Ok(()),
            Stmt::Node(n) => {
                let line = n.span.map_or(0, |s| s.start_line);
                let nid = self.node(&n.id, line);
                if n.label.is_some() {
                    self.builder.set_label(nid, n.label.clone()).map_err(|e| err_at(line, &e))?;
                }
                Ok(())
            }
            Stmt::Relation(r) => {
                let line = r.span.map_or(0, |s| s.start_line);
                let parent = self.node(&r.parent, line);
                for child in &r.children {
                    let child = self.node(child, line);
                    self.builder.add_child(parent, child).map_err(|e| err_at(line, &e))?;
                }
                Ok(())
            }
        }
    }

    fn node(&mut self, id: &Ident, line: usize) -> NodeId {
        self.last_line = self.last_line.max(line);
        self.first_seen.entry(id.0.clone()).or_insert(line);
        self.builder.node(&id.0)
    }

    fn finish(self) -> Result<Tree, CompileError> {
        let Self { builder, first_seen, last_line } = self;
        builder.build().map_err(|e| {
            let line = match &e {
                TreeError::Cycle { node } => first_seen.get(node).copied(),
                // The second root is the one that looks out of place.
                TreeError::MultipleRoots { roots } => {
                    roots.get(1).and_then(|r| first_seen.get(r).copied())
                }
                _ => None,
            };
            err_at(line.unwrap_or(last_line.max(1)), &e)
        })
    }
}

fn err_at(line: usize, e: &TreeError) -> CompileError {
    CompileError { msg: e.to_string(), line: line.max(1), col: 1 }
}
