//! Emit source text, either from an AST (preserving comments) or from a
//! built tree (canonical form).
//!
//! Formatting rules:
//! - One statement per line
//! - Children separated by ", "
//! - Comments and blank lines are preserved exactly as-is

use crate::parser::types::*;
use crate::tree::Tree;

/// Emit the entire file AST back to source code
pub fn emit_file(ast: &FileAst) -> String {
    let mut out = String::new();
    let mut header = ast.header;
    for stmt in &ast.items {
        // The header goes after any leading comments.
        if header && !matches!(stmt, Stmt::Comment(_)) {
            out.push_str("tree\n");
            header = false;
        }
        emit_stmt(stmt, &mut out);
    }
    if header {
        out.push_str("tree\n");
    }
    out
}

fn emit_stmt(stmt: &Stmt, out: &mut String) {
    match stmt {
        Stmt::Node(n) => emit_node(&n.id, n.label.as_deref(), out),
        Stmt::Relation(r) => emit_relation(r, out),
        Stmt::Comment(c) => emit_comment(c, out),
    }
}

fn emit_comment(c: &CommentAst, out: &mut String) {
    out.push_str(&c.prefix);
    if let Some(text) = &c.text {
        out.push_str("%%");
        out.push_str(text);
    }
    out.push('\n');
}

fn emit_node(id: &Ident, label: Option<&str>, out: &mut String) {
    out.push_str("node ");
    out.push_str(&id.0);
    if let Some(label) = label {
        out.push_str(&format!(" \"{}\"", label));
    }
    out.push('\n');
}

fn emit_relation(r: &RelationAst, out: &mut String) {
    let children = r.children.iter().map(|c| c.0.as_str()).collect::<Vec<_>>().join(", ");
    if r.separator == BRACKET_SEPARATOR {
        out.push_str(&format!("[{}, {}]\n", r.parent.0, children));
        return;
    }
    let token = token_from_separator(&r.separator).unwrap_or("->");
    if token == ":" {
        out.push_str(&format!("{}: {}\n", r.parent.0, children));
    } else {
        out.push_str(&format!("{} {} {}\n", r.parent.0, token, children));
    }
}

/// Canonical text for a built tree: labels first, then one `parent ->
/// children` line per internal node in pre-order.
pub fn emit_tree(tree: &Tree) -> String {
    let mut out = String::from("tree\n");
    for nid in tree.pre_order() {
        let node = tree.node(nid);
        if let Some(label) = &node.label {
            emit_node(&Ident(node.name.clone()), Some(label.as_str()), &mut out);
        }
    }
    if tree.len() == 1 {
        emit_node(&Ident(tree.node(tree.root).name.clone()), None, &mut out);
    }
    for nid in tree.pre_order() {
        let children = tree.children(nid);
        if children.is_empty() {
            continue;
        }
        let names = children.iter().map(|&c| tree.node(c).name.as_str()).collect::<Vec<_>>();
        out.push_str(&format!("{} -> {}\n", tree.node(nid).name, names.join(", ")));
    }
    out
}
