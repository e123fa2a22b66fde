//! JSON relationship input.
//!
//! An array whose items are either `[parent, child, ...]` integer rows or
//! strings. Strings are comments and ignored. Child `0` marks an empty slot
//! (binary-tree test cases) and is skipped.

use serde::Deserialize;

use crate::parser::{CompileError, ParseError, SourceError};
use crate::tree::Tree;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonItem {
    Relation(Vec<u32>),
    Comment(#[allow(dead_code)] String),
}

/// Parse the rows only, dropping comments.
pub fn parse_json_relations(input: &str) -> Result<Vec<Vec<u32>>, ParseError> {
    let items: Vec<JsonItem> = serde_json::from_str(input).map_err(|e| ParseError {
        line: e.line().max(1),
        col: e.column().max(1),
        msg: format!("invalid relationship JSON: {e}"),
    })?;
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            JsonItem::Relation(row) => Some(row),
            JsonItem::Comment(_) => None,
        })
        .collect())
}

pub fn parse_json(input: &str) -> Result<Tree, SourceError> {
    let rows = parse_json_relations(input)?;
    let tree = Tree::from_relations(&rows).map_err(|e| CompileError {
        msg: e.to_string(),
        line: 1,
        col: 1,
    })?;
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_and_comments() {
        let src = r#"[
            "root with three children",
            [1, 2, 3, 4],
            [3, 6, 7],
            [2, 0, 5]
        ]"#;
        let tree = parse_json(src).unwrap();
        assert_eq!(tree.len(), 7);
        let two = tree.find("2").unwrap();
        assert_eq!(tree.children(two).len(), 1);
    }

    #[test]
    fn test_syntax_error_position() {
        let err = parse_json("[\n  [1, 2],\n  [3, x]\n]").unwrap_err();
        match err {
            SourceError::Parse(e) => assert_eq!(e.line, 3),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_item_type() {
        assert!(matches!(parse_json("[[1, 2], {\"a\": 1}]"), Err(SourceError::Parse(_))));
        assert!(matches!(parse_json("[[1, -2]]"), Err(SourceError::Parse(_))));
    }

    #[test]
    fn test_structural_error() {
        let err = parse_json("[[1, 2], [3, 2]]").unwrap_err();
        assert!(matches!(err, SourceError::Compile(_)));
    }
}
