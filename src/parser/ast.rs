// Edge-list parser.
//
// - Comments: %% ... (line comments, also trailing)
// - tree                        (optional header, first statement only)
// - node IDENT ["Label"]        (declaration with optional display label)
// - IDENT -> IDENT, IDENT, ...  (parent followed by ordered children)
// - IDENT --> IDENT ...         (same)
// - IDENT: IDENT IDENT ...      (same; commas optional after ':')
// - [IDENT, IDENT, ...]         (parent first, then children)
//
// Notes / limitations:
// - IDENT: [A-Za-z0-9_]+  (numeric names are allowed)
// - STRING: "..." (no escapes)
// - A relation must name at least one child

use std::fmt;

use serde::Serialize;

use crate::parser::types::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseError {
    pub line: usize, // 1-based
    pub col: usize,  // 1-based best-effort
    pub msg: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parse error at {}:{}: {}", self.line, self.col, self.msg)
    }
}
impl std::error::Error for ParseError {}

pub fn parse_file(input: &str) -> Result<FileAst, ParseError> {
    let mut p = Parser::new(input);
    let mut header = false;
    let mut items = Vec::new();
    while !p.eof() {
        if !header && items.iter().all(|s| matches!(s, Stmt::Comment(_))) && p.is_header() {
            header = true;
            p.advance();
            continue;
        }
        if let Some(stmt) = p.parse_stmt_or_none()? {
            items.push(stmt);
        }
    }
    Ok(FileAst { header, items })
}

struct Parser<'a> {
    lines: Vec<&'a str>,
    i: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        let lines = input
            .lines()
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .collect::<Vec<_>>();
        Self { lines, i: 0 }
    }

    fn eof(&self) -> bool {
        self.i >= self.lines.len()
    }

    fn line_no(&self) -> usize {
        self.i + 1
    }

    fn advance(&mut self) {
        self.i += 1;
    }

    fn err<T>(&self, col: usize, msg: impl Into<String>) -> Result<T, ParseError> {
        Err(ParseError {
            line: self.line_no(),
            col: col.max(1),
            msg: msg.into(),
        })
    }

    /// 1-based column of `part` inside the current raw line.
    fn col_of(&self, part: &str) -> usize {
        let raw = self.lines[self.i];
        let base = raw.as_ptr() as usize;
        let at = part.as_ptr() as usize;
        if at >= base && at <= base + raw.len() { at - base + 1 } else { 1 }
    }

    fn current_line_wo_comment(&self) -> &'a str {
        let raw = self.lines[self.i];
        match raw.find("%%") {
            Some(idx) => &raw[..idx],
            None => raw,
        }
    }

    fn is_header(&self) -> bool {
        self.current_line_wo_comment().trim() == "tree"
    }

    /// Comment-only lines become statements so the file can be emitted again;
    /// blank lines are kept the same way.
    fn parse_comment_line(&self) -> CommentAst {
        let raw = self.lines[self.i];
        match raw.find("%%") {
            Some(idx) => CommentAst {
                prefix: raw[..idx].to_string(),
                text: Some(raw[idx + 2..].to_string()),
            },
            None => CommentAst { prefix: raw.to_string(), text: None },
        }
    }

    fn parse_stmt_or_none(&mut self) -> Result<Option<Stmt>, ParseError> {
        if self.eof() {
            return Ok(None);
        }

        let t = self.current_line_wo_comment().trim();

        if t.is_empty() {
            let comment = self.parse_comment_line();
            self.advance();
            return Ok(Some(Stmt::Comment(comment)));
        }

        let line = self.line_no();
        let span = Some(Span { start_line: line, end_line: line });

        let stmt = if starts_with_kw(t, "node") {
            Stmt::Node(NodeAst { span, ..self.parse_node(t)? })
        } else if t.starts_with('[') {
            Stmt::Relation(RelationAst { span, ..self.parse_bracket(t)? })
        } else {
            Stmt::Relation(RelationAst { span, ..self.parse_relation_line(t)? })
        };
        self.advance();
        Ok(Some(stmt))
    }

    // node IDENT ["Label"]
    fn parse_node(&self, t: &str) -> Result<NodeAst, ParseError> {
        let rest = t["node".len()..].trim();
        let (ident, after) = take_ident_prefix(rest);
        let Some(ident) = ident else {
            return self.err(self.col_of(rest), "expected node identifier after 'node'");
        };

        let after = after.trim();
        let mut label = None;
        if after.starts_with('"') {
            let (s, tail) = parse_string_prefix(after).map_err(|msg| ParseError {
                line: self.line_no(),
                col: self.col_of(after),
                msg,
            })?;
            if !tail.trim().is_empty() {
                return self.err(self.col_of(tail.trim()), "unexpected tokens after node label");
            }
            label = Some(s);
        } else if !after.is_empty() {
            return self.err(self.col_of(after), "unexpected tokens in node declaration");
        }

        Ok(NodeAst { id: Ident(ident.to_string()), label, span: None })
    }

    // [IDENT, IDENT, ...]
    fn parse_bracket(&self, t: &str) -> Result<RelationAst, ParseError> {
        let Some(inner) = t.strip_prefix('[').and_then(|s| s.strip_suffix(']')) else {
            return self.err(self.col_of(t), "expected ']' at end of list");
        };
        let idents = self.parse_ident_list(inner)?;
        let Some((parent, children)) = idents.split_first() else {
            return self.err(self.col_of(t), "empty list; expected [parent, child, ...]");
        };
        if children.is_empty() {
            return self.err(self.col_of(t), "list needs a parent and at least one child");
        }
        Ok(RelationAst {
            parent: parent.clone(),
            children: children.to_vec(),
            separator: BRACKET_SEPARATOR.to_string(),
            span: None,
        })
    }

    fn parse_relation_line(&self, line: &str) -> Result<RelationAst, ParseError> {
        let Some((head, token, tail)) = split_separator(line) else {
            return self.err(
                self.col_of(line),
                "invalid statement; expected like 1 -> 2, 3 or [1, 2, 3]",
            );
        };
        if !is_ident(head) {
            return self.err(self.col_of(head), format!("invalid parent identifier '{head}'"));
        }
        let children = self.parse_ident_list(tail)?;
        if children.is_empty() {
            return self.err(self.col_of(line) + line.len(), "expected at least one child");
        }
        Ok(RelationAst {
            parent: Ident(head.to_string()),
            children,
            separator: separator_from_token(token).unwrap_or("arrow").to_string(),
            span: None,
        })
    }

    /// Identifiers separated by commas and/or whitespace.
    fn parse_ident_list(&self, s: &str) -> Result<Vec<Ident>, ParseError> {
        let mut out = Vec::new();
        for part in s.split(|c: char| c == ',' || c.is_whitespace()) {
            if part.is_empty() {
                continue;
            }
            if !is_ident(part) {
                return self.err(self.col_of(part), format!("invalid identifier '{part}'"));
            }
            out.push(Ident(part.to_string()));
        }
        Ok(out)
    }
}

// ---------- helpers ----------

fn starts_with_kw(line: &str, kw: &str) -> bool {
    line == kw || line.starts_with(&(kw.to_string() + " "))
}

fn take_ident_prefix(s: &str) -> (Option<&str>, &str) {
    let s = s.trim_start();
    let end = s
        .char_indices()
        .find(|&(_, c)| !(c.is_ascii_alphanumeric() || c == '_'))
        .map_or(s.len(), |(i, _)| i);
    if end == 0 { (None, s) } else { (Some(&s[..end]), &s[end..]) }
}

fn parse_string_prefix(s: &str) -> Result<(String, &str), String> {
    let s = s.trim_start();
    let Some(body) = s.strip_prefix('"') else {
        return Err("expected string".into());
    };
    let close = body.find('"').ok_or_else(|| "unterminated string literal".to_string())?;
    Ok((body[..close].to_string(), &body[close + 1..]))
}

/// Split `PARENT <sep> CHILDREN` on the first separator, trying longer
/// tokens first. Works with or without surrounding spaces.
fn split_separator(s: &str) -> Option<(&str, &'static str, &str)> {
    let s = s.trim();
    SEPARATOR_REGISTRY
        .iter()
        .filter_map(|(tok, _)| s.find(tok).map(|pos| (pos, *tok)))
        // Earliest match wins; on a tie the longer token does.
        .min_by_key(|&(pos, tok)| (pos, std::cmp::Reverse(tok.len())))
        .map(|(pos, tok)| (s[..pos].trim(), tok, &s[pos + tok.len()..]))
}
