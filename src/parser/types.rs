use serde::Serialize;

/// Source location span for error reporting and round-tripping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start_line: usize,
    pub end_line: usize,
}

/// A comment line, preserving exact whitespace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentAst {
    /// The prefix before %% (whitespace preserved)
    pub prefix: String,
    /// The text after %% (including any leading space); None for a blank line
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileAst {
    /// Whether the optional `tree` header line was present
    pub header: bool,
    pub items: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt {
    Node(NodeAst),
    Relation(RelationAst),
    Comment(CommentAst),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Ident(pub String);

/// `node ID ["Label"]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeAst {
    pub id: Ident,
    /// Display label (optional)
    pub label: Option<String>,
    pub span: Option<Span>,
}

/// `PARENT -> CHILD, CHILD, ...` or `[PARENT, CHILD, ...]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationAst {
    pub parent: Ident,
    /// Children in the order they are attached
    pub children: Vec<Ident>,
    /// Separator as canonical name, "bracket" for the list form
    pub separator: String,
    pub span: Option<Span>,
}

// ============================================================================
// Separator registry
// ============================================================================

/// Separator token registry: (token_str, canonical_name)
/// Longer tokens must come first to avoid partial matches
pub const SEPARATOR_REGISTRY: &[(&str, &str)] = &[
    ("-->", "long_arrow"),
    ("->", "arrow"),
    (":", "colon"),
];

pub const BRACKET_SEPARATOR: &str = "bracket";

/// Look up canonical name from token string
pub fn separator_from_token(token: &str) -> Option<&'static str> {
    SEPARATOR_REGISTRY
        .iter()
        .find(|(tok, _)| *tok == token)
        .map(|(_, name)| *name)
}

/// Look up token string from canonical name
pub fn token_from_separator(separator: &str) -> Option<&'static str> {
    SEPARATOR_REGISTRY
        .iter()
        .find(|(_, name)| *name == separator)
        .map(|(tok, _)| *tok)
}

pub fn is_ident(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
