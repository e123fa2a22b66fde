mod ast;
pub mod compile;
mod codegen;
mod json;
mod types;

use std::fmt;

use serde::Serialize;

use crate::layout::ConfigError;

pub use ast::{ParseError, parse_file};
pub use compile::{CompileError, compile};
pub use codegen::{emit_file, emit_tree};
pub use json::{parse_json, parse_json_relations};
pub use types::*;

/// Anything that can go wrong between input text and a laid-out tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SourceError {
    Parse(ParseError),
    Compile(CompileError),
    /// Layout or generator settings; reported at the start of the input.
    Config(ConfigError),
}

impl SourceError {
    /// 1-based `(line, column)` of the problem.
    pub fn location(&self) -> (usize, usize) {
        match self {
            SourceError::Parse(e) => (e.line, e.col),
            SourceError::Compile(e) => (e.line, e.col),
            SourceError::Config(_) => (1, 1),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            SourceError::Parse(e) => &e.msg,
            SourceError::Compile(e) => &e.msg,
            SourceError::Config(e) => &e.msg,
        }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Parse(e) => e.fmt(f),
            SourceError::Compile(e) => e.fmt(f),
            SourceError::Config(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SourceError::Parse(e) => Some(e),
            SourceError::Compile(e) => Some(e),
            SourceError::Config(e) => Some(e),
        }
    }
}

impl From<ParseError> for SourceError {
    fn from(e: ParseError) -> Self {
        SourceError::Parse(e)
    }
}

impl From<CompileError> for SourceError {
    fn from(e: CompileError) -> Self {
        SourceError::Compile(e)
    }
}

impl From<ConfigError> for SourceError {
    fn from(e: ConfigError) -> Self {
        SourceError::Config(e)
    }
}
