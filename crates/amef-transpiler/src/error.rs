//! Error types for the transpiler.

use std::fmt;
use thiserror::Error;

/// Result type for transpiler operations
pub type Result<T> = std::result::Result<T, TranspileError>;

/// Literal forms that can run off the end of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    /// `` `...` ``
    Template,
    /// `/** ... */`
    DocComment,
    /// `/* ... */`
    Comment,
    /// `'...'` or `"..."`
    String,
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LiteralKind::Template => "template literal",
            LiteralKind::DocComment => "doc comment",
            LiteralKind::Comment => "block comment",
            LiteralKind::String => "string literal",
        })
    }
}

/// Errors that can occur while tokenizing or rewriting one module
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranspileError {
    /// A literal or comment is still open at the end of input
    #[error("unterminated {kind} starting at offset {offset}")]
    UnterminatedLiteral {
        /// What was left open
        kind: LiteralKind,
        /// Byte offset where it started
        offset: usize,
    },

    /// An import or export statement the rewrite pass cannot follow
    #[error("malformed {statement} statement at offset {offset}: {reason}")]
    MalformedStatement {
        /// `import` or `export`
        statement: &'static str,
        /// Byte offset of the statement keyword
        offset: usize,
        /// What was expected
        reason: &'static str,
    },
}
