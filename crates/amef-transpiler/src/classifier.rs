//! Reserved-word classification.
//!
//! The scanner only knows identifiers. This pass promotes reserved words to
//! keywords unless their neighbours show they are used as a property name:
//! `obj.if` (member access) and `{ if: 1 }` (object-literal key) stay
//! identifiers. `=>` always becomes a keyword.

use crate::lexer::{TokenId, TokenKind, TokenStream};
use rustc_hash::FxHashSet;
use std::sync::LazyLock;

/// Words that are promoted to keywords outside property position.
pub const RESERVED_WORDS: &[&str] = &[
    "as", "async", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "export", "extends", "false", "finally", "for", "from",
    "function", "if", "import", "in", "instanceof", "interface", "let", "new", "null", "of",
    "return", "super", "switch", "this", "throw", "true", "try", "typeof", "var", "void",
    "while", "with", "yield",
];

static RESERVED: LazyLock<FxHashSet<&'static str>> =
    LazyLock::new(|| RESERVED_WORDS.iter().copied().collect());

/// Returns true if `word` is in the reserved set.
pub fn is_reserved(word: &str) -> bool {
    RESERVED.contains(word)
}

/// Reclassifies identifier tokens in place. Single forward pass.
pub fn classify(stream: &mut TokenStream<'_>) {
    for index in 0..stream.len() {
        let id = TokenId(index);
        let promote = match stream.kind(id) {
            Some(TokenKind::Operator) => stream.lexeme(id) == "=>",
            Some(TokenKind::Identifier) => {
                is_reserved(stream.lexeme(id))
                    && !is_member_access(stream, id)
                    && !is_object_key(stream, id)
            }
            _ => false,
        };
        if promote {
            stream.set_kind(id, TokenKind::Keyword);
        }
    }
}

fn is_member_access(stream: &TokenStream<'_>, id: TokenId) -> bool {
    let prev = stream.prev(id);
    stream.is(prev, ".") || stream.is(prev, "?.")
}

fn is_object_key(stream: &TokenStream<'_>, id: TokenId) -> bool {
    let prev = stream.prev(id);
    stream.is(stream.next(id), ":") && (stream.is(prev, "{") || stream.is(prev, ","))
}
