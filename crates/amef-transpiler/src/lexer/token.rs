//! Token definitions and the flat token arena.

use serde::Serialize;
use std::fmt;

/// A span in the source code, representing a range of bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length of this span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if this span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Index of a token inside its [`TokenStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TokenId(pub usize);

/// Numeric literal subforms, most specific first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NumberKind {
    /// `0xFF`, `0xFFn`
    Hex,
    /// `0o17`, legacy `017`
    Octal,
    /// `0b101`
    Binary,
    /// Digits with an exponent and no fraction: `1e10`
    Exponent,
    /// Digits with a fraction and optional exponent: `1_000.5e-3`
    Float,
    /// Plain digit sequence: `42`, `1_000`
    Integer,
    /// Decimal digits with the big-integer marker: `10n`
    BigInt,
}

/// The kind tag of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    /// Identifier (possibly reclassified later)
    Identifier,
    /// Reserved word in keyword position, or `=>`
    Keyword,
    /// Single- or double-quoted string literal
    String,
    /// A text segment of a template literal
    Template,
    /// Regular expression literal
    RegExp,
    /// Numeric literal
    Number(NumberKind),
    /// `(`, `)`, `[`, `]`, `{`, `}` and the `${` interpolation opener
    Bracket,
    /// `;`, `,`, `.` and any character the scanner does not otherwise know
    Delimiter,
    /// Operator from the fixed operator table
    Operator,
    /// Line or block comment
    Comment,
    /// `/** ... */` documentation comment
    DocComment,
    /// Run of blanks and line breaks
    Whitespace,
}

impl TokenKind {
    /// Whitespace and comments are skipped when linking neighbours.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::Comment | TokenKind::DocComment
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Keyword => "keyword",
            TokenKind::String => "string",
            TokenKind::Template => "string.template",
            TokenKind::RegExp => "regexp",
            TokenKind::Number(NumberKind::Hex) => "number.hex",
            TokenKind::Number(NumberKind::Octal) => "number.octal",
            TokenKind::Number(NumberKind::Binary) => "number.binary",
            TokenKind::Number(NumberKind::Exponent) => "number.exponent",
            TokenKind::Number(NumberKind::Float) => "number.float",
            TokenKind::Number(NumberKind::Integer) => "number",
            TokenKind::Number(NumberKind::BigInt) => "number.bigint",
            TokenKind::Bracket => "bracket",
            TokenKind::Delimiter => "delimiter",
            TokenKind::Operator => "operator",
            TokenKind::Comment => "comment",
            TokenKind::DocComment => "comment.doc",
            TokenKind::Whitespace => "whitespace",
        };
        f.write_str(name)
    }
}

/// A token produced by the scanner.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The span in the source code
    pub span: Span,
    /// Nearest meaningful token before this one
    pub prev: Option<TokenId>,
    /// Nearest meaningful token after this one
    pub next: Option<TokenId>,
    /// Override lexeme written by the transform pass
    pub rewrite: Option<String>,
}

impl Token {
    /// Creates a new unlinked token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self {
            kind,
            span,
            prev: None,
            next: None,
            rewrite: None,
        }
    }
}

/// Tokens of one source text, stored in order and linked by index.
#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    source: &'a str,
    tokens: Vec<Token>,
}

impl<'a> TokenStream<'a> {
    /// Builds a stream and fills in the meaningful-neighbour links.
    pub fn new(source: &'a str, mut tokens: Vec<Token>) -> Self {
        let mut last = None;
        for (index, token) in tokens.iter_mut().enumerate() {
            token.prev = last;
            if !token.kind.is_trivia() {
                last = Some(TokenId(index));
            }
        }

        let mut last = None;
        for (index, token) in tokens.iter_mut().enumerate().rev() {
            token.next = last;
            if !token.kind.is_trivia() {
                last = Some(TokenId(index));
            }
        }

        Self { source, tokens }
    }

    /// Number of tokens, trivia included.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if the source produced no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Looks up a token.
    pub fn get(&self, id: TokenId) -> Option<&Token> {
        self.tokens.get(id.0)
    }

    /// Iterates over every token with its index.
    pub fn iter(&self) -> impl Iterator<Item = (TokenId, &Token)> {
        self.tokens
            .iter()
            .enumerate()
            .map(|(index, token)| (TokenId(index), token))
    }

    /// Kind of a token, if it exists.
    pub fn kind(&self, id: TokenId) -> Option<TokenKind> {
        self.get(id).map(|token| token.kind)
    }

    /// Original lexeme of a token; empty for an unknown id.
    pub fn lexeme(&self, id: TokenId) -> &'a str {
        let source = self.source;
        self.get(id)
            .and_then(|token| source.get(token.span.start..token.span.end))
            .unwrap_or("")
    }

    /// Nearest meaningful token before `id`.
    pub fn prev(&self, id: TokenId) -> Option<TokenId> {
        self.get(id).and_then(|token| token.prev)
    }

    /// Nearest meaningful token after `id`.
    pub fn next(&self, id: TokenId) -> Option<TokenId> {
        self.get(id).and_then(|token| token.next)
    }

    /// Returns true if the token exists and its lexeme equals `text`.
    pub fn is(&self, id: Option<TokenId>, text: &str) -> bool {
        id.is_some_and(|id| self.lexeme(id) == text)
    }

    /// Changes the kind tag of a token.
    pub fn set_kind(&mut self, id: TokenId, kind: TokenKind) {
        if let Some(token) = self.tokens.get_mut(id.0) {
            token.kind = kind;
        }
    }

    /// Writes the override lexeme of a token.
    pub fn rewrite(&mut self, id: TokenId, text: impl Into<String>) {
        if let Some(token) = self.tokens.get_mut(id.0) {
            token.rewrite = Some(text.into());
        }
    }

    /// Concatenation of the original lexemes.
    pub fn source_text(&self) -> String {
        self.tokens
            .iter()
            .filter_map(|token| self.source.get(token.span.start..token.span.end))
            .collect()
    }

    /// Concatenation of override-or-original lexemes.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.source.len());
        for token in &self.tokens {
            match &token.rewrite {
                Some(text) => out.push_str(text),
                None => out.push_str(
                    self.source
                        .get(token.span.start..token.span.end)
                        .unwrap_or(""),
                ),
            }
        }
        out
    }
}
