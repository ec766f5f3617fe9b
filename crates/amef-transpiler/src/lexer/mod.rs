//! Lexical analysis (tokenization) for module scripts.
//!
//! The scanner turns raw script text into an ordered, lossless token
//! stream. Whitespace and comments are kept as tokens but skipped when
//! linking each token to its meaningful neighbours.
//!
//! ## Structure
//!
//! - `scanner.rs` - `Scanner` state machine (code / template text)
//! - `token.rs` - `Token`, `TokenKind` and the `TokenStream` arena
//! - `literals` - numeric, string and regex boundary matching
//! - `operators` - the fixed operator table
//!
//! ## Usage
//!
//! ```rust
//! use amef_transpiler::lexer::{tokenize, TokenKind};
//!
//! let stream = tokenize("let x = 42;").unwrap();
//! let words: Vec<&str> = stream
//!     .iter()
//!     .filter(|(_, t)| t.kind == TokenKind::Identifier)
//!     .map(|(id, _)| stream.lexeme(id))
//!     .collect();
//! assert_eq!(words, ["let", "x"]);
//! ```

mod scanner;
mod token;

pub mod literals;
pub mod operators;

pub use scanner::{tokenize, Scanner};
pub use token::{NumberKind, Span, Token, TokenId, TokenKind, TokenStream};
