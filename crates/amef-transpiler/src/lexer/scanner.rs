//! The scanner that produces tokens from source text.

use super::literals::{match_number, match_regexp, match_string};
use super::operators::{match_operator, DELIMITERS};
use super::{Span, Token, TokenKind, TokenStream};
use crate::error::{LiteralKind, Result, TranspileError};

/// What the scanner is currently reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Ordinary code, including the inside of `${ ... }`
    Code,
    /// Template text; `start` is where the pending segment began and
    /// `opened` is the back-tick that opened the literal
    Template { start: usize, opened: usize },
}

/// An open `${ ... }` inside a template literal.
#[derive(Debug, Clone, Copy)]
struct Interpolation {
    /// Unclosed `{` count, the `${` itself included
    depth: u32,
    /// Back-tick of the enclosing template literal
    opened: usize,
}

/// A scanner that tokenizes script source code.
///
/// Unlike a parser-driven lexer this one runs to completion up front and
/// keeps every character, whitespace and comments included, so the
/// original text can be rebuilt from the tokens.
pub struct Scanner<'a> {
    source: &'a str,
    pos: usize,
    mode: Mode,
    /// One entry per active `${` interpolation, innermost last
    interpolations: Vec<Interpolation>,
    tokens: Vec<Token>,
}

impl<'a> Scanner<'a> {
    /// Creates a new scanner for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            mode: Mode::Code,
            interpolations: Vec::new(),
            tokens: Vec::new(),
        }
    }

    /// Scans the whole source into a linked token stream.
    pub fn scan(mut self) -> Result<TokenStream<'a>> {
        while self.pos < self.source.len() {
            match self.mode {
                Mode::Code => self.scan_code()?,
                Mode::Template { start, opened } => self.scan_template(start, opened)?,
            }
        }

        match self.mode {
            Mode::Template { opened, .. } => Err(TranspileError::UnterminatedLiteral {
                kind: LiteralKind::Template,
                offset: opened,
            }),
            Mode::Code => match self.interpolations.last() {
                Some(open) => Err(TranspileError::UnterminatedLiteral {
                    kind: LiteralKind::Template,
                    offset: open.opened,
                }),
                None => Ok(TokenStream::new(self.source, self.tokens)),
            },
        }
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn push(&mut self, kind: TokenKind, len: usize) {
        let end = self.pos + len;
        self.tokens.push(Token::new(kind, Span::new(self.pos, end)));
        self.pos = end;
    }

    fn scan_code(&mut self) -> Result<()> {
        let rest = self.rest();
        let Some(ch) = rest.chars().next() else {
            return Ok(());
        };

        match ch {
            '{' => {
                if let Some(open) = self.interpolations.last_mut() {
                    open.depth += 1;
                }
                self.push(TokenKind::Bracket, 1);
            }
            '}' => self.scan_close_brace(),
            '(' | ')' | '[' | ']' => self.push(TokenKind::Bracket, 1),
            '`' => {
                self.mode = Mode::Template {
                    start: self.pos,
                    opened: self.pos,
                };
                self.pos += 1;
            }
            '"' | '\'' => {
                let len = match_string(rest).ok_or(TranspileError::UnterminatedLiteral {
                    kind: LiteralKind::String,
                    offset: self.pos,
                })?;
                self.push(TokenKind::String, len);
            }
            '/' if rest.starts_with("//") => {
                let len = rest.find(['\n', '\r']).unwrap_or(rest.len());
                self.push(TokenKind::Comment, len);
            }
            '/' if rest.starts_with("/*") => self.scan_block_comment()?,
            '/' => match match_regexp(rest) {
                Some(len) => self.push(TokenKind::RegExp, len),
                None => self.scan_operator(rest, ch),
            },
            '0'..='9' => {
                let (kind, len) = match_number(rest).unwrap_or((super::NumberKind::Integer, 1));
                self.push(TokenKind::Number(kind), len);
            }
            _ if is_id_start(ch) => {
                let len = rest
                    .char_indices()
                    .find(|(_, c)| !is_id_continue(*c))
                    .map_or(rest.len(), |(i, _)| i);
                self.push(TokenKind::Identifier, len);
            }
            _ if ch.is_whitespace() => {
                let len = rest
                    .char_indices()
                    .find(|(_, c)| !c.is_whitespace())
                    .map_or(rest.len(), |(i, _)| i);
                self.push(TokenKind::Whitespace, len);
            }
            _ if DELIMITERS.contains(&ch) && !rest.starts_with("...") => {
                self.push(TokenKind::Delimiter, 1);
            }
            _ => self.scan_operator(rest, ch),
        }
        Ok(())
    }

    fn scan_operator(&mut self, rest: &str, ch: char) {
        match match_operator(rest) {
            Some(op) => self.push(TokenKind::Operator, op.len()),
            None => self.push(TokenKind::Delimiter, ch.len_utf8()),
        }
    }

    fn scan_close_brace(&mut self) {
        let closed = match self.interpolations.last_mut() {
            Some(open) => {
                open.depth -= 1;
                (open.depth == 0).then_some(open.opened)
            }
            None => None,
        };
        self.push(TokenKind::Bracket, 1);
        if let Some(opened) = closed {
            self.interpolations.pop();
            self.mode = Mode::Template {
                start: self.pos,
                opened,
            };
        }
    }

    fn scan_block_comment(&mut self) -> Result<()> {
        let rest = self.rest();
        let is_doc = rest.starts_with("/**") && !rest.starts_with("/**/");
        let (kind, literal, body) = if is_doc {
            (TokenKind::DocComment, LiteralKind::DocComment, 3)
        } else {
            (TokenKind::Comment, LiteralKind::Comment, 2)
        };
        let close = rest[body..]
            .find("*/")
            .ok_or(TranspileError::UnterminatedLiteral {
                kind: literal,
                offset: self.pos,
            })?;
        self.push(kind, body + close + 2);
        Ok(())
    }

    fn scan_template(&mut self, start: usize, opened: usize) -> Result<()> {
        let source = self.source;
        let mut chars = source[self.pos..].char_indices().peekable();
        while let Some((offset, ch)) = chars.next() {
            let at = self.pos + offset;
            match ch {
                '\\' => {
                    chars.next();
                }
                '`' => {
                    self.pos = start;
                    self.push(TokenKind::Template, at + 1 - start);
                    self.mode = Mode::Code;
                    return Ok(());
                }
                '$' if chars.peek().is_some_and(|(_, c)| *c == '{') => {
                    self.pos = start;
                    if at > start {
                        self.push(TokenKind::Template, at - start);
                    }
                    self.push(TokenKind::Bracket, 2);
                    self.interpolations.push(Interpolation { depth: 1, opened });
                    self.mode = Mode::Code;
                    return Ok(());
                }
                _ => {}
            }
        }
        Err(TranspileError::UnterminatedLiteral {
            kind: LiteralKind::Template,
            offset: opened,
        })
    }
}

/// Checks if a character can start an identifier.
fn is_id_start(ch: char) -> bool {
    ch == '_' || ch == '$' || unicode_xid::UnicodeXID::is_xid_start(ch)
}

/// Checks if a character can continue an identifier.
fn is_id_continue(ch: char) -> bool {
    ch == '_' || ch == '$' || unicode_xid::UnicodeXID::is_xid_continue(ch)
}

/// Tokenizes `source` into a linked stream.
pub fn tokenize(source: &str) -> Result<TokenStream<'_>> {
    Scanner::new(source).scan()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::NumberKind;

    fn kinds(source: &str) -> Vec<(TokenKind, &str)> {
        let stream = tokenize(source).unwrap();
        stream
            .iter()
            .filter(|(_, t)| t.kind != TokenKind::Whitespace)
            .map(|(id, t)| (t.kind, stream.lexeme(id)))
            .collect()
    }

    #[test]
    fn test_round_trip() {
        let source = "import a, { b as c } from \"./m.js\";\n\
                      /** doc\n * block */\n\
                      const re = /a+b/g.test(`x ${ {y: 1}.y } z`); // tail\n\
                      let n = 0xFF + 1_000.5e-3 / 2 >>>= 10n;\n";
        let stream = tokenize(source).unwrap();
        assert_eq!(stream.source_text(), source);
        assert_eq!(stream.render(), source);
    }

    #[test]
    fn test_numeric_subkinds() {
        let tokens = kinds("0xFF 0o17 0b101 1_000.5e-3 10n 1e5 42");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Number(NumberKind::Hex), "0xFF"),
                (TokenKind::Number(NumberKind::Octal), "0o17"),
                (TokenKind::Number(NumberKind::Binary), "0b101"),
                (TokenKind::Number(NumberKind::Float), "1_000.5e-3"),
                (TokenKind::Number(NumberKind::BigInt), "10n"),
                (TokenKind::Number(NumberKind::Exponent), "1e5"),
                (TokenKind::Number(NumberKind::Integer), "42"),
            ]
        );
    }

    #[test]
    fn test_division_vs_regexp() {
        let tokens = kinds("a = b / c / d;");
        assert!(tokens.contains(&(TokenKind::Operator, "/")));
        assert!(!tokens.iter().any(|(k, _)| *k == TokenKind::RegExp));

        let tokens = kinds("x = /ab+c/i;");
        assert!(tokens.contains(&(TokenKind::RegExp, "/ab+c/i")));
    }

    #[test]
    fn test_slash_without_regexp_falls_back_to_operator() {
        assert_eq!(
            kinds("x /= 2;"),
            vec![
                (TokenKind::Identifier, "x"),
                (TokenKind::Operator, "/="),
                (TokenKind::Number(NumberKind::Integer), "2"),
                (TokenKind::Delimiter, ";"),
            ]
        );
        assert_eq!(
            kinds("a / b"),
            vec![
                (TokenKind::Identifier, "a"),
                (TokenKind::Operator, "/"),
                (TokenKind::Identifier, "b"),
            ]
        );
    }

    #[test]
    fn test_template_interpolation() {
        let tokens = kinds("`a ${ {b: 1}.b } c`");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Template, "`a "),
                (TokenKind::Bracket, "${"),
                (TokenKind::Bracket, "{"),
                (TokenKind::Identifier, "b"),
                (TokenKind::Operator, ":"),
                (TokenKind::Number(NumberKind::Integer), "1"),
                (TokenKind::Bracket, "}"),
                (TokenKind::Delimiter, "."),
                (TokenKind::Identifier, "b"),
                (TokenKind::Bracket, "}"),
                (TokenKind::Template, " c`"),
            ]
        );
    }

    #[test]
    fn test_nested_templates() {
        let source = "`x ${ `y ${z}` } w`";
        let tokens = kinds(source);
        assert_eq!(tokens.first(), Some(&(TokenKind::Template, "`x ")));
        assert_eq!(tokens.last(), Some(&(TokenKind::Template, " w`")));
        assert!(tokens.contains(&(TokenKind::Template, "`y ")));
        assert_eq!(tokenize(source).unwrap().source_text(), source);
    }

    #[test]
    fn test_comments_and_doc_comments() {
        let tokens = kinds("/** doc */ /**/ /* c */ // line");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::DocComment, "/** doc */"),
                (TokenKind::Comment, "/**/"),
                (TokenKind::Comment, "/* c */"),
                (TokenKind::Comment, "// line"),
            ]
        );
    }

    #[test]
    fn test_operators() {
        let tokens = kinds("a ??= b => c >>>= d ?. e");
        let ops: Vec<&str> = tokens
            .iter()
            .filter(|(k, _)| *k == TokenKind::Operator)
            .map(|(_, l)| *l)
            .collect();
        assert_eq!(ops, vec!["??=", "=>", ">>>=", "?."]);
    }

    #[test]
    fn test_unterminated_template() {
        let err = tokenize("let s = `abc").unwrap_err();
        assert_eq!(
            err,
            TranspileError::UnterminatedLiteral {
                kind: LiteralKind::Template,
                offset: 8
            }
        );
        assert!(tokenize("`a ${ b").is_err());
    }

    #[test]
    fn test_unterminated_doc_comment() {
        let err = tokenize("/** never closed").unwrap_err();
        assert!(matches!(
            err,
            TranspileError::UnterminatedLiteral {
                kind: LiteralKind::DocComment,
                offset: 0
            }
        ));
    }

    #[test]
    fn test_unknown_characters_are_kept() {
        let source = "#priv \\ x";
        let stream = tokenize(source).unwrap();
        assert_eq!(stream.source_text(), source);
    }

    #[test]
    fn test_strings_with_escapes() {
        let tokens = kinds(r#"'it\'s' "q\"q""#);
        assert_eq!(
            tokens,
            vec![(TokenKind::String, r"'it\'s'"), (TokenKind::String, r#""q\"q""#)]
        );
    }
}
