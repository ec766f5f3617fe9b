//! Import/export rewrite pass.
//!
//! Acts only on keyword tokens of a classified stream:
//!
//! - `let` / `const` become `var`, since a module body runs inside a single
//!   function scope
//! - `export default <expr>` assigns `<expr>` to the default slot in place
//! - `export <decl>` keeps the declaration and marks the declared name; the
//!   loader appends `exports.<name> = <name>;` after the body
//! - `export { a, b as c }` is removed and recorded the same way
//! - `import ... from "path";` is removed entirely and reported in the
//!   import map
//!
//! ```rust
//! use amef_transpiler::{transform, Binding};
//!
//! let out = transform("import a, { b as c } from \"./m.js\";\nlet x = a;").unwrap();
//! assert_eq!(out.script, "\nvar x = a;");
//! assert_eq!(
//!     out.imports["./m.js"],
//!     vec![Binding::Default("a".into()), Binding::Named("b".into(), Some("c".into()))]
//! );
//! ```

use crate::classifier::classify;
use crate::error::{Result, TranspileError};
use crate::lexer::{tokenize, TokenId, TokenKind, TokenStream};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::trace;

/// Name of the default export slot.
pub const DEFAULT_EXPORT: &str = "default";

/// Comment appended to a declared name that is exported.
pub const EXPORTED_MARKER: &str = "/* exported */";

/// One imported name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Binding {
    /// `import foo from 'module'`
    Default(String),
    /// `import { foo } from 'module'` or `import { foo as bar } ...`
    Named(String, Option<String>), // (imported, local alias)
    /// `import * as foo from 'module'`
    Namespace(String),
}

impl Binding {
    /// The identifier this binding introduces in the importing module.
    pub fn local(&self) -> &str {
        match self {
            Binding::Default(local) | Binding::Namespace(local) => local,
            Binding::Named(imported, alias) => alias.as_deref().unwrap_or(imported),
        }
    }
}

/// Dependency path as written, in first-seen order, to its bindings.
pub type ImportMap = IndexMap<String, Vec<Binding>>;

/// One exported name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Export {
    /// `export default value`
    Default,
    /// `export const foo`, `export { foo }` or `export { foo as bar }`
    Named(String, Option<String>), // (local, exported alias)
}

impl Export {
    /// Name under which the value is exported.
    pub fn name(&self) -> &str {
        match self {
            Export::Default => DEFAULT_EXPORT,
            Export::Named(local, alias) => alias.as_deref().unwrap_or(local),
        }
    }

    /// Local identifier whose value is exported, if any.
    pub fn local(&self) -> Option<&str> {
        match self {
            Export::Default => None,
            Export::Named(local, _) => Some(local),
        }
    }
}

/// Knobs for the rewrite pass.
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// Identifier of the export object inside the module body
    pub exports_ident: String,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            exports_ident: "exports".to_string(),
        }
    }
}

/// Result of rewriting one module.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransformOutput {
    /// Rewritten script text
    pub script: String,
    /// Static dependencies and their bindings
    pub imports: ImportMap,
    /// Exports in encounter order
    pub exports: Vec<Export>,
}

impl TransformOutput {
    /// Exported names in encounter order, `default` included.
    pub fn export_names(&self) -> Vec<&str> {
        self.exports.iter().map(Export::name).collect()
    }
}

/// Tokenizes, classifies and rewrites `source` with default options.
pub fn transform(source: &str) -> Result<TransformOutput> {
    transform_with(source, &TransformOptions::default())
}

/// Tokenizes, classifies and rewrites `source`.
pub fn transform_with(source: &str, options: &TransformOptions) -> Result<TransformOutput> {
    let mut stream = tokenize(source)?;
    classify(&mut stream);
    Rewriter::new(&mut stream, options).run()
}

struct Rewriter<'s, 'a> {
    stream: &'s mut TokenStream<'a>,
    options: &'s TransformOptions,
    imports: ImportMap,
    exports: Vec<Export>,
}

impl<'s, 'a> Rewriter<'s, 'a> {
    fn new(stream: &'s mut TokenStream<'a>, options: &'s TransformOptions) -> Self {
        Self {
            stream,
            options,
            imports: ImportMap::new(),
            exports: Vec::new(),
        }
    }

    fn run(mut self) -> Result<TransformOutput> {
        let mut index = 0;
        while index < self.stream.len() {
            let id = TokenId(index);
            index += 1;
            if self.stream.kind(id) != Some(TokenKind::Keyword) {
                continue;
            }
            let consumed = match self.stream.lexeme(id) {
                "let" | "const" => {
                    self.stream.rewrite(id, "var");
                    None
                }
                "export" => self.rewrite_export(id)?,
                "import" => self.rewrite_import(id)?,
                _ => None,
            };
            if let Some(end) = consumed {
                index = end.0 + 1;
            }
        }

        trace!(
            imports = self.imports.len(),
            exports = self.exports.len(),
            "rewrote module"
        );
        Ok(TransformOutput {
            script: self.stream.render(),
            imports: self.imports,
            exports: self.exports,
        })
    }

    fn malformed(&self, statement: &'static str, at: TokenId, reason: &'static str) -> TranspileError {
        TranspileError::MalformedStatement {
            statement,
            offset: self.stream.get(at).map_or(0, |t| t.span.start),
            reason,
        }
    }

    /// Blanks `from..=to`, trivia included.
    fn erase(&mut self, from: TokenId, to: TokenId) {
        for index in from.0..=to.0 {
            self.stream.rewrite(TokenId(index), "");
        }
    }

    /// Extends `end` over a directly following `;`.
    fn with_semicolon(&self, end: TokenId) -> TokenId {
        match self.stream.next(end) {
            Some(next) if self.stream.lexeme(next) == ";" => next,
            _ => end,
        }
    }

    fn name_at(&self, cursor: Option<TokenId>) -> Option<&'a str> {
        let id = cursor?;
        matches!(
            self.stream.kind(id),
            Some(TokenKind::Identifier | TokenKind::Keyword)
        )
        .then(|| self.stream.lexeme(id))
    }

    /// Parses `{ a, b as c }` starting at the `{`; returns the pairs and the
    /// closing `}`.
    fn specifier_list(
        &self,
        statement: &'static str,
        open: TokenId,
    ) -> Result<(Vec<(String, Option<String>)>, TokenId)> {
        let mut entries = Vec::new();
        let mut cursor = self.stream.next(open);
        loop {
            let Some(current) = cursor else {
                return Err(self.malformed(statement, open, "unterminated `{`"));
            };
            if self.stream.lexeme(current) == "}" {
                return Ok((entries, current));
            }
            let name = self
                .name_at(cursor)
                .ok_or_else(|| self.malformed(statement, current, "expected a binding name"))?;
            cursor = self.stream.next(current);

            let mut alias = None;
            if self.stream.is(cursor, "as") {
                let as_token = cursor.unwrap_or(current);
                cursor = self.stream.next(as_token);
                let renamed = self
                    .name_at(cursor)
                    .ok_or_else(|| self.malformed(statement, as_token, "expected a name after `as`"))?;
                alias = Some(renamed.to_string());
                cursor = cursor.and_then(|id| self.stream.next(id));
            }
            entries.push((name.to_string(), alias));

            if self.stream.is(cursor, ",") {
                cursor = cursor.and_then(|id| self.stream.next(id));
            }
        }
    }

    fn rewrite_import(&mut self, import: TokenId) -> Result<Option<TokenId>> {
        let s = &*self.stream;
        let mut cursor = s.next(import);

        // `import(...)` and `import.meta` are expressions
        if s.is(cursor, "(") || s.is(cursor, ".") {
            return Ok(None);
        }

        let mut bindings = Vec::new();
        if cursor.and_then(|id| s.kind(id)) != Some(TokenKind::String) {
            if let Some(id) = cursor.filter(|id| s.kind(*id) == Some(TokenKind::Identifier)) {
                bindings.push(Binding::Default(s.lexeme(id).to_string()));
                cursor = s.next(id);
                if s.is(cursor, ",") {
                    cursor = cursor.and_then(|id| s.next(id));
                }
            }

            if s.is(cursor, "*") {
                cursor = cursor.and_then(|id| s.next(id));
                if !s.is(cursor, "as") {
                    return Err(self.malformed("import", import, "expected `as` after `*`"));
                }
                cursor = cursor.and_then(|id| s.next(id));
                let name = self
                    .name_at(cursor)
                    .ok_or_else(|| self.malformed("import", import, "expected a namespace name"))?;
                bindings.push(Binding::Namespace(name.to_string()));
                cursor = cursor.and_then(|id| s.next(id));
            } else if let Some(open) = cursor.filter(|id| s.lexeme(*id) == "{") {
                let (entries, close) = self.specifier_list("import", open)?;
                bindings.extend(
                    entries
                        .into_iter()
                        .map(|(name, alias)| Binding::Named(name, alias)),
                );
                cursor = s.next(close);
            }

            if !s.is(cursor, "from") {
                return Err(self.malformed("import", import, "expected `from`"));
            }
            cursor = cursor.and_then(|id| s.next(id));
        }

        let path_token = cursor
            .filter(|id| s.kind(*id) == Some(TokenKind::String))
            .ok_or_else(|| self.malformed("import", import, "expected a module path string"))?;
        let path = unquote(s.lexeme(path_token)).to_string();
        let end = self.with_semicolon(path_token);

        self.erase(import, end);
        self.imports.entry(path).or_default().extend(bindings);
        Ok(Some(end))
    }

    fn rewrite_export(&mut self, export: TokenId) -> Result<Option<TokenId>> {
        let next = self.stream.next(export);

        if self.stream.is(next, DEFAULT_EXPORT) {
            let default = next.unwrap_or(export);
            let target = self
                .stream
                .next(default)
                .ok_or_else(|| self.malformed("export", export, "expected an expression after `default`"))?;
            let assignment = format!(
                "{}.{} = {}",
                self.options.exports_ident,
                DEFAULT_EXPORT,
                self.stream.lexeme(target)
            );
            self.stream.rewrite(export, "");
            self.stream.rewrite(default, "");
            self.stream.rewrite(target, assignment);
            self.exports.push(Export::Default);
            return Ok(None);
        }

        if let Some(open) = next.filter(|id| self.stream.lexeme(*id) == "{") {
            let (entries, close) = self.specifier_list("export", open)?;
            if self.stream.is(self.stream.next(close), "from") {
                return Err(self.malformed("export", export, "re-exports are not supported"));
            }
            let end = self.with_semicolon(close);
            self.erase(export, end);
            self.exports.extend(
                entries
                    .into_iter()
                    .map(|(local, alias)| Export::Named(local, alias)),
            );
            return Ok(Some(end));
        }

        let mut cursor = next;
        if self.stream.is(cursor, "async") {
            cursor = cursor.and_then(|id| self.stream.next(id));
        }
        let declarator = cursor.map(|id| self.stream.lexeme(id));
        if !matches!(
            declarator,
            Some("var" | "let" | "const" | "function" | "class")
        ) {
            return Err(self.malformed("export", export, "expected a declaration"));
        }
        cursor = cursor.and_then(|id| self.stream.next(id));
        if self.stream.is(cursor, "*") {
            cursor = cursor.and_then(|id| self.stream.next(id));
        }

        let name_token = cursor
            .filter(|id| self.stream.kind(*id) == Some(TokenKind::Identifier))
            .ok_or_else(|| self.malformed("export", export, "expected a declared name"))?;
        let name = self.stream.lexeme(name_token);

        self.stream.rewrite(export, "");
        self.stream
            .rewrite(name_token, format!("{name} {EXPORTED_MARKER}"));
        self.exports.push(Export::Named(name.to_string(), None));
        Ok(None)
    }
}

fn unquote(literal: &str) -> &str {
    let mut chars = literal.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}
