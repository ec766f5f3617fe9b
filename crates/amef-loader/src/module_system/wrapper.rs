// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Executable wrappers around rewritten module bodies
//!
//! A wrapper is what the host runs for a script module. Rendered, it reads:
//!
//! ```text
//! /** @file app/main.js */
//! var h = __imports__["app/dom.js"]["h"];
//! ...rewritten body...
//! exports.app = app;
//! ```
//!
//! Dependency bindings come first, then the body, then one assignment per
//! exported declaration so those run after the body has defined them.

use crate::config::LoaderConfig;
use amef_transpiler::{Binding, Export};
use serde_json::Value;
use std::fmt;

/// One identifier bound from a dependency's exports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapperBinding {
    /// Identifier introduced in the module body
    pub local: String,
    /// Resolved path of the dependency
    pub source: String,
    /// Exported member to read, or `None` for the whole export object
    pub member: Option<String>,
}

impl WrapperBinding {
    /// Build the binding for an import of `source`
    pub fn from_import(source: &str, binding: &Binding) -> Self {
        let member = match binding {
            Binding::Default(_) => Some("default".to_string()),
            Binding::Named(imported, _) => Some(imported.clone()),
            Binding::Namespace(_) => None,
        };
        Self {
            local: binding.local().to_string(),
            source: source.to_string(),
            member,
        }
    }
}

/// A script module ready to hand to the host
#[derive(Debug, Clone)]
pub struct Wrapper {
    /// Resolved module path
    pub path: String,
    /// Dependency bindings, in import order
    pub bindings: Vec<WrapperBinding>,
    /// Rewritten module body
    pub body: String,
    /// Exports collected by the rewrite pass
    pub exports: Vec<Export>,
    /// Identifier of the export object
    pub exports_ident: String,
    /// Identifier of the dependency-exports table
    pub imports_ident: String,
}

impl Wrapper {
    /// Create an empty wrapper for `path`
    pub fn new(path: impl Into<String>, config: &LoaderConfig) -> Self {
        Self {
            path: path.into(),
            bindings: Vec::new(),
            body: String::new(),
            exports: Vec::new(),
            exports_ident: config.exports_ident.clone(),
            imports_ident: config.imports_ident.clone(),
        }
    }

    /// Exported names, `default` included
    pub fn export_names(&self) -> impl Iterator<Item = &str> {
        self.exports.iter().map(Export::name)
    }
}

fn quoted(s: &str) -> String {
    Value::from(s).to_string()
}

impl fmt::Display for Wrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "/** @file {} */", self.path)?;
        for binding in &self.bindings {
            write!(
                f,
                "var {} = {}[{}]",
                binding.local,
                self.imports_ident,
                quoted(&binding.source)
            )?;
            if let Some(member) = &binding.member {
                write!(f, "[{}]", quoted(member))?;
            }
            writeln!(f, ";")?;
        }
        writeln!(f, "{}", self.body)?;
        for export in &self.exports {
            if let Some(local) = export.local() {
                writeln!(f, "{}.{} = {};", self.exports_ident, export.name(), local)?;
            }
        }
        Ok(())
    }
}
