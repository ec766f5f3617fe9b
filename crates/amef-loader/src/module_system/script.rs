// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Script modules
//!
//! A script is fetched, rewritten by the transpiler, has its dependencies
//! imported relative to its own path, and is then handed to the host as a
//! [`Wrapper`]. Besides `import` statements, a script may name extra
//! dependencies with marker comments:
//!
//! ```text
//! /// <amd-dependency path="./polyfill.js" />
//! /// <amd-dependency path="./util.js" name="util" />
//! ```
//!
//! A named marker binds the dependency's whole export object.

use super::loader::ModuleContext;
use super::registry::ModuleHandler;
use super::wrapper::{Wrapper, WrapperBinding};
use crate::error::{LoadResult, LoaderError};
use amef_transpiler::{Binding, ImportMap, transform_with};
use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, instrument};

static MARKER_COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"///\s*<amd-dependency\s+path\s*=\s*["']([^"']+)["'](?:\s+name\s*=\s*["']([\w$]+)["'])?\s*/?>"#,
    )
    .expect("regex")
});

/// An extra dependency declared outside `import` statements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyMarker {
    /// Dependency path as written
    pub path: String,
    /// Identifier bound to the dependency's export object
    pub name: Option<String>,
}

impl DependencyMarker {
    pub(crate) fn from_captures(captures: &regex::Captures<'_>) -> Option<Self> {
        Some(Self {
            path: captures.get(1)?.as_str().to_string(),
            name: captures.get(2).map(|m| m.as_str().to_string()),
        })
    }
}

/// Dependency markers in `///` comments, in source order
pub fn dependency_markers(source: &str) -> Vec<DependencyMarker> {
    MARKER_COMMENT
        .captures_iter(source)
        .filter_map(|captures| DependencyMarker::from_captures(&captures))
        .collect()
}

/// Loads `.js` modules
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptHandler;

#[async_trait]
impl ModuleHandler for ScriptHandler {
    async fn load(&self, ctx: &ModuleContext, path: &str) -> LoadResult {
        let source = ctx.host().fetch(path).await.map_err(LoaderError::Host)?;
        let markers = dependency_markers(&source);
        run_script(ctx, path, &source, markers).await
    }
}

/// Rewrites, links and executes a script body belonging to `path`.
#[instrument(level = "debug", skip(ctx, source, markers))]
pub(crate) async fn run_script(
    ctx: &ModuleContext,
    path: &str,
    source: &str,
    markers: Vec<DependencyMarker>,
) -> LoadResult {
    let output = transform_with(source, &ctx.config().transform_options())
        .map_err(|err| LoaderError::transpile(path, err))?;

    // marker dependencies load alongside, and bind before, static imports
    let mut requests = ImportMap::new();
    for marker in markers {
        let bindings = requests.entry(marker.path).or_default();
        bindings.extend(marker.name.map(Binding::Namespace));
    }
    for (dependency, bindings) in output.imports {
        requests.entry(dependency).or_default().extend(bindings);
    }

    let specifiers: Vec<&str> = requests.keys().map(String::as_str).collect();
    let (resolved, dependencies) = ctx.import_dependencies(path, &specifiers).await?;

    let mut wrapper = Wrapper::new(path, ctx.config());
    for ((_, bindings), dependency) in requests.iter().zip(&resolved) {
        wrapper.bindings.extend(
            bindings
                .iter()
                .map(|binding| WrapperBinding::from_import(dependency, binding)),
        );
    }
    wrapper.body = output.script;
    wrapper.exports = output.exports;

    debug!(
        path,
        dependencies = dependencies.len(),
        exports = wrapper.exports.len(),
        "executing module"
    );
    let exports = ctx
        .host()
        .execute(&wrapper, &dependencies)
        .await
        .map_err(LoaderError::Host)?;
    Ok(exports)
}
