// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Composite markup components
//!
//! An `.html` module bundles a script, a template and styles:
//!
//! ```html
//! <amd-dependency path="./theme.css" />
//! <template><p>{{ title }}</p></template>
//! <script>export default { title: "Hi" };</script>
//! <style>p { color: red; }</style>
//! ```
//!
//! The script runs like a `.js` module under the component's path, every
//! style block is appended to the document, and the first template's inner
//! text is attached as `template` on the default export.

use super::loader::ModuleContext;
use super::registry::ModuleHandler;
use super::script::{DependencyMarker, run_script};
use crate::error::{LoadResult, LoaderError, Result};
use amef_transpiler::DEFAULT_EXPORT;
use async_trait::async_trait;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;
use tracing::debug;

static SCRIPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>(.*?)</script\s*>").expect("regex"));

static STYLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b[^>]*>(.*?)</style\s*>").expect("regex"));

static TEMPLATE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(/?)template\b[^>]*>").expect("regex"));

static MARKER_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<amd-dependency\s+path\s*=\s*["']([^"']+)["'](?:\s+name\s*=\s*["']([\w$]+)["'])?\s*/?>"#,
    )
    .expect("regex")
});

/// The parts of a composite markup module
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Component {
    /// Text of the first script element, empty if there is none
    pub script: String,
    /// Inner text of the first top-level template element
    pub template: Option<String>,
    /// Inner text of each style element, in order
    pub styles: Vec<String>,
    /// Dependencies declared with marker elements
    pub dependencies: Vec<DependencyMarker>,
}

impl Component {
    /// Split markup into its parts
    pub fn parse(markup: &str) -> Self {
        let script = SCRIPT
            .captures(markup)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();

        let styles = STYLE
            .captures_iter(markup)
            .filter_map(|captures| captures.get(1))
            .map(|m| m.as_str().to_string())
            .collect();

        let dependencies = MARKER_TAG
            .captures_iter(markup)
            .filter_map(|captures| DependencyMarker::from_captures(&captures))
            .collect();

        Self {
            script,
            template: first_template(markup).map(str::to_string),
            styles,
            dependencies,
        }
    }
}

/// Inner text of the first template, honoring nested templates.
fn first_template(markup: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut start = 0;
    for captures in TEMPLATE_TAG.captures_iter(markup) {
        let tag = captures.get(0)?;
        let closing = captures.get(1).is_some_and(|m| !m.as_str().is_empty());
        match (closing, depth) {
            (false, 0) => {
                depth = 1;
                start = tag.end();
            }
            (false, _) => depth += 1,
            (true, 0) => {}
            (true, 1) => return Some(&markup[start..tag.start()]),
            (true, _) => depth -= 1,
        }
    }
    None
}

/// Attach `template` to the default export of a component's exports.
///
/// A missing or null default becomes an empty object first.
pub fn attach_template(path: &str, exports: &mut Value, template: String) -> Result<()> {
    let invalid = || LoaderError::InvalidComponent {
        path: path.to_string(),
    };
    let default = exports
        .as_object_mut()
        .ok_or_else(invalid)?
        .entry(DEFAULT_EXPORT)
        .or_insert(Value::Null);
    if default.is_null() {
        *default = Value::Object(Map::new());
    }
    default
        .as_object_mut()
        .ok_or_else(invalid)?
        .insert("template".to_string(), Value::String(template));
    Ok(())
}

/// Loads `.html` component modules
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentHandler;

#[async_trait]
impl ModuleHandler for ComponentHandler {
    async fn load(&self, ctx: &ModuleContext, path: &str) -> LoadResult {
        let markup = ctx.host().fetch(path).await.map_err(LoaderError::Host)?;
        let component = Component::parse(&markup);
        debug!(
            path,
            styles = component.styles.len(),
            has_template = component.template.is_some(),
            "loading component"
        );

        let mut exports = run_script(ctx, path, &component.script, component.dependencies).await?;

        for css in &component.styles {
            ctx.host().append_style(css).await.map_err(LoaderError::Host)?;
        }

        if let Some(template) = component.template {
            attach_template(path, &mut exports, template)?;
        }
        Ok(exports)
    }
}
