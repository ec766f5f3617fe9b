// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! A dry-run host that reads modules from disk.
//!
//! Nothing is executed. Each wrapper is recorded and every declared export
//! resolves to `null`, except `default`, which resolves to an empty object
//! so components can carry their template.

use amef_loader::{DependencyExports, Host, Wrapper};
use anyhow::Context;
use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Something the loader asked the host to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// A module's text was read
    Fetch(String),
    /// A wrapper was handed over for execution
    Execute {
        /// Resolved module path
        path: String,
        /// Rendered wrapper
        wrapper: String,
    },
    /// A stylesheet reference was injected
    Stylesheet(String),
    /// An inline style block was appended
    Style(String),
}

/// Host backed by a directory
pub struct FsHost {
    root: PathBuf,
    events: Mutex<Vec<HostEvent>>,
}

impl FsHost {
    /// Create a host reading modules under `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            events: Mutex::new(Vec::new()),
        }
    }

    /// The directory modules are read from
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Everything recorded so far, in order
    pub async fn events(&self) -> Vec<HostEvent> {
        self.events.lock().await.clone()
    }

    async fn record(&self, event: HostEvent) {
        self.events.lock().await.push(event);
    }
}

#[async_trait]
impl Host for FsHost {
    async fn fetch(&self, path: &str) -> anyhow::Result<String> {
        let file = self.root.join(path.trim_start_matches('/'));
        let text = tokio::fs::read_to_string(&file)
            .await
            .with_context(|| format!("Failed to fetch {} ({})", path, file.display()))?;
        self.record(HostEvent::Fetch(path.to_string())).await;
        Ok(text)
    }

    async fn execute(
        &self,
        wrapper: &Wrapper,
        _dependencies: &DependencyExports,
    ) -> anyhow::Result<Value> {
        self.record(HostEvent::Execute {
            path: wrapper.path.clone(),
            wrapper: wrapper.to_string(),
        })
        .await;

        let exports = wrapper
            .export_names()
            .map(|name| {
                let value = if name == amef_transpiler::DEFAULT_EXPORT {
                    Value::Object(Map::new())
                } else {
                    Value::Null
                };
                (name.to_string(), value)
            })
            .collect();
        Ok(Value::Object(exports))
    }

    async fn inject_stylesheet(&self, href: &str) -> anyhow::Result<Value> {
        self.record(HostEvent::Stylesheet(href.to_string())).await;
        Ok(json!({ "href": href }))
    }

    async fn append_style(&self, css: &str) -> anyhow::Result<()> {
        self.record(HostEvent::Style(css.to_string())).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amef_loader::{LoaderError, ModuleContext};
    use std::sync::Arc;

    fn site(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (path, text) in files {
            let file = dir.path().join(path);
            std::fs::create_dir_all(file.parent().unwrap()).unwrap();
            std::fs::write(file, text).unwrap();
        }
        dir
    }

    #[tokio::test]
    async fn test_trace_module_graph() {
        let dir = site(&[
            ("main.js", "import { h } from './lib/dom.js';\nexport default h;\n"),
            ("lib/dom.js", "export function h() {}\n"),
        ]);
        let host = Arc::new(FsHost::new(dir.path()));
        let ctx = ModuleContext::new(host.clone());

        let exports = ctx.import("main.js").await.unwrap();
        assert_eq!(exports, json!({ "default": {} }));

        let executed: Vec<String> = host
            .events()
            .await
            .into_iter()
            .filter_map(|event| match event {
                HostEvent::Execute { path, .. } => Some(path),
                _ => None,
            })
            .collect();
        assert_eq!(executed, vec!["lib/dom.js", "main.js"]);
    }

    #[tokio::test]
    async fn test_component_on_disk() {
        let dir = site(&[(
            "card.html",
            "<template><p></p></template><script>export default {};</script><style>p{}</style>",
        )]);
        let host = Arc::new(FsHost::new(dir.path()));
        let ctx = ModuleContext::new(host.clone());

        let exports = ctx.import("card.html").await.unwrap();
        assert_eq!(exports, json!({ "default": { "template": "<p></p>" } }));
        assert!(host.events().await.contains(&HostEvent::Style("p{}".into())));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = site(&[]);
        let ctx = ModuleContext::new(Arc::new(FsHost::new(dir.path())));

        let err = ctx.import("nope.js").await.unwrap_err();
        assert!(matches!(*err, LoaderError::Host(_)));
        assert!(err.to_string().starts_with("Failed to fetch nope.js"));
    }
}
