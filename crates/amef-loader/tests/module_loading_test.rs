//! Module loading integration tests
//!
//! Runs the loader against an in-memory host that records every fetch,
//! execution and document change.

use amef_loader::{DependencyExports, Host, LoadResult, LoaderError, ModuleContext, Wrapper};
use amef_transpiler::Export;
use anyhow::anyhow;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

#[derive(Default)]
struct MockHost {
    sources: HashMap<String, String>,
    fetches: Mutex<Vec<String>>,
    executed: Mutex<Vec<String>>,
    wrappers: Mutex<HashMap<String, (String, DependencyExports)>>,
    stylesheets: Mutex<Vec<String>>,
    styles: Mutex<Vec<String>>,
}

impl MockHost {
    fn with_files(files: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            sources: files
                .iter()
                .map(|(path, source)| (path.to_string(), source.to_string()))
                .collect(),
            ..Self::default()
        })
    }

    fn fetch_count(&self, path: &str) -> usize {
        self.fetches.lock().iter().filter(|p| *p == path).count()
    }

    fn wrapper(&self, path: &str) -> String {
        self.wrappers.lock()[path].0.clone()
    }

    fn dependencies(&self, path: &str) -> DependencyExports {
        self.wrappers.lock()[path].1.clone()
    }
}

/// A JSON literal after `exports.default = ` becomes the default export.
fn default_export(wrapper: &Wrapper) -> Value {
    wrapper
        .body
        .split_once("exports.default = ")
        .and_then(|(_, rest)| rest.rsplit_once(';'))
        .and_then(|(literal, _)| serde_json::from_str(literal.trim()).ok())
        .unwrap_or_else(|| json!({ "module": wrapper.path }))
}

#[async_trait]
impl Host for MockHost {
    async fn fetch(&self, path: &str) -> anyhow::Result<String> {
        self.fetches.lock().push(path.to_string());
        tokio::task::yield_now().await;
        self.sources
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("404: {path}"))
    }

    async fn execute(
        &self,
        wrapper: &Wrapper,
        dependencies: &DependencyExports,
    ) -> anyhow::Result<Value> {
        self.executed.lock().push(wrapper.path.clone());
        self.wrappers.lock().insert(
            wrapper.path.clone(),
            (wrapper.to_string(), dependencies.clone()),
        );
        if wrapper.body.contains("throw") {
            return Err(anyhow!("uncaught exception in {}", wrapper.path));
        }

        let mut exports = Map::new();
        for export in &wrapper.exports {
            let value = match export {
                Export::Default => default_export(wrapper),
                Export::Named(..) => json!(format!("{}#{}", wrapper.path, export.name())),
            };
            exports.insert(export.name().to_string(), value);
        }
        Ok(Value::Object(exports))
    }

    async fn inject_stylesheet(&self, href: &str) -> anyhow::Result<Value> {
        self.stylesheets.lock().push(href.to_string());
        Ok(json!({ "href": href }))
    }

    async fn append_style(&self, css: &str) -> anyhow::Result<()> {
        self.styles.lock().push(css.to_string());
        Ok(())
    }
}

async fn import(ctx: &ModuleContext, path: &str) -> LoadResult {
    tokio::time::timeout(Duration::from_secs(5), ctx.import(path))
        .await
        .expect("import did not settle")
}

#[tokio::test]
async fn test_import_links_dependencies() {
    let host = MockHost::with_files(&[
        (
            "main.js",
            r#"import { h } from "./lib/dom.js";
import app from "./lib/app.js";
export const view = h(app);
"#,
        ),
        ("lib/dom.js", "export function h(x) { return x; }"),
        ("lib/app.js", r#"import { h } from "./dom.js"; export default 7;"#),
    ]);
    let ctx = ModuleContext::new(host.clone());

    let exports = import(&ctx, "main.js").await.unwrap();
    assert_eq!(exports, json!({ "view": "main.js#view" }));

    let executed = host.executed.lock().clone();
    assert_eq!(executed.last().map(String::as_str), Some("main.js"));
    assert_eq!(executed.len(), 3);
    assert_eq!(host.fetch_count("lib/dom.js"), 1);

    let wrapper = host.wrapper("main.js");
    assert!(wrapper.starts_with("/** @file main.js */\n"));
    assert!(wrapper.contains(r#"var h = __imports__["lib/dom.js"]["h"];"#));
    assert!(wrapper.contains(r#"var app = __imports__["lib/app.js"]["default"];"#));
    assert!(wrapper.contains("var view /* exported */ = h(app);"));
    assert!(wrapper.ends_with("exports.view = view;\n"));

    let dependencies = host.dependencies("main.js");
    assert_eq!(dependencies["lib/dom.js"], json!({ "h": "lib/dom.js#h" }));
    assert_eq!(dependencies["lib/app.js"], json!({ "default": 7 }));
}

#[tokio::test]
async fn test_concurrent_imports_share_one_load() {
    let host = MockHost::with_files(&[("a.js", "export default 1;")]);
    let ctx = ModuleContext::new(host.clone());

    let first = ctx.import("a.js");
    let second = ctx.import("./a.js");
    assert!(first.ptr_eq(&second));

    let (first, second) = futures::join!(first, second);
    assert_eq!(first.unwrap(), json!({ "default": 1 }));
    assert_eq!(second.unwrap(), json!({ "default": 1 }));
    assert_eq!(host.fetch_count("a.js"), 1);
    assert_eq!(ctx.cache().len(), 1);
}

#[tokio::test]
async fn test_shared_dependency_loads_once() {
    let host = MockHost::with_files(&[
        ("a.js", r#"import c from "./c.js"; export default 1;"#),
        ("b.js", r#"import c from "./c.js"; export default 2;"#),
        ("c.js", "export default 3;"),
    ]);
    let ctx = ModuleContext::new(host.clone());

    let (a, b) = futures::join!(ctx.import("a.js"), ctx.import("b.js"));
    assert!(a.is_ok() && b.is_ok());
    assert_eq!(host.fetch_count("c.js"), 1);
    assert_eq!(
        host.executed.lock().iter().filter(|p| *p == "c.js").count(),
        1
    );
    assert_eq!(ctx.cache().keys(), vec!["a.js", "b.js", "c.js"]);
}

#[tokio::test]
async fn test_exports_are_sealed() {
    let host = MockHost::with_files(&[("a.js", "export default 1;")]);
    let ctx = ModuleContext::new(host.clone());
    assert!(ctx.exports("a.js").is_none());

    import(&ctx, "a.js").await.unwrap();
    let record = ctx.cache().get("a.js").unwrap();
    assert!(record.slot().is_sealed());
    assert_eq!(ctx.exports("a.js"), Some(json!({ "default": 1 })));

    let again = record.slot().seal(json!(null)).unwrap_err();
    assert!(matches!(again, LoaderError::DuplicateExport { ref path } if path == "a.js"));

    import(&ctx, "a.js").await.unwrap();
    assert_eq!(host.fetch_count("a.js"), 1);
}

#[tokio::test]
async fn test_unknown_suffix() {
    let ctx = ModuleContext::new(MockHost::with_files(&[]));
    let err = import(&ctx, "./data/config.json").await.unwrap_err();
    assert!(
        matches!(*err, LoaderError::UnknownLoaderSuffix { ref path } if path == "data/config.json")
    );
    assert!(ctx.cache().is_empty());
}

#[tokio::test]
async fn test_custom_loader_registration() {
    let host = MockHost::with_files(&[]);
    let ctx = ModuleContext::new(host.clone());

    assert!(ctx.register_loader("txt", |path: String| async move {
        LoadResult::Ok(Value::String(format!("text of {path}")))
    }));
    assert!(!ctx.register_loader("txt", |_: String| async move { LoadResult::Ok(Value::Null) }));
    assert!(!ctx.register_loader("js", |_: String| async move { LoadResult::Ok(Value::Null) }));

    let content = import(&ctx, "notes/readme.txt").await.unwrap();
    assert_eq!(content, json!("text of notes/readme.txt"));
    assert_eq!(ctx.registry().suffixes(), vec!["css", "html", "js", "txt"]);
}

#[tokio::test]
async fn test_fetch_failure_propagates_unchanged() {
    let host = MockHost::with_files(&[(
        "app/main.js",
        r#"import missing from "../gone.js"; export default 1;"#,
    )]);
    let ctx = ModuleContext::new(host.clone());

    let err = import(&ctx, "app/main.js").await.unwrap_err();
    assert!(matches!(*err, LoaderError::Host(_)));
    assert_eq!(err.to_string(), "404: gone.js");

    let direct = import(&ctx, "gone.js").await.unwrap_err();
    assert!(Arc::ptr_eq(&err, &direct));
    assert!(host.executed.lock().is_empty());
    assert_eq!(host.fetch_count("gone.js"), 1);
}

#[tokio::test]
async fn test_execution_failure_propagates() {
    let host = MockHost::with_files(&[
        ("main.js", r#"import "./boom.js"; export default 1;"#),
        ("boom.js", r#"throw new Error("boom");"#),
    ]);
    let ctx = ModuleContext::new(host);

    let err = import(&ctx, "main.js").await.unwrap_err();
    assert_eq!(err.to_string(), "uncaught exception in boom.js");
    assert!(ctx.exports("main.js").is_none());
}

#[tokio::test]
async fn test_transpile_failure() {
    let host = MockHost::with_files(&[("bad.js", r#"import { a from "./a.js";"#)]);
    let ctx = ModuleContext::new(host);

    let err = import(&ctx, "bad.js").await.unwrap_err();
    assert!(matches!(*err, LoaderError::Transpile { ref path, .. } if path == "bad.js"));
}

#[tokio::test]
async fn test_circular_imports_settle() {
    let host = MockHost::with_files(&[
        ("a.js", r#"import b from "./b.js"; export default 1;"#),
        ("b.js", r#"import a from "./a.js"; export default 2;"#),
    ]);
    let ctx = ModuleContext::new(host.clone());

    let exports = import(&ctx, "a.js").await.unwrap();
    assert_eq!(exports, json!({ "default": 1 }));

    // b.js ran first and saw a.js before it was sealed
    assert_eq!(host.dependencies("b.js")["a.js"], json!({}));
    assert_eq!(host.dependencies("a.js")["b.js"], json!({ "default": 2 }));
    assert!(host.wrapper("b.js").contains(r#"var a = __imports__["a.js"]["default"];"#));
    assert_eq!(host.fetch_count("a.js"), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_three_module_cycle_from_every_entry() {
    let host = MockHost::with_files(&[
        ("a.js", r#"import b from "./b.js"; export default 1;"#),
        ("b.js", r#"import c from "./c.js"; export default 2;"#),
        ("c.js", r#"import a from "./a.js"; export default 3;"#),
    ]);
    let ctx = ModuleContext::new(host.clone());

    let entries = ["a.js", "b.js", "c.js"].map(|path| {
        let ctx = ctx.clone();
        tokio::spawn(async move { import(&ctx, path).await })
    });
    let results = futures::future::join_all(entries).await;

    for (result, expected) in results.into_iter().zip(1..=3) {
        assert_eq!(result.unwrap().unwrap(), json!({ "default": expected }));
    }

    let edges = [("a.js", "b.js"), ("b.js", "c.js"), ("c.js", "a.js")];
    let placeholders = edges
        .iter()
        .filter(|(importer, dependency)| host.dependencies(importer)[*dependency] == json!({}))
        .count();
    assert!(placeholders >= 1);

    for path in ["a.js", "b.js", "c.js"] {
        assert_eq!(host.fetch_count(path), 1);
        assert_eq!(host.executed.lock().iter().filter(|p| *p == path).count(), 1);
    }
}

#[tokio::test]
async fn test_self_import_settles() {
    let host = MockHost::with_files(&[("me.js", r#"import * as me from "./me.js"; export default 1;"#)]);
    let ctx = ModuleContext::new(host.clone());

    import(&ctx, "me.js").await.unwrap();
    assert_eq!(host.dependencies("me.js")["me.js"], json!({}));
}

#[tokio::test]
async fn test_dependency_markers() {
    let host = MockHost::with_files(&[
        (
            "main.js",
            r#"/// <amd-dependency path="./polyfill.js" />
/// <amd-dependency path="./util.js" name="util" />
export default 1;
"#,
        ),
        ("polyfill.js", "window.shim = true;"),
        ("util.js", "export const pad = 2;"),
    ]);
    let ctx = ModuleContext::new(host.clone());

    import(&ctx, "main.js").await.unwrap();
    assert_eq!(host.fetch_count("polyfill.js"), 1);
    assert!(host.wrapper("main.js").contains(r#"var util = __imports__["util.js"];"#));
    assert_eq!(host.dependencies("main.js")["util.js"], json!({ "pad": "util.js#pad" }));
}

#[tokio::test]
async fn test_stylesheet_module() {
    let host = MockHost::with_files(&[]);
    let ctx = ModuleContext::new(host.clone());

    let content = import(&ctx, "./styles/theme.css").await.unwrap();
    assert_eq!(content, json!({ "href": "styles/theme.css" }));
    assert_eq!(*host.stylesheets.lock(), vec!["styles/theme.css"]);
    assert!(host.fetches.lock().is_empty());
}

#[tokio::test]
async fn test_component_module() {
    let host = MockHost::with_files(&[(
        "ui/card.html",
        r#"<amd-dependency path="./card.css" />
<template><div class="card"><template><slot></slot></template></div></template>
<script>export default {"title": "Card"};</script>
<style>.card { padding: 1em; }</style>
"#,
    )]);
    let ctx = ModuleContext::new(host.clone());

    let exports = import(&ctx, "ui/card.html").await.unwrap();
    assert_eq!(
        exports,
        json!({
            "default": {
                "title": "Card",
                "template": r#"<div class="card"><template><slot></slot></template></div>"#
            }
        })
    );
    assert_eq!(*host.styles.lock(), vec![".card { padding: 1em; }"]);
    assert_eq!(*host.stylesheets.lock(), vec!["ui/card.css"]);
    assert!(host.wrapper("ui/card.html").starts_with("/** @file ui/card.html */"));
}

#[tokio::test]
async fn test_component_with_primitive_default() {
    let host = MockHost::with_files(&[(
        "bad.html",
        "<template><p></p></template><script>export default 42;</script>",
    )]);
    let ctx = ModuleContext::new(host);

    let err = import(&ctx, "bad.html").await.unwrap_err();
    assert!(matches!(*err, LoaderError::InvalidComponent { ref path } if path == "bad.html"));
}

#[tokio::test]
async fn test_component_without_script() {
    let host = MockHost::with_files(&[("plain.html", "<template><b>hi</b></template>")]);
    let ctx = ModuleContext::new(host);

    let exports = import(&ctx, "plain.html").await.unwrap();
    assert_eq!(exports, json!({ "default": { "template": "<b>hi</b>" } }));
}
