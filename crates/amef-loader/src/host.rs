// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! The boundary to the embedding environment.
//!
//! The loader never touches the network, a document or a script engine
//! itself. Everything observable goes through a [`Host`]: fetching module
//! text, executing a synthesized [`Wrapper`], and the two stylesheet side
//! effects.

use crate::module_system::Wrapper;
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;

/// Export objects of a module's dependencies, keyed by resolved path.
pub type DependencyExports = IndexMap<String, Value>;

/// Services the embedding environment provides to the loader.
///
/// Errors are returned to importers untouched, wrapped only in
/// [`LoaderError::Host`](crate::LoaderError::Host).
#[async_trait]
pub trait Host: Send + Sync + 'static {
    /// Fetches the text of a module.
    async fn fetch(&self, path: &str) -> anyhow::Result<String>;

    /// Executes a wrapper and returns the module's export object.
    ///
    /// `dependencies` holds an entry for every resolved path the wrapper's
    /// bindings refer to.
    async fn execute(
        &self,
        wrapper: &Wrapper,
        dependencies: &DependencyExports,
    ) -> anyhow::Result<Value>;

    /// Injects a stylesheet reference and resolves once it has loaded.
    /// The returned value becomes the module's content.
    async fn inject_stylesheet(&self, href: &str) -> anyhow::Result<Value>;

    /// Appends an inline style block from a component to the document.
    async fn append_style(&self, css: &str) -> anyhow::Result<()>;
}
