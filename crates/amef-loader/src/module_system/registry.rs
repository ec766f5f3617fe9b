// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Suffix-keyed loader registry

use super::loader::ModuleContext;
use super::markup::ComponentHandler;
use super::script::ScriptHandler;
use super::stylesheet::StylesheetHandler;
use crate::error::LoadResult;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error};

/// Produces a module's content from its resolved path
#[async_trait]
pub trait ModuleHandler: Send + Sync + 'static {
    /// Load the module at `path`
    async fn load(&self, ctx: &ModuleContext, path: &str) -> LoadResult;
}

#[async_trait]
impl<F, Fut> ModuleHandler for F
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = LoadResult> + Send + 'static,
{
    async fn load(&self, _ctx: &ModuleContext, path: &str) -> LoadResult {
        (self)(path.to_string()).await
    }
}

/// Registry of module handlers keyed by path suffix
pub struct LoaderRegistry {
    handlers: RwLock<HashMap<String, Arc<dyn ModuleHandler>>>,
}

impl LoaderRegistry {
    /// Create a registry with no handlers
    pub fn empty() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
        }
    }

    /// Create a registry with the `js`, `css` and `html` handlers
    pub fn new() -> Self {
        let registry = Self::empty();
        registry.register("js", Arc::new(ScriptHandler));
        registry.register("css", Arc::new(StylesheetHandler));
        registry.register("html", Arc::new(ComponentHandler));
        registry
    }

    /// Register `handler` for `suffix`.
    ///
    /// Returns false and keeps the existing handler if the suffix is taken.
    pub fn register(&self, suffix: &str, handler: Arc<dyn ModuleHandler>) -> bool {
        let mut handlers = self.handlers.write();
        if handlers.contains_key(suffix) {
            error!(suffix, "a loader is already registered for this suffix");
            return false;
        }
        debug!(suffix, "registered loader");
        handlers.insert(suffix.to_string(), handler);
        true
    }

    /// Get the handler for `suffix`
    pub fn get(&self, suffix: &str) -> Option<Arc<dyn ModuleHandler>> {
        self.handlers.read().get(suffix).cloned()
    }

    /// Registered suffixes, sorted
    pub fn suffixes(&self) -> Vec<String> {
        let mut suffixes: Vec<String> = self.handlers.read().keys().cloned().collect();
        suffixes.sort();
        suffixes
    }
}

impl Default for LoaderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LoaderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoaderRegistry")
            .field("suffixes", &self.suffixes())
            .finish()
    }
}
