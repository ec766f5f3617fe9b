// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module context and `import()`
//!
//! A [`ModuleContext`] owns everything one page of modules shares: the host,
//! the loader registry, the module cache and the wait graph used to break
//! circular imports. It is cheap to clone; clones share state.
//!
//! ## Circular imports
//!
//! While a module awaits its dependencies, an edge `importer -> dependency`
//! is kept in the wait graph. A dependency whose edge would close a cycle is
//! not awaited. Its bindings read the dependency's sealed content if there
//! is any, otherwise an empty object, and a warning is logged.

use super::cache::{ExportSlot, ModuleCache, ModuleFuture, ModuleRecord};
use super::registry::{LoaderRegistry, ModuleHandler};
use super::resolver::{resolve_path, suffix_of};
use crate::config::LoaderConfig;
use crate::error::{LoadResult, LoaderError};
use crate::host::{DependencyExports, Host};
use futures::FutureExt;
use futures::future::{self, try_join_all};
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

type WaitGraph = HashMap<String, HashSet<String>>;

struct ContextInner {
    host: Arc<dyn Host>,
    config: LoaderConfig,
    registry: LoaderRegistry,
    cache: ModuleCache,
    waits: Mutex<WaitGraph>,
}

/// Shared state for loading modules
#[derive(Clone)]
pub struct ModuleContext {
    inner: Arc<ContextInner>,
}

impl ModuleContext {
    /// Create a context with the default configuration and built-in loaders
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self::with_config(host, LoaderConfig::default())
    }

    /// Create a context with a custom configuration
    pub fn with_config(host: Arc<dyn Host>, config: LoaderConfig) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                host,
                config,
                registry: LoaderRegistry::new(),
                cache: ModuleCache::new(),
                waits: Mutex::new(WaitGraph::new()),
            }),
        }
    }

    /// The embedding host
    pub fn host(&self) -> &Arc<dyn Host> {
        &self.inner.host
    }

    /// The loader configuration
    pub fn config(&self) -> &LoaderConfig {
        &self.inner.config
    }

    /// The module cache
    pub fn cache(&self) -> &ModuleCache {
        &self.inner.cache
    }

    /// The loader registry
    pub fn registry(&self) -> &LoaderRegistry {
        &self.inner.registry
    }

    /// Register a loader for a path suffix. Returns false if one exists.
    pub fn register_loader(&self, suffix: &str, handler: impl ModuleHandler) -> bool {
        self.inner.registry.register(suffix, Arc::new(handler))
    }

    /// Import a module relative to the configured default referrer
    pub fn import(&self, path: &str) -> ModuleFuture {
        self.import_from(path, &self.inner.config.default_referrer)
    }

    /// Import a module relative to `referrer`.
    ///
    /// Every request for the same resolved path returns a handle to the same
    /// load, whether or not it has settled.
    pub fn import_from(&self, path: &str, referrer: &str) -> ModuleFuture {
        self.request(path, referrer).1
    }

    /// Sealed content of a cached module
    pub fn exports(&self, path: &str) -> Option<Value> {
        self.inner.cache.get(path)?.slot().get()
    }

    fn request(&self, specifier: &str, referrer: &str) -> (String, ModuleFuture) {
        let path = resolve_path(referrer, specifier);
        let Some(handler) = self.inner.registry.get(suffix_of(specifier)) else {
            let err = Arc::new(LoaderError::UnknownLoaderSuffix { path: path.clone() });
            return (path, future::ready(Err(err)).boxed().shared());
        };

        let record = self.inner.cache.get_or_insert_with(&path, || {
            debug!(path = %path, referrer, "loading module");
            let slot = Arc::new(ExportSlot::new(path.as_str()));
            let load = self
                .clone()
                .load(handler, path.clone(), Arc::clone(&slot))
                .boxed()
                .shared();
            ModuleRecord::new(path.as_str(), load, slot)
        });
        (path, record.future())
    }

    async fn load(
        self,
        handler: Arc<dyn ModuleHandler>,
        path: String,
        slot: Arc<ExportSlot>,
    ) -> LoadResult {
        let content = match handler.load(&self, &path).await {
            Ok(content) => content,
            Err(err) => {
                warn!(path = %path, error = %err, "module failed to load");
                return Err(err);
            }
        };
        slot.seal(content.clone())?;
        debug!(path = %path, "module loaded");
        Ok(content)
    }

    /// Import `specifiers` relative to `importer` and wait for all of them.
    ///
    /// Returns the resolved path of each specifier, in order, and the
    /// content of every dependency keyed by resolved path. The first
    /// failure wins.
    pub(crate) async fn import_dependencies(
        &self,
        importer: &str,
        specifiers: &[&str],
    ) -> Result<(Vec<String>, DependencyExports), Arc<LoaderError>> {
        let mut resolved = Vec::with_capacity(specifiers.len());
        let mut awaited = Vec::new();
        let mut deferred = Vec::new();

        for specifier in specifiers {
            let (path, load) = self.request(specifier, importer);
            if self.begin_wait(importer, &path) {
                awaited.push((path.clone(), load));
            } else {
                warn!(
                    importer,
                    dependency = %path,
                    "circular import, binding before the dependency has loaded"
                );
                deferred.push(path.clone());
            }
            resolved.push(path);
        }

        let settled = try_join_all(awaited.iter().map(|(_, load)| load.clone())).await;
        self.end_wait(importer);

        let mut dependencies = DependencyExports::new();
        for ((path, _), content) in awaited.into_iter().zip(settled?) {
            dependencies.insert(path, content);
        }
        for path in deferred {
            let placeholder = self
                .exports(&path)
                .unwrap_or_else(|| Value::Object(Map::new()));
            dependencies.entry(path).or_insert(placeholder);
        }
        Ok((resolved, dependencies))
    }

    /// Record that `importer` waits on `dependency`, unless that would close
    /// a cycle.
    fn begin_wait(&self, importer: &str, dependency: &str) -> bool {
        let mut waits = self.inner.waits.lock();
        if reaches(&waits, dependency, importer) {
            return false;
        }
        waits
            .entry(importer.to_string())
            .or_default()
            .insert(dependency.to_string());
        true
    }

    fn end_wait(&self, importer: &str) {
        self.inner.waits.lock().remove(importer);
    }
}

impl std::fmt::Debug for ModuleContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleContext")
            .field("config", &self.inner.config)
            .field("registry", &self.inner.registry)
            .field("cached", &self.inner.cache.len())
            .finish_non_exhaustive()
    }
}

fn reaches(waits: &WaitGraph, from: &str, to: &str) -> bool {
    let mut stack = vec![from];
    let mut seen = HashSet::new();
    while let Some(node) = stack.pop() {
        if node == to {
            return true;
        }
        if !seen.insert(node) {
            continue;
        }
        if let Some(next) = waits.get(node) {
            stack.extend(next.iter().map(String::as_str));
        }
    }
    false
}
