// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module cache for import()
//!
//! A record is inserted the moment a path is first requested, before its
//! load settles, so concurrent importers share one in-flight load. Records
//! are never replaced or removed.

use crate::error::{LoadResult, LoaderError, Result};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

/// Shared handle to a module's eventual content
pub type ModuleFuture = Shared<BoxFuture<'static, LoadResult>>;

/// State of an export slot
#[derive(Debug, Clone, PartialEq)]
pub enum SlotState {
    /// Nothing has been exported yet
    Empty,
    /// The module's content, written exactly once
    Sealed(Value),
}

/// Single-assignment holder for a module's exported content
#[derive(Debug)]
pub struct ExportSlot {
    path: String,
    state: Mutex<SlotState>,
}

impl ExportSlot {
    /// Create an empty slot for a module
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            state: Mutex::new(SlotState::Empty),
        }
    }

    /// Write the slot. A second write fails and leaves the first intact.
    pub fn seal(&self, value: Value) -> Result<()> {
        let mut state = self.state.lock();
        if let SlotState::Sealed(_) = *state {
            return Err(LoaderError::DuplicateExport {
                path: self.path.clone(),
            });
        }
        *state = SlotState::Sealed(value);
        Ok(())
    }

    /// Current state of the slot
    pub fn state(&self) -> SlotState {
        self.state.lock().clone()
    }

    /// The sealed content, if any
    pub fn get(&self) -> Option<Value> {
        match &*self.state.lock() {
            SlotState::Sealed(value) => Some(value.clone()),
            SlotState::Empty => None,
        }
    }

    /// Check if the slot has been written
    pub fn is_sealed(&self) -> bool {
        matches!(*self.state.lock(), SlotState::Sealed(_))
    }
}

/// Cache entry for one resolved path
pub struct ModuleRecord {
    path: String,
    future: ModuleFuture,
    slot: Arc<ExportSlot>,
}

impl ModuleRecord {
    /// Create a record from a not-yet-polled load and its slot
    pub fn new(path: impl Into<String>, future: ModuleFuture, slot: Arc<ExportSlot>) -> Self {
        Self {
            path: path.into(),
            future,
            slot,
        }
    }

    /// The resolved module path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// A handle to the module's load
    pub fn future(&self) -> ModuleFuture {
        self.future.clone()
    }

    /// The module's export slot
    pub fn slot(&self) -> &Arc<ExportSlot> {
        &self.slot
    }
}

impl std::fmt::Debug for ModuleRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleRecord")
            .field("path", &self.path)
            .field("slot", &self.slot)
            .finish_non_exhaustive()
    }
}

/// Thread-safe module cache
#[derive(Debug, Default)]
pub struct ModuleCache {
    /// Cache mapping resolved paths to records
    records: DashMap<String, Arc<ModuleRecord>>,
}

impl ModuleCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cached record by path
    pub fn get(&self, path: &str) -> Option<Arc<ModuleRecord>> {
        self.records.get(path).map(|entry| Arc::clone(entry.value()))
    }

    /// Check if a module is cached
    pub fn has(&self, path: &str) -> bool {
        self.records.contains_key(path)
    }

    /// Get the record for `path`, creating it with `create` if absent.
    ///
    /// Lookup and insertion happen under one shard lock. `create` must not
    /// touch the cache.
    pub fn get_or_insert_with(
        &self,
        path: &str,
        create: impl FnOnce() -> ModuleRecord,
    ) -> Arc<ModuleRecord> {
        match self.records.entry(path.to_string()) {
            Entry::Occupied(entry) => Arc::clone(entry.get()),
            Entry::Vacant(entry) => Arc::clone(entry.insert(Arc::new(create())).value()),
        }
    }

    /// Get all cached module paths, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.records.iter().map(|entry| entry.key().clone()).collect();
        keys.sort();
        keys
    }

    /// Get the number of cached modules
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use serde_json::json;

    fn record(path: &str) -> ModuleRecord {
        let future = futures::future::ready(Ok(json!({ "path": path })))
            .boxed()
            .shared();
        ModuleRecord::new(path, future, Arc::new(ExportSlot::new(path)))
    }

    #[test]
    fn test_slot_seals_once() {
        let slot = ExportSlot::new("a.js");
        assert_eq!(slot.state(), SlotState::Empty);
        assert!(slot.get().is_none());

        slot.seal(json!({ "default": 1 })).unwrap();
        assert!(slot.is_sealed());

        let err = slot.seal(json!({ "default": 2 })).unwrap_err();
        assert!(matches!(err, LoaderError::DuplicateExport { ref path } if path == "a.js"));
        assert_eq!(slot.get(), Some(json!({ "default": 1 })));
    }

    #[test]
    fn test_first_record_wins() {
        let cache = ModuleCache::new();
        let first = cache.get_or_insert_with("a.js", || record("a.js"));
        let second = cache.get_or_insert_with("a.js", || panic!("record replaced"));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert!(cache.has("a.js"));
    }

    #[test]
    fn test_keys_sorted() {
        let cache = ModuleCache::new();
        assert!(cache.is_empty());
        cache.get_or_insert_with("b.js", || record("b.js"));
        cache.get_or_insert_with("a.js", || record("a.js"));
        assert_eq!(cache.keys(), vec!["a.js", "b.js"]);
        assert_eq!(cache.get("b.js").map(|r| r.path().to_string()), Some("b.js".into()));
    }
}
