// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # amef-loader
//!
//! An asynchronous module loader for browser scripts.
//!
//! Modules are requested by path and loaded by a handler chosen from the
//! path's suffix:
//!
//! - `.js` scripts, rewritten by `amef-transpiler` and executed by the host
//! - `.css` stylesheets, injected by the host
//! - `.html` components bundling a script, a template and styles
//!
//! Each resolved path is loaded at most once. Concurrent importers share
//! the in-flight load, and its content is sealed exactly once.
//!
//! The loader performs no I/O of its own. Fetching, execution and document
//! changes go through a [`Host`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use amef_loader::ModuleContext;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let ctx = ModuleContext::new(Arc::new(BrowserHost::default()));
//!     let exports = ctx.import("./app/main.js").await?;
//!     println!("{exports}");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod host;
pub mod module_system;

// Re-exports
pub use config::LoaderConfig;
pub use error::{LoadResult, LoaderError, Result};
pub use host::{DependencyExports, Host};
pub use module_system::{
    ExportSlot, LoaderRegistry, ModuleCache, ModuleContext, ModuleFuture, ModuleHandler,
    ModuleRecord, SlotState, Wrapper, WrapperBinding, resolve_path,
};
