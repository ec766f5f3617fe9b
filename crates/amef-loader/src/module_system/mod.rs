// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Browser module system implementation
//!
//! ## Loading
//! - `import()` keyed by resolved path, one load per path
//! - Suffix-keyed loaders: `.js` scripts, `.css` stylesheets, `.html` components
//! - Relative specifiers resolved against the importing module
//!
//! ## Scripts
//! - `import` / `export` rewritten by `amef-transpiler`
//! - `/// <amd-dependency />` markers
//! - Executed by the host as a [`Wrapper`]

mod cache;
mod loader;
pub mod markup;
mod registry;
mod resolver;
pub mod script;
mod stylesheet;
mod wrapper;

pub use cache::{ExportSlot, ModuleCache, ModuleFuture, ModuleRecord, SlotState};
pub use loader::ModuleContext;
pub use markup::{Component, ComponentHandler};
pub use registry::{LoaderRegistry, ModuleHandler};
pub use resolver::{resolve_path, suffix_of};
pub use script::{DependencyMarker, ScriptHandler, dependency_markers};
pub use stylesheet::StylesheetHandler;
pub use wrapper::{Wrapper, WrapperBinding};
