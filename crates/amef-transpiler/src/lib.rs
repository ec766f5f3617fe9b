// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # amef-transpiler
//!
//! Turns plain scripts that use `import`/`export` declarations into text a
//! host without a module loader can run, plus the out-of-band dependency
//! and export information a loader needs.
//!
//! ## Pipeline
//!
//! 1. [`lexer::tokenize`] - lossless token stream with neighbour links
//! 2. [`classifier::classify`] - reserved words become keywords outside
//!    property position
//! 3. [`transform()`] - rewrites import/export/let/const in place
//!
//! ## Quick Start
//!
//! ```rust
//! use amef_transpiler::transform;
//!
//! let out = transform("import { h } from './dom.js';\nexport const app = h();").unwrap();
//! assert_eq!(out.export_names(), vec!["app"]);
//! assert!(out.imports.contains_key("./dom.js"));
//! assert_eq!(out.script, "\n var app /* exported */ = h();");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod classifier;
pub mod error;
pub mod lexer;
pub mod transform;

// Re-exports for convenience
pub use classifier::{classify, is_reserved};
pub use error::{LiteralKind, Result, TranspileError};
pub use lexer::{tokenize, NumberKind, Token, TokenId, TokenKind, TokenStream};
pub use transform::{
    transform, transform_with, Binding, Export, ImportMap, TransformOptions, TransformOutput,
    DEFAULT_EXPORT,
};
