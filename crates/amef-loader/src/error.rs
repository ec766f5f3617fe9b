// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Error types for the module loader

use amef_transpiler::TranspileError;
use std::sync::Arc;
use thiserror::Error;

/// Result type for loader operations
pub type Result<T> = std::result::Result<T, LoaderError>;

/// Settled outcome of a module load. The error is shared so every importer
/// waiting on the same module observes the same rejection.
pub type LoadResult = std::result::Result<serde_json::Value, Arc<LoaderError>>;

/// Errors that can occur while loading a module
#[derive(Debug, Error)]
pub enum LoaderError {
    /// No handler is registered for the path's suffix
    #[error("Error importing '{path}': no loader is registered for its suffix")]
    UnknownLoaderSuffix {
        /// Resolved module path
        path: String,
    },

    /// A module's export slot was written twice
    #[error("Error importing '{path}': the module exported more than once")]
    DuplicateExport {
        /// Resolved module path
        path: String,
    },

    /// Tokenizing or rewriting the module's script failed
    #[error("Error transpiling '{path}': {source}")]
    Transpile {
        /// Resolved module path
        path: String,
        /// Underlying transpiler error
        #[source]
        source: TranspileError,
    },

    /// A component's default export cannot carry a template
    #[error("Error importing '{path}': the component's default export is not an object")]
    InvalidComponent {
        /// Resolved module path
        path: String,
    },

    /// Fetch, execution or document failure reported by the host, as-is
    #[error(transparent)]
    Host(#[from] anyhow::Error),
}

impl LoaderError {
    /// Create a transpile error for a module
    pub fn transpile(path: impl Into<String>, source: TranspileError) -> Self {
        Self::Transpile {
            path: path.into(),
            source,
        }
    }
}
