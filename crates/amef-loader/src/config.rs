// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Loader configuration.

use amef_transpiler::TransformOptions;
use serde::{Deserialize, Serialize};

/// Configuration for a [`ModuleContext`](crate::ModuleContext).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Identifier of the export object inside a module body
    pub exports_ident: String,

    /// Identifier of the dependency-exports table a wrapper reads from
    pub imports_ident: String,

    /// Referrer used for top-level imports
    pub default_referrer: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            exports_ident: "exports".to_string(),
            imports_ident: "__imports__".to_string(),
            default_referrer: ".".to_string(),
        }
    }
}

impl LoaderConfig {
    /// Options for the rewrite pass matching this configuration.
    pub fn transform_options(&self) -> TransformOptions {
        TransformOptions {
            exports_ident: self.exports_ident.clone(),
        }
    }
}
