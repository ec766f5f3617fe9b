// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Stylesheet modules

use super::loader::ModuleContext;
use super::registry::ModuleHandler;
use crate::error::{LoadResult, LoaderError};
use async_trait::async_trait;
use tracing::debug;

/// Loads `.css` modules by asking the host to inject a stylesheet reference.
/// The module's content is whatever the host resolves with.
#[derive(Debug, Clone, Copy, Default)]
pub struct StylesheetHandler;

#[async_trait]
impl ModuleHandler for StylesheetHandler {
    async fn load(&self, ctx: &ModuleContext, path: &str) -> LoadResult {
        debug!(path, "injecting stylesheet");
        let content = ctx
            .host()
            .inject_stylesheet(path)
            .await
            .map_err(LoaderError::Host)?;
        Ok(content)
    }
}
