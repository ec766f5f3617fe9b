// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Configuration management for amef.
//!
//! ```toml
//! root = "site"
//!
//! [loader]
//! exports_ident = "exports"
//! imports_ident = "__imports__"
//! default_referrer = "."
//! ```

use amef_loader::LoaderConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "amef.toml";

/// Configuration for amef.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory module paths are resolved against
    pub root: Option<PathBuf>,

    /// Loader settings
    pub loader: LoaderConfig,
}

impl Config {
    /// Load `explicit` if given, otherwise `amef.toml` in the working
    /// directory if it exists, otherwise the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None if Path::new(CONFIG_FILE).exists() => Self::from_file(Path::new(CONFIG_FILE)),
            None => Ok(Self::default()),
        }
    }

    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Root directory, falling back to the working directory.
    pub fn root(&self) -> PathBuf {
        self.root.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "root = \"site\"\n\n[loader]\nexports_ident = \"module_exports\""
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.root(), PathBuf::from("site"));
        assert_eq!(config.loader.exports_ident, "module_exports");
        assert_eq!(config.loader.imports_ident, "__imports__");
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read config"));
    }

    #[test]
    fn test_invalid_toml_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[loader\n").unwrap();
        assert!(Config::from_file(file.path()).is_err());
    }

    #[test]
    fn test_default_root() {
        assert_eq!(Config::default().root(), PathBuf::from("."));
    }
}
