// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! CLI argument parsing for amef.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// amef - tokenize, rewrite and trace import/export scripts
#[derive(Parser, Debug)]
#[command(name = "amef")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a config file (default: ./amef.toml if present)
    #[arg(short, long, global = true, env = "AMEF_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the classified token stream of a script
    #[command(alias = "tok")]
    Tokens(TokensArgs),

    /// Print the rewritten script, its imports and its exports
    #[command(alias = "t")]
    Transpile(TranspileArgs),

    /// Load a module graph from disk and print each step in order
    Trace(TraceArgs),

    /// Start an interactive transpile session
    Repl,
}

#[derive(Args, Debug)]
pub struct TokensArgs {
    /// Script to tokenize
    pub file: PathBuf,

    /// Include whitespace tokens
    #[arg(long)]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct TranspileArgs {
    /// Scripts to rewrite
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct TraceArgs {
    /// Entry module, relative to the root
    pub entry: String,

    /// Directory module paths are resolved against
    #[arg(short, long)]
    pub root: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transpile() {
        let cli = Cli::parse_from(["amef", "transpile", "app.js", "lib.js", "--json"]);
        match cli.command {
            Some(Commands::Transpile(args)) => {
                assert_eq!(args.files, vec![PathBuf::from("app.js"), PathBuf::from("lib.js")]);
                assert!(args.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_trace_with_global_flags() {
        let cli = Cli::parse_from(["amef", "trace", "main.js", "--root", "site", "-v"]);
        assert!(cli.verbose);
        match cli.command {
            Some(Commands::Trace(args)) => {
                assert_eq!(args.entry, "main.js");
                assert_eq!(args.root, Some(PathBuf::from("site")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
