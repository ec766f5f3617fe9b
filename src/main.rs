// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! amef - import/export scripts for hosts without a module loader
//!
//! This is the main entry point for the amef CLI/REPL.
//!
//! ## Features
//!
//! - Token and rewrite inspection for single scripts
//! - Dry-run tracing of a module graph on disk
//! - Interactive REPL with highlighting and history

mod cli;
mod commands;
mod config;
mod host;
mod repl;

use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use owo_colors::OwoColorize;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point - uses tokio runtime for async operations.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "amef=debug,amef_loader=debug,amef_transpiler=debug"
    } else {
        "amef=warn,amef_loader=warn,amef_transpiler=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Tokens(args)) => commands::tokens(&args),
        Some(Commands::Transpile(args)) => commands::transpile(&args, &config),
        Some(Commands::Trace(args)) => commands::trace(&args, &config).await,
        Some(Commands::Repl) | None => run_repl(&config),
    }
}

/// Start the interactive REPL
fn run_repl(config: &Config) -> anyhow::Result<()> {
    let mut repl = repl::Repl::new(config.loader.transform_options())?;
    repl.run()?;
    Ok(())
}
