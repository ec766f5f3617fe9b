// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Subcommand implementations.

use crate::cli::{TokensArgs, TraceArgs, TranspileArgs};
use crate::config::Config;
use crate::host::{FsHost, HostEvent};
use amef_loader::ModuleContext;
use amef_transpiler::{
    TokenKind, TransformOptions, TransformOutput, classify, tokenize, transform_with,
};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// One line per token: offset, kind and lexeme.
pub fn token_lines(source: &str, include_whitespace: bool) -> Result<Vec<String>> {
    let mut stream = tokenize(source)?;
    classify(&mut stream);
    Ok(stream
        .iter()
        .filter(|(_, token)| include_whitespace || token.kind != TokenKind::Whitespace)
        .map(|(id, token)| {
            format!(
                "{:>6}  {:<16} {:?}",
                token.span.start,
                token.kind.to_string(),
                stream.lexeme(id)
            )
        })
        .collect())
}

/// `amef tokens`
pub fn tokens(args: &TokensArgs) -> Result<()> {
    let source = read(&args.file)?;
    for line in token_lines(&source, args.all)? {
        println!("{line}");
    }
    Ok(())
}

/// Human-readable summary of a rewrite.
pub fn describe(output: &TransformOutput) -> String {
    let mut text = String::new();
    text.push_str(&output.script);
    if !output.script.ends_with('\n') {
        text.push('\n');
    }
    text.push_str("\n// imports\n");
    for (path, bindings) in &output.imports {
        let locals: Vec<&str> = bindings.iter().map(|b| b.local()).collect();
        text.push_str(&format!("//   {path}: [{}]\n", locals.join(", ")));
    }
    text.push_str("// exports\n");
    for name in output.export_names() {
        text.push_str(&format!("//   {name}\n"));
    }
    text
}

/// Reads and rewrites every file, in parallel, keeping argument order.
pub fn transpile_files(
    files: &[PathBuf],
    options: &TransformOptions,
) -> Result<Vec<(String, TransformOutput)>> {
    use rayon::prelude::*;

    let results: Vec<Result<(String, TransformOutput)>> = files
        .par_iter()
        .map(|file| {
            let source = read(file)?;
            let output = transform_with(&source, options)
                .with_context(|| format!("Failed to transpile {}", file.display()))?;
            Ok((file.display().to_string(), output))
        })
        .collect();
    results.into_iter().collect()
}

/// `amef transpile`
pub fn transpile(args: &TranspileArgs, config: &Config) -> Result<()> {
    let outputs = transpile_files(&args.files, &config.loader.transform_options())?;

    if args.json {
        let json = match outputs.as_slice() {
            [(_, output)] => serde_json::to_value(output)?,
            _ => {
                let mut by_file = serde_json::Map::new();
                for (name, output) in &outputs {
                    by_file.insert(name.clone(), serde_json::to_value(output)?);
                }
                serde_json::Value::Object(by_file)
            }
        };
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    for (name, output) in &outputs {
        if outputs.len() > 1 {
            println!("{}", format!("// {name}").bold());
        }
        print!("{}", describe(output));
    }
    Ok(())
}

/// `amef trace`
pub async fn trace(args: &TraceArgs, config: &Config) -> Result<()> {
    let root = args.root.clone().unwrap_or_else(|| config.root());
    let host = Arc::new(FsHost::new(root));
    info!(root = %host.root().display(), entry = %args.entry, "tracing module graph");

    let ctx = ModuleContext::with_config(host.clone(), config.loader.clone());
    let result = ctx.import(&args.entry).await;

    for event in host.events().await {
        match event {
            HostEvent::Fetch(path) => println!("{} {}", "fetch".dimmed(), path),
            HostEvent::Execute { path, wrapper } => {
                println!("{} {}", "execute".green().bold(), path.bold());
                println!("{}", wrapper.dimmed());
            }
            HostEvent::Stylesheet(href) => println!("{} {}", "stylesheet".cyan(), href),
            HostEvent::Style(css) => println!("{} {} bytes", "style".cyan(), css.len()),
        }
    }

    let exports = result?;
    println!("{} {}", "exports".yellow().bold(), exports);
    Ok(())
}
