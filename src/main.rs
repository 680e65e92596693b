// Copyright 2025 the Scopeview Authors
// SPDX-License-Identifier: Apache-2.0

//! Replay a gesture script through a scope grid and log what it does

use anyhow::{Context, Result, bail};
use scopeview::ViewportConfig;
use scopeview::replay::{self, Script};
use std::path::PathBuf;

const USAGE: &str = "usage: scopeview <script.json> [--config <viewport.toml>]";

fn main() -> Result<()> {
    scopeview::init_tracing();

    let (script_path, config_path) = parse_args(std::env::args().skip(1))?;
    let config = match &config_path {
        Some(path) => ViewportConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ViewportConfig::default(),
    };
    let text = std::fs::read_to_string(&script_path)
        .with_context(|| format!("reading script {}", script_path.display()))?;
    let script = Script::from_json(&text)
        .with_context(|| format!("parsing script {}", script_path.display()))?;

    tracing::info!(
        script = %script_path.display(),
        events = script.events.len(),
        markers = script.markers.len(),
        "replaying"
    );
    let outcome = replay::run(&script, config).context("replay failed")?;

    for axis in [outcome.divisions.horizontal, outcome.divisions.vertical] {
        tracing::info!(
            per_division = %axis.format(axis.per_division()),
            offset = %axis.format(axis.offset),
            "final division"
        );
    }
    tracing::info!(
        emitted = outcome.events.len(),
        unclaimed = outcome.unclaimed,
        "replay finished"
    );
    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<(PathBuf, Option<PathBuf>)> {
    let mut script = None;
    let mut config = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let Some(path) = args.next() else {
                    bail!("--config needs a path\n{USAGE}");
                };
                config = Some(PathBuf::from(path));
            }
            "-h" | "--help" => bail!(USAGE),
            _ if script.is_none() => script = Some(PathBuf::from(arg)),
            _ => bail!("unexpected argument `{arg}`\n{USAGE}"),
        }
    }
    let Some(script) = script else {
        bail!(USAGE);
    };
    Ok((script, config))
}
