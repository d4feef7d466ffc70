use crate::cli::Cli;
use crate::config::{load_config, ConverterConfig};
use crate::diagnostics::Diagnostic;
use crate::source::loader::load_rulesets;
use crate::target::writer::{write_outputs, write_source_dump};
use crate::translate::assemble::convert;
use anyhow::{Context, Result};
use std::path::Path;

/// Counts reported at the end of a run.
#[derive(Debug, Default)]
pub struct Summary {
    pub rulesets: usize,
    pub converted: usize,
    pub skipped: usize,
    pub written: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// Build the effective configuration: config file first, then flags.
pub fn resolve_config(cli: &Cli) -> Result<ConverterConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ConverterConfig::default(),
    };
    if let Some(output) = &cli.output {
        config.output = output.clone();
    }
    if let Some(prefix) = &cli.source_prefix {
        config.source_prefix = prefix.clone();
    }
    if let Some(dir) = &cli.dump_source {
        config.dump_source = Some(dir.clone());
    }
    if let Some(report) = &cli.report {
        config.report = Some(report.clone());
    }
    Ok(config)
}

/// Load, translate and write every ruleset under `windup_root`.
///
/// Per-file and per-rule problems end up in the summary's diagnostics; only
/// a missing root or an unwritable report abort the run.
pub fn run_conversion(windup_root: &Path, config: &ConverterConfig) -> Result<Summary> {
    if !windup_root.is_dir() {
        anyhow::bail!(
            "Windup location {} is not a directory",
            windup_root.display()
        );
    }

    let loaded = load_rulesets(windup_root, &config.source_prefix)
        .with_context(|| format!("Failed to load rulesets from {}", windup_root.display()))?;
    let mut diagnostics = loaded.diagnostics;

    if let Some(dir) = &config.dump_source {
        let dump_failures = write_source_dump(&loaded.rulesets, &config.source_prefix, dir);
        diagnostics.extend(dump_failures);
    }

    let conversion = convert(&loaded.rulesets, &config.destination());
    diagnostics.extend(conversion.diagnostics);

    let write_failures = write_outputs(&conversion.outputs);
    let written = conversion.outputs.len() - write_failures.len();
    diagnostics.extend(write_failures);

    for diagnostic in &diagnostics {
        tracing::warn!("{}", diagnostic);
    }

    if let Some(report) = &config.report {
        let json = serde_json::to_string_pretty(&diagnostics)?;
        std::fs::write(report, json)
            .with_context(|| format!("Failed to write report file: {}", report.display()))?;
    }

    Ok(Summary {
        rulesets: loaded.rulesets.len(),
        converted: conversion.converted,
        skipped: conversion.skipped,
        written,
        diagnostics,
    })
}
