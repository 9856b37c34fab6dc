use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use opbind_core::diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, TracingSink};
use opbind_core::services::AnnotatedOperand;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::commands::util::{format_operand_line, load_snapshot};
use crate::{load_config, sha256_file};

/// Options for `opbind resolve`.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub config: Option<std::path::PathBuf>,
    pub preview_limit: Option<usize>,
    pub no_variables: bool,
}

/// Everything a resolution pass produced, ready for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveReport {
    pub snapshot: String,
    /// Results are only valid for the snapshot with this hash.
    pub snapshot_hash: String,
    pub generated_at: String,
    pub arch: String,
    pub operands: Vec<AnnotatedOperand>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Annotate every operand of the snapshot and collect diagnostics.
pub fn build_resolve_report(snapshot_path: &Path, options: &ResolveOptions) -> Result<ResolveReport> {
    let mut config = load_config(options.config.as_deref())?;
    if let Some(limit) = options.preview_limit {
        config.preview_limit = limit;
    }
    if options.no_variables {
        config.show_variables = false;
    }
    config.validate().context("Invalid resolver options")?;

    let snapshot = load_snapshot(snapshot_path)?;
    debug!(
        path = %snapshot_path.display(),
        instructions = snapshot.instructions.len(),
        preview_limit = config.preview_limit,
        show_variables = config.show_variables,
        "loaded snapshot"
    );
    let sink = CollectingSink::new();
    let operands = snapshot
        .annotate(&config, &sink)
        .with_context(|| format!("Failed to resolve operands in {}", snapshot_path.display()))?;
    info!(
        "resolved {} operands with {} diagnostics",
        operands.len(),
        sink.diagnostics().len()
    );

    Ok(ResolveReport {
        snapshot: snapshot_path.display().to_string(),
        snapshot_hash: sha256_file(snapshot_path)?,
        generated_at: Utc::now().to_rfc3339(),
        arch: config.arch.unwrap_or(snapshot.arch),
        operands,
        diagnostics: sink.take(),
    })
}

/// Resolve every operand in a snapshot and print the result.
pub fn resolve_command(snapshot_path: &Path, options: &ResolveOptions, json: bool) -> Result<()> {
    let report = build_resolve_report(snapshot_path, options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    // Human mode surfaces anomalies through the log instead of stdout.
    for diagnostic in &report.diagnostics {
        TracingSink.report(diagnostic.clone());
    }

    println!("Operands ({}) [{}]:", report.operands.len(), report.arch);
    if report.operands.is_empty() {
        println!("  (none)");
        return Ok(());
    }
    for operand in &report.operands {
        println!("  {}", format_operand_line(operand));
    }
    if !report.diagnostics.is_empty() {
        println!("Diagnostics: {}", report.diagnostics.len());
    }

    Ok(())
}
