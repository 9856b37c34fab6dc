use std::path::Path;

use anyhow::{anyhow, Context, Result};
use opbind_core::diagnostics::TracingSink;
use opbind_core::services::{AnnotatedOperand, HighlightMode, OperandSelection};
use tracing::debug;

use crate::commands::util::{format_operand_line, load_snapshot};
use crate::load_config;

/// Operands equivalent to the operand at `(address, index)`, the selected one included.
pub fn find_equivalent_operands(
    snapshot_path: &Path,
    config_path: Option<&Path>,
    selected: (u64, usize),
    mode: Option<HighlightMode>,
) -> Result<Vec<AnnotatedOperand>> {
    let config = load_config(config_path)?;
    let snapshot = load_snapshot(snapshot_path)?;
    let operands = snapshot
        .annotate(&config, &TracingSink)
        .with_context(|| format!("Failed to resolve operands in {}", snapshot_path.display()))?;

    let (address, index) = selected;
    let target = operands
        .iter()
        .find(|op| op.address == address && op.index == index)
        .ok_or_else(|| anyhow!("No operand {} at {:#x} in {}", index, address, snapshot_path.display()))?;

    let mut selection = OperandSelection::new(config.highlight_mode);
    if let Some(mode) = mode {
        selection.set_mode(mode);
    }
    selection.toggle(target.view());
    debug!(address, index, mode = ?selection.mode(), text = %target.text, "selected operand");

    let matches: Vec<_> =
        operands.into_iter().filter(|op| selection.is_highlighted(&op.view())).collect();
    debug!("{} of the snapshot's operands are highlighted", matches.len());
    Ok(matches)
}

/// List every operand highlighted together with the selected one.
pub fn highlight_command(
    snapshot_path: &Path,
    config_path: Option<&Path>,
    selected: (u64, usize),
    mode: Option<HighlightMode>,
    json: bool,
) -> Result<()> {
    let matches = find_equivalent_operands(snapshot_path, config_path, selected, mode)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
        return Ok(());
    }

    println!("Highlighted operands ({}):", matches.len());
    for operand in &matches {
        println!("  {}", format_operand_line(operand));
    }
    Ok(())
}
