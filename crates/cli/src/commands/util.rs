use std::path::Path;

use anyhow::{Context, Result};
use opbind_core::model::ResolvedBranch;
use opbind_core::services::AnnotatedOperand;
use opbind_core::snapshot::ListingSnapshot;

/// Load and validate a listing snapshot (YAML or JSON by extension).
pub fn load_snapshot(path: &Path) -> Result<ListingSnapshot> {
    ListingSnapshot::load(path)
        .with_context(|| format!("Failed to load snapshot {}", path.display()))
}

/// One-line human rendering of an annotated operand.
///
/// `0x401000 [1] dword ptr [rbp - 4] <s_4> argc`
pub fn format_operand_line(operand: &AnnotatedOperand) -> String {
    let mut line = format!("{:#x} [{}] {}", operand.address, operand.index, operand.text);
    if let Some(ident) = &operand.ident_label {
        line.push(' ');
        line.push_str(ident);
    }
    if let Some(value) = operand.value_label.as_deref().filter(|v| !v.is_empty()) {
        line.push(' ');
        line.push_str(value);
    }
    match &operand.branch {
        Some(ResolvedBranch::SingleTarget { target }) => {
            line.push_str(&format!(" -> {target:#x}"));
        }
        Some(ResolvedBranch::MultipleTargets { truncated, .. }) => {
            line.push_str(" -> ");
            line.push_str(operand.branch_preview.as_deref().unwrap_or("[ ]"));
            if *truncated {
                line.push_str(" ...");
            }
        }
        Some(ResolvedBranch::Unresolved) => line.push_str(" -> ?"),
        None => {}
    }
    if operand.is_target_function {
        line.push_str(" (function)");
    }
    line
}
