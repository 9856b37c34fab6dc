use tracing::trace;

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::model::{Address, Instruction, Operand, ResolvedBranch};
use crate::services::ResolveError;

/// Number of candidate targets shown for an ambiguous branch.
pub const DEFAULT_PREVIEW_LIMIT: usize = 3;

/// Picks the concrete target of a branch operand from its CFG successors.
pub struct BranchTargetResolver<'a> {
    preview_limit: usize,
    diagnostics: &'a dyn DiagnosticSink,
}

impl<'a> BranchTargetResolver<'a> {
    /// `preview_limit` caps the candidates listed for an ambiguous branch.
    pub fn new(preview_limit: usize, diagnostics: &'a dyn DiagnosticSink) -> Self {
        Self { preview_limit, diagnostics }
    }

    pub fn preview_limit(&self) -> usize {
        self.preview_limit
    }

    /// Resolve operand `index` of a branch instruction.
    pub fn resolve_for(
        &self,
        insn: &Instruction,
        index: usize,
        candidates: &[Address],
    ) -> Result<ResolvedBranch, ResolveError> {
        if !insn.is_branch() {
            return Err(ResolveError::NotABranch(insn.address));
        }
        let operand = insn
            .operands
            .get(index)
            .ok_or(ResolveError::OperandOutOfRange { address: insn.address, index })?;
        Ok(self.resolve(operand, candidates))
    }

    /// Resolve `operand` against `candidates`.
    ///
    /// Duplicate candidates are collapsed, keeping the first occurrence. A
    /// single target is only reported when it is unambiguous; otherwise the
    /// first `preview_limit` candidates are returned as a preview.
    pub fn resolve(&self, operand: &Operand, candidates: &[Address]) -> ResolvedBranch {
        let candidates = dedup_in_order(candidates);
        match candidates.as_slice() {
            [] => return ResolvedBranch::Unresolved,
            [only] => return ResolvedBranch::SingleTarget { target: *only },
            _ => {}
        }

        if let Some(imm) = operand.immediate() {
            if candidates.contains(&imm) {
                trace!(address = imm, "branch target matched immediate");
                return ResolvedBranch::SingleTarget { target: imm };
            }
        }

        if let Some(target) = match_rendered(operand.text(), &candidates) {
            trace!(address = target, "branch target matched rendered text");
            return ResolvedBranch::SingleTarget { target };
        }

        self.diagnostics.report(Diagnostic::AmbiguousBranchTarget {
            operand: operand.text().to_string(),
            candidates: candidates.len(),
        });
        ResolvedBranch::MultipleTargets {
            preview: candidates.iter().copied().take(self.preview_limit).collect(),
            truncated: candidates.len() > self.preview_limit,
        }
    }
}

fn dedup_in_order(candidates: &[Address]) -> Vec<Address> {
    let mut unique = Vec::with_capacity(candidates.len());
    for &candidate in candidates {
        if !unique.contains(&candidate) {
            unique.push(candidate);
        }
    }
    unique
}

/// First candidate whose hex rendering (bare or `0x`-prefixed) equals `rendered`.
fn match_rendered(rendered: &str, candidates: &[Address]) -> Option<Address> {
    let rendered = rendered.trim().to_ascii_lowercase();
    candidates.iter().copied().find(|candidate| {
        rendered == format!("{candidate:x}") || rendered == format!("{candidate:#x}")
    })
}

/// Render a target preview as `[ 401000h, 402000h ]`.
///
/// Returns `None` when there is nothing to show.
pub fn format_branch_preview(targets: &[Address]) -> Option<String> {
    if targets.is_empty() {
        return None;
    }
    let items: Vec<String> = targets.iter().map(|t| format!("{t:x}h")).collect();
    Some(format!("[ {} ]", items.join(", ")))
}
