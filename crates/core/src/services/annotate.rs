//! Per-instruction annotation for a disassembly listing.
//!
//! Branch operands go through `BranchTargetResolver`, everything else through
//! `VariableBinder`. The result carries the labels a listing renders next to
//! the operand text.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::{
    Address, BindingResult, Instruction, Operand, OperandKind, OperandPosition, ResolvedBranch,
};
use crate::services::branch::format_branch_preview;
use crate::services::highlight::ResolvedOperandView;
use crate::services::{BranchTargetResolver, ResolveError, VariableBinder};

/// Everything needed to annotate instructions of one function.
pub struct ListingContext<'a> {
    pub binder: VariableBinder<'a>,
    pub branches: BranchTargetResolver<'a>,
    /// Entry addresses of known functions.
    pub function_entries: &'a BTreeSet<Address>,
    /// When false, operands are left unbound.
    pub show_variables: bool,
}

/// One operand of a listing with its binding, branch resolution and display labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedOperand {
    pub address: Address,
    pub index: usize,
    pub kind: OperandKind,
    pub text: String,
    pub binding: BindingResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<ResolvedBranch>,
    /// `<ident>` of the bound variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ident_label: Option<String>,
    /// Variable-based replacement for the operand's value, e.g. `buf[8]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_label: Option<String>,
    /// `[ 401000h, ... ]` for branches without a single target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_preview: Option<String>,
    #[serde(default)]
    pub is_target_function: bool,
}

impl AnnotatedOperand {
    fn plain(insn: &Instruction, index: usize, operand: &Operand) -> Self {
        Self {
            address: insn.address,
            index,
            kind: operand.kind(),
            text: operand.text().to_string(),
            binding: BindingResult::NoBinding,
            branch: None,
            ident_label: None,
            value_label: None,
            branch_preview: None,
            is_target_function: false,
        }
    }

    /// View used for highlight comparisons.
    pub fn view(&self) -> ResolvedOperandView {
        ResolvedOperandView::new(self.text.clone(), self.binding.clone())
    }
}

/// Annotate every operand of `insn`.
///
/// `candidates` are the CFG successors of `insn`; they are ignored for
/// non-branch instructions.
pub fn annotate_instruction(
    ctx: &ListingContext<'_>,
    insn: &Instruction,
    candidates: &[Address],
) -> Result<Vec<AnnotatedOperand>, ResolveError> {
    let branch_index = insn.branch_operand_index();
    let mut annotated = Vec::with_capacity(insn.operands.len());

    for (index, operand) in insn.operands.iter().enumerate() {
        let mut entry = AnnotatedOperand::plain(insn, index, operand);

        if Some(index) == branch_index {
            let resolved = ctx.branches.resolve_for(insn, index, candidates)?;
            entry.is_target_function =
                candidates.first().is_some_and(|first| ctx.function_entries.contains(first));
            if let ResolvedBranch::MultipleTargets { preview, .. } = &resolved {
                entry.branch_preview = format_branch_preview(preview);
            }
            entry.branch = Some(resolved);
        } else if ctx.show_variables && operand.kind() != OperandKind::Constant {
            let position = OperandPosition::from_index(index);
            entry.binding = ctx.binder.bind(operand, insn.address, position)?;
            if let BindingResult::Bound { variable, byte_offset } = &entry.binding {
                entry.ident_label = Some(format!("<{}>", variable.ident));
                entry.value_label = Some(value_label(operand.kind(), &variable.name, *byte_offset));
            }
        }

        annotated.push(entry);
    }

    Ok(annotated)
}

fn value_label(kind: OperandKind, name: &str, offset: i64) -> String {
    match kind {
        OperandKind::Memory if offset == 0 => name.to_string(),
        OperandKind::Memory => format!("{name}[{offset}]"),
        OperandKind::Register | OperandKind::Constant => String::new(),
    }
}
