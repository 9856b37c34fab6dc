use tracing::debug;

use crate::arch::{registers_alias, RegisterFile};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::index::{AccessLookup, Candidate};
use crate::model::{Address, BindingResult, Operand, OperandKind, OperandPosition};
use crate::services::ResolveError;

/// Picks the recovered variable a register or memory operand denotes.
///
/// Holds only borrowed, read-only collaborators, so one binder can be shared
/// across threads for a whole function.
pub struct VariableBinder<'a> {
    accesses: &'a dyn AccessLookup,
    registers: &'a dyn RegisterFile,
    diagnostics: &'a dyn DiagnosticSink,
}

impl<'a> VariableBinder<'a> {
    pub fn new(
        accesses: &'a dyn AccessLookup,
        registers: &'a dyn RegisterFile,
        diagnostics: &'a dyn DiagnosticSink,
    ) -> Self {
        Self { accesses, registers, diagnostics }
    }

    /// Bind `operand` at instruction `at`.
    ///
    /// Constant operands are a caller error and return
    /// `ResolveError::UnbindableOperand`.
    pub fn bind(
        &self,
        operand: &Operand,
        at: Address,
        position: OperandPosition,
    ) -> Result<BindingResult, ResolveError> {
        let kind = operand.kind();
        let storage = kind.storage_classes();
        if storage.is_empty() {
            return Err(ResolveError::UnbindableOperand { kind });
        }

        let candidates = self.accesses.candidates_at(at, storage);
        if candidates.is_empty() {
            return Ok(BindingResult::NoBinding);
        }

        let picked = match kind {
            OperandKind::Constant => None,
            OperandKind::Memory => {
                if candidates.len() > 1 {
                    self.diagnostics.report(Diagnostic::MultipleMemoryBindings {
                        address: at,
                        count: candidates.len(),
                    });
                }
                candidates.first().cloned()
            }
            OperandKind::Register => operand
                .register_id()
                .and_then(|reg| self.pick_register(reg, &candidates, at, position)),
        };

        Ok(match picked {
            Some(candidate) => self.bound(candidate, at),
            None => BindingResult::NoBinding,
        })
    }

    fn pick_register<'c>(
        &self,
        reg: &str,
        candidates: &[Candidate<'c>],
        at: Address,
        position: OperandPosition,
    ) -> Option<Candidate<'c>> {
        let matches_reg = |candidate: &Candidate<'_>| {
            candidate
                .variable
                .reg
                .as_deref()
                .is_some_and(|var_reg| registers_alias(self.registers, reg, var_reg))
        };

        if let [only] = candidates {
            return matches_reg(only).then(|| only.clone());
        }

        let wanted = position.access_type();
        let found = candidates.iter().find(|candidate| {
            matches_reg(*candidate) && self.accesses.has_access(&candidate.variable.ident, at, wanted)
        });
        if found.is_none() {
            debug!(
                address = at,
                register = reg,
                ?position,
                "no variable with a {wanted:?} access among {} candidates",
                candidates.len()
            );
        }
        found.cloned()
    }

    fn bound(&self, candidate: Candidate<'_>, at: Address) -> BindingResult {
        let byte_offset = match candidate.offset {
            Some(offset) => offset,
            None => {
                self.diagnostics.report(Diagnostic::MissingVariableOffset {
                    address: at,
                    ident: candidate.variable.ident.clone(),
                });
                0
            }
        };
        BindingResult::Bound { variable: candidate.variable.clone(), byte_offset }
    }
}
