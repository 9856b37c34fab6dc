//! On-disk snapshot of one function's upstream analysis results.
//!
//! A snapshot bundles what the resolvers consume: decoded instructions,
//! recovered variables with their access records, CFG successor candidates
//! for branches, plus the function table and covered blocks used for
//! location labels.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::arch::{ArchError, RegisterMap};
use crate::config::{load_document, ConfigError, ResolverConfig};
use crate::coverage::{CoveredBlocks, FunctionEntry, FunctionTable};
use crate::diagnostics::DiagnosticSink;
use crate::index::{AccessIndex, IndexError};
use crate::model::{Address, Instruction, Variable, VariableAccess};
use crate::services::{
    annotate_instruction, AnnotatedOperand, BranchTargetResolver, ListingContext, ResolveError,
    VariableBinder,
};

/// Failures loading, validating or annotating a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Load(#[from] ConfigError),
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error(transparent)]
    Arch(#[from] ArchError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("Instruction {0:#x} appears more than once")]
    DuplicateInstruction(Address),
    #[error("Branch targets given for {0:#x}, which is not a branch instruction in the snapshot")]
    TargetsForNonBranch(Address),
}

/// CFG successors recorded for one branch instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchTargets {
    pub address: Address,
    #[serde(default)]
    pub targets: Vec<Address>,
}

/// A covered block as stored in the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSpan {
    pub start: Address,
    pub size: u64,
}

/// Everything upstream analysis recorded for one function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingSnapshot {
    pub arch: String,
    #[serde(default)]
    pub functions: Vec<FunctionEntry>,
    pub instructions: Vec<Instruction>,
    #[serde(default)]
    pub variables: Vec<Variable>,
    #[serde(default)]
    pub accesses: Vec<VariableAccess>,
    #[serde(default)]
    pub branch_targets: Vec<BranchTargets>,
    #[serde(default)]
    pub covered_blocks: Vec<BlockSpan>,
}

impl ListingSnapshot {
    /// Load and validate a snapshot from YAML or JSON.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let snapshot: Self = load_document(path)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Reject duplicate instruction addresses and targets on non-branches.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let mut branches = HashSet::new();
        let mut seen = HashSet::with_capacity(self.instructions.len());
        for insn in &self.instructions {
            if !seen.insert(insn.address) {
                return Err(SnapshotError::DuplicateInstruction(insn.address));
            }
            if insn.is_branch() {
                branches.insert(insn.address);
            }
        }
        if let Some(stray) = self.branch_targets.iter().find(|t| !branches.contains(&t.address)) {
            return Err(SnapshotError::TargetsForNonBranch(stray.address));
        }
        Ok(())
    }

    pub fn instruction(&self, address: Address) -> Option<&Instruction> {
        self.instructions.iter().find(|insn| insn.address == address)
    }

    /// Build the access index over the snapshot's variables.
    pub fn access_index(&self) -> Result<AccessIndex, SnapshotError> {
        Ok(AccessIndex::build(self.variables.clone(), &self.accesses)?)
    }

    /// Register file for `arch_override`, or for the snapshot's own arch.
    pub fn register_map(&self, arch_override: Option<&str>) -> Result<RegisterMap, SnapshotError> {
        Ok(RegisterMap::for_arch(arch_override.unwrap_or(&self.arch))?)
    }

    /// Branch candidates keyed by instruction address.
    pub fn branch_candidates(&self) -> HashMap<Address, Vec<Address>> {
        self.branch_targets.iter().map(|t| (t.address, t.targets.clone())).collect()
    }

    pub fn function_table(&self) -> FunctionTable {
        FunctionTable::new(self.functions.iter().cloned())
    }

    pub fn function_entries(&self) -> BTreeSet<Address> {
        self.functions.iter().map(|f| f.address).collect()
    }

    pub fn covered(&self) -> CoveredBlocks {
        self.covered_blocks.iter().map(|b| (b.start, b.size)).collect()
    }

    /// Annotate every instruction, in listing order.
    ///
    /// Anomalies are reported to `diagnostics`; resolution itself only fails
    /// on malformed input.
    pub fn annotate(
        &self,
        config: &ResolverConfig,
        diagnostics: &dyn DiagnosticSink,
    ) -> Result<Vec<AnnotatedOperand>, SnapshotError> {
        let index = self.access_index()?;
        let registers = self.register_map(config.arch.as_deref())?;
        let entries = self.function_entries();
        let candidates = self.branch_candidates();
        let ctx = ListingContext {
            binder: VariableBinder::new(&index, &registers, diagnostics),
            branches: BranchTargetResolver::new(config.preview_limit, diagnostics),
            function_entries: &entries,
            show_variables: config.show_variables,
        };

        let mut annotated = Vec::new();
        for insn in &self.instructions {
            let targets = candidates.get(&insn.address).map(Vec::as_slice).unwrap_or_default();
            annotated.extend(annotate_instruction(&ctx, insn, targets)?);
        }
        Ok(annotated)
    }
}
