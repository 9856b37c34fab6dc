//! Non-fatal anomaly reports raised while resolving operands.
//!
//! Resolution always completes; these only surface upstream data that looked
//! wrong so the caller can decide whether to show it.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::model::Address;

/// A non-fatal anomaly noticed while resolving operands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// More than one memory variable claims the same instruction.
    MultipleMemoryBindings { address: Address, count: usize },
    /// A branch operand matched none of its candidate targets.
    AmbiguousBranchTarget { operand: String, candidates: usize },
    /// A variable was bound but its access record carried no offset.
    MissingVariableOffset { address: Address, ident: String },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::MultipleMemoryBindings { address, count } => {
                write!(f, "Instruction {address:#x} has {count} memory variable bindings")
            }
            Diagnostic::AmbiguousBranchTarget { operand, candidates } => write!(
                f,
                "Cannot determine branch target for operand \"{operand}\" among {candidates} candidates"
            ),
            Diagnostic::MissingVariableOffset { address, ident } => write!(
                f,
                "Variable {ident} bound at {address:#x} has no recorded offset; using 0"
            ),
        }
    }
}

/// Receiver for diagnostics.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Default sink: forwards everything to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::MultipleMemoryBindings { address, count } => {
                tracing::error!(address = *address, count = *count, "{diagnostic}");
            }
            Diagnostic::AmbiguousBranchTarget { .. } | Diagnostic::MissingVariableOffset { .. } => {
                tracing::warn!("{diagnostic}");
            }
        }
    }
}

/// Keeps every diagnostic for later inspection.
#[derive(Debug, Default)]
pub struct CollectingSink {
    collected: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        // A panic while holding the lock cannot leave the Vec half-written.
        self.collected.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of everything reported so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }

    /// Drain the collected diagnostics.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.lock())
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) {
        tracing::debug!("collected diagnostic: {diagnostic}");
        self.lock().push(diagnostic);
    }
}
