//! Operand resolvers.
//!
//! - `binder`: operand -> recovered variable
//! - `branch`: branch operand -> target address
//! - `highlight`: "same thing" relation between two resolved operands
//! - `annotate`: drives the above over whole instructions

pub mod annotate;
pub mod binder;
pub mod branch;
pub mod highlight;

use thiserror::Error;

use crate::model::{Address, OperandKind};

pub use annotate::{annotate_instruction, AnnotatedOperand, ListingContext};
pub use binder::VariableBinder;
pub use branch::{format_branch_preview, BranchTargetResolver, DEFAULT_PREVIEW_LIMIT};
pub use highlight::{equivalent, HighlightMode, OperandSelection, ResolvedOperandView, SelectionChange};

/// Caller bugs at the resolver boundary.
///
/// Expected absence (no variable, no target) is never an error; it is a
/// `BindingResult::NoBinding` or `ResolvedBranch::Unresolved`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Cannot bind a {kind:?} operand to a variable")]
    UnbindableOperand { kind: OperandKind },
    #[error("Instruction {0:#x} is not a branch")]
    NotABranch(Address),
    #[error("Instruction {address:#x} has no operand {index}")]
    OperandOutOfRange { address: Address, index: usize },
}
