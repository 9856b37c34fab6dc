//! Core data model shared by the resolvers.
//!
//! Everything in here is produced upstream (instruction decode, variable
//! recovery, CFG construction) and only ever read by this crate:
//! - `Operand` / `Instruction`: decoded disassembly
//! - `Variable` / `VariableAccess`: recovered variables and their access records
//! - `BindingResult` / `ResolvedBranch`: per-operand resolution results

use serde::{Deserialize, Serialize};

/// Instruction or block address.
pub type Address = u64;

/// Raw register name as produced by the decoder (e.g. `eax`, `w0`).
pub type RegisterId = String;

/// Discriminant of an `Operand`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperandKind {
    Constant,
    Register,
    Memory,
}

impl OperandKind {
    /// Storage classes of the variables an operand of this kind can denote.
    ///
    /// Memory operands reach stack slots and globals alike. Constants never
    /// denote a variable, so they get an empty slice.
    pub fn storage_classes(self) -> &'static [StorageClass] {
        match self {
            OperandKind::Constant => &[],
            OperandKind::Register => &[StorageClass::Register],
            OperandKind::Memory => &[StorageClass::Stack, StorageClass::Other],
        }
    }
}

/// One decoded operand of an instruction.
///
/// `text` is the canonical rendering and is what gets displayed when no
/// variable can be bound to the operand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Operand {
    Constant {
        value: u64,
        text: String,
    },
    Register {
        /// Absent for implicit operands the decoder could not attribute.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        register: Option<RegisterId>,
        text: String,
    },
    Memory {
        text: String,
    },
}

impl Operand {
    /// Immediate operand rendered as `0x`-prefixed hex.
    pub fn constant(value: u64) -> Self {
        Operand::Constant { value, text: format!("{value:#x}") }
    }

    /// Register operand whose text is the register name itself.
    pub fn register(name: impl Into<String>) -> Self {
        let name = name.into();
        Operand::Register { text: name.clone(), register: Some(name) }
    }

    /// Memory operand, e.g. `dword ptr [rbp - 0x8]`.
    pub fn memory(text: impl Into<String>) -> Self {
        Operand::Memory { text: text.into() }
    }

    /// Builder-style override of the rendered text.
    pub fn with_text(mut self, new_text: impl Into<String>) -> Self {
        match &mut self {
            Operand::Constant { text, .. }
            | Operand::Register { text, .. }
            | Operand::Memory { text } => *text = new_text.into(),
        }
        self
    }

    pub fn kind(&self) -> OperandKind {
        match self {
            Operand::Constant { .. } => OperandKind::Constant,
            Operand::Register { .. } => OperandKind::Register,
            Operand::Memory { .. } => OperandKind::Memory,
        }
    }

    /// Canonical display text.
    pub fn text(&self) -> &str {
        match self {
            Operand::Constant { text, .. }
            | Operand::Register { text, .. }
            | Operand::Memory { text } => text,
        }
    }

    /// Immediate value, for constant operands only.
    pub fn immediate(&self) -> Option<u64> {
        match self {
            Operand::Constant { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// Register name, for register operands that carry one.
    pub fn register_id(&self) -> Option<&str> {
        match self {
            Operand::Register { register, .. } => register.as_deref(),
            _ => None,
        }
    }
}

/// Control-transfer classification of an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchKind {
    #[default]
    None,
    Direct,
    Indirect,
}

/// A decoded instruction. The address is unique within a function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub address: Address,
    pub mnemonic: String,
    #[serde(default)]
    pub operands: Vec<Operand>,
    #[serde(default)]
    pub branch: BranchKind,
}

impl Instruction {
    /// Non-branch instruction; chain `with_branch` for control transfers.
    pub fn new(address: Address, mnemonic: impl Into<String>, operands: Vec<Operand>) -> Self {
        Self { address, mnemonic: mnemonic.into(), operands, branch: BranchKind::None }
    }

    /// Builder-style branch classification.
    pub fn with_branch(mut self, branch: BranchKind) -> Self {
        self.branch = branch;
        self
    }

    pub fn is_branch(&self) -> bool {
        self.branch != BranchKind::None
    }

    /// Jump or call through a register or memory operand.
    pub fn is_indirect_branch(&self) -> bool {
        self.branch == BranchKind::Indirect
    }

    /// Index of the operand holding the branch target, if this is a branch.
    pub fn branch_operand_index(&self) -> Option<usize> {
        if self.is_branch() {
            self.operands.len().checked_sub(1)
        } else {
            None
        }
    }

    /// Render as `mnemonic op1, op2`.
    pub fn text(&self) -> String {
        if self.operands.is_empty() {
            return self.mnemonic.clone();
        }
        let operands: Vec<&str> = self.operands.iter().map(Operand::text).collect();
        format!("{} {}", self.mnemonic, operands.join(", "))
    }
}

/// Where a recovered variable lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageClass {
    /// Stack slot; `memory` is accepted on input.
    #[serde(alias = "memory")]
    Stack,
    Register,
    /// Anything else addressed through memory, such as a global.
    Other,
}

/// A program variable recovered by an upstream analysis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variable {
    /// Stable identifier, unique within a function.
    pub ident: String,
    pub name: String,
    /// Backing register, set only for register-class variables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reg: Option<RegisterId>,
    pub storage: StorageClass,
}

impl Variable {
    /// Stack-resident variable.
    pub fn stack(ident: impl Into<String>, name: impl Into<String>) -> Self {
        Self { ident: ident.into(), name: name.into(), reg: None, storage: StorageClass::Stack }
    }

    /// Variable held in `reg`.
    pub fn register(
        ident: impl Into<String>,
        name: impl Into<String>,
        reg: impl Into<String>,
    ) -> Self {
        Self {
            ident: ident.into(),
            name: name.into(),
            reg: Some(reg.into()),
            storage: StorageClass::Register,
        }
    }

    /// Variable with no stack slot or register, such as a global.
    pub fn other(ident: impl Into<String>, name: impl Into<String>) -> Self {
        Self { ident: ident.into(), name: name.into(), reg: None, storage: StorageClass::Other }
    }
}

/// Direction of a recorded variable access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessType {
    Read,
    Write,
}

/// "Variable `ident` was read/written at `address`."
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableAccess {
    pub ident: String,
    pub address: Address,
    pub access_type: AccessType,
    /// Byte offset into the variable touched by the access, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

impl VariableAccess {
    /// Access with no recorded offset.
    pub fn new(ident: impl Into<String>, address: Address, access_type: AccessType) -> Self {
        Self { ident: ident.into(), address, access_type, offset: None }
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Whether an operand is read (source) or written (destination).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperandPosition {
    Source,
    Dest,
}

impl OperandPosition {
    /// Destination-first operand order: index 0 is written, the rest are read.
    pub fn from_index(index: usize) -> Self {
        if index > 0 {
            OperandPosition::Source
        } else {
            OperandPosition::Dest
        }
    }

    /// Access type a variable must have at the instruction to sit in this position.
    pub fn access_type(self) -> AccessType {
        match self {
            OperandPosition::Source => AccessType::Read,
            OperandPosition::Dest => AccessType::Write,
        }
    }
}

/// Outcome of binding an operand to a recovered variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BindingResult {
    NoBinding,
    Bound { variable: Variable, byte_offset: i64 },
}

impl BindingResult {
    /// The bound variable, if any.
    pub fn variable(&self) -> Option<&Variable> {
        match self {
            BindingResult::Bound { variable, .. } => Some(variable),
            BindingResult::NoBinding => None,
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, BindingResult::Bound { .. })
    }
}

/// Outcome of resolving a branch operand against its candidate successors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResolvedBranch {
    SingleTarget { target: Address },
    MultipleTargets { preview: Vec<Address>, truncated: bool },
    Unresolved,
}

