//! Architecture register-file descriptions.
//!
//! Decoders name sub-registers (`eax`, `al`, `w0`) while variable recovery
//! records the full-width backing register. Every register comparison in the
//! resolvers goes through a `RegisterFile` so the two sides are unified on
//! their canonical register rather than on raw names.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a full-width architectural register.
///
/// Sub-registers share the canonical id of the register they alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CanonicalRegister(pub u16);

/// Failures building or selecting a register table.
#[derive(Debug, Error)]
pub enum ArchError {
    #[error("Unsupported architecture '{0}'. Supported: x86_64, aarch64")]
    UnsupportedArch(String),
    #[error("Register '{name}' is defined twice in the {arch} register table")]
    DuplicateRegister { arch: String, name: String },
}

/// Maps register names to their canonical full-width register.
pub trait RegisterFile: Send + Sync {
    /// Canonical register for `reg`, or `None` if the name is unknown.
    fn canonical(&self, reg: &str) -> Option<CanonicalRegister>;

    /// Architecture name (e.g. `x86_64`).
    fn name(&self) -> &str;
}

/// True when both names resolve to the same canonical register.
///
/// Unknown names never alias anything, including themselves.
pub fn registers_alias(file: &dyn RegisterFile, a: &str, b: &str) -> bool {
    match (file.canonical(a), file.canonical(b)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// One row of a register table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterEntry {
    pub name: String,
    pub canonical: CanonicalRegister,
    /// Width in bytes.
    pub width: u8,
}

/// Table-driven `RegisterFile`. Lookups are case-insensitive.
#[derive(Debug, Clone)]
pub struct RegisterMap {
    arch: String,
    entries: Vec<RegisterEntry>,
    by_name: HashMap<String, usize>,
}

impl RegisterMap {
    /// Build a map from `(name, canonical, width)` rows.
    pub fn new(
        arch: impl Into<String>,
        rows: impl IntoIterator<Item = (String, CanonicalRegister, u8)>,
    ) -> Result<Self, ArchError> {
        let arch = arch.into();
        let mut entries = Vec::new();
        let mut by_name = HashMap::new();
        for (name, canonical, width) in rows {
            let key = name.to_ascii_lowercase();
            if by_name.insert(key, entries.len()).is_some() {
                return Err(ArchError::DuplicateRegister { arch, name });
            }
            entries.push(RegisterEntry { name, canonical, width });
        }
        Ok(Self { arch, entries, by_name })
    }

    /// Built-in table for a named architecture.
    pub fn for_arch(name: &str) -> Result<Self, ArchError> {
        match name.to_ascii_lowercase().as_str() {
            "x86_64" | "amd64" | "x64" => Self::x86_64(),
            "aarch64" | "arm64" => Self::aarch64(),
            _ => Err(ArchError::UnsupportedArch(name.to_string())),
        }
    }

    /// x86_64 general-purpose registers with all their sub-register views.
    pub fn x86_64() -> Result<Self, ArchError> {
        let mut rows = Vec::new();
        let mut next = 0u16;

        // rax..rdx carry a high-byte alias.
        for letter in ["a", "b", "c", "d"] {
            let id = CanonicalRegister(next);
            next += 1;
            rows.push((format!("r{letter}x"), id, 8));
            rows.push((format!("e{letter}x"), id, 4));
            rows.push((format!("{letter}x"), id, 2));
            rows.push((format!("{letter}l"), id, 1));
            rows.push((format!("{letter}h"), id, 1));
        }
        for base in ["si", "di", "sp", "bp"] {
            let id = CanonicalRegister(next);
            next += 1;
            rows.push((format!("r{base}"), id, 8));
            rows.push((format!("e{base}"), id, 4));
            rows.push((base.to_string(), id, 2));
            rows.push((format!("{base}l"), id, 1));
        }
        for n in 8..16 {
            let id = CanonicalRegister(next);
            next += 1;
            rows.push((format!("r{n}"), id, 8));
            rows.push((format!("r{n}d"), id, 4));
            rows.push((format!("r{n}w"), id, 2));
            rows.push((format!("r{n}b"), id, 1));
        }
        let rip = CanonicalRegister(next);
        rows.push(("rip".to_string(), rip, 8));
        rows.push(("eip".to_string(), rip, 4));

        Self::new("x86_64", rows)
    }

    /// aarch64 `x`/`w` registers plus `sp`, `fp` and `lr`.
    pub fn aarch64() -> Result<Self, ArchError> {
        let mut rows = Vec::new();
        for n in 0..31u16 {
            let id = CanonicalRegister(n);
            rows.push((format!("x{n}"), id, 8));
            rows.push((format!("w{n}"), id, 4));
        }
        rows.push(("fp".to_string(), CanonicalRegister(29), 8));
        rows.push(("lr".to_string(), CanonicalRegister(30), 8));
        let sp = CanonicalRegister(31);
        rows.push(("sp".to_string(), sp, 8));
        rows.push(("wsp".to_string(), sp, 4));

        Self::new("aarch64", rows)
    }

    /// Rows in table order.
    pub fn entries(&self) -> &[RegisterEntry] {
        &self.entries
    }

    /// Table row for `reg`, case-insensitively.
    pub fn get(&self, reg: &str) -> Option<&RegisterEntry> {
        self.by_name.get(&reg.to_ascii_lowercase()).map(|&i| &self.entries[i])
    }
}

impl RegisterFile for RegisterMap {
    fn canonical(&self, reg: &str) -> Option<CanonicalRegister> {
        self.get(reg).map(|entry| entry.canonical)
    }

    fn name(&self) -> &str {
        &self.arch
    }
}
