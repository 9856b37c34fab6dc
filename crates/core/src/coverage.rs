//! Address-range lookups over blocks and functions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::Address;

/// Blocks covered by some analysis result (e.g. a dependency slice).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoveredBlocks {
    blocks: BTreeMap<Address, u64>,
}

impl CoveredBlocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a block. An existing block at the same start keeps its size.
    pub fn insert(&mut self, start: Address, size: u64) {
        self.blocks.entry(start).or_insert(size);
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// `(start, size)` of the covered block holding `addr`.
    pub fn block_containing(&self, addr: Address) -> Option<(Address, u64)> {
        let (&start, &size) = self.blocks.range(..=addr).next_back()?;
        (addr - start < size).then_some((start, size))
    }

    /// Whether any covered block holds `addr`.
    pub fn contains(&self, addr: Address) -> bool {
        self.block_containing(addr).is_some()
    }
}

impl FromIterator<(Address, u64)> for CoveredBlocks {
    fn from_iter<I: IntoIterator<Item = (Address, u64)>>(iter: I) -> Self {
        let mut covered = Self::new();
        for (start, size) in iter {
            covered.insert(start, size);
        }
        covered
    }
}

/// A function known to the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionEntry {
    pub address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub size: u64,
}

/// Functions keyed by entry address.
#[derive(Debug, Clone, Default)]
pub struct FunctionTable {
    functions: BTreeMap<Address, FunctionEntry>,
}

impl FunctionTable {
    pub fn new(entries: impl IntoIterator<Item = FunctionEntry>) -> Self {
        Self { functions: entries.into_iter().map(|f| (f.address, f)).collect() }
    }

    /// Whether `addr` is a function entry point.
    pub fn is_entry(&self, addr: Address) -> bool {
        self.functions.contains_key(&addr)
    }

    pub fn entries(&self) -> impl Iterator<Item = &FunctionEntry> {
        self.functions.values()
    }

    /// Function whose `[address, address + size)` range holds `addr`.
    pub fn locate(&self, addr: Address) -> Option<&FunctionEntry> {
        let (_, func) = self.functions.range(..=addr).next_back()?;
        (addr - func.address < func.size).then_some(func)
    }

    /// `name+10`, `0x401000+10` for unnamed functions, or `Unknown`.
    ///
    /// The offset is bare hex with no `0x` prefix.
    pub fn describe_location(&self, addr: Address) -> String {
        match self.locate(addr) {
            Some(func) => {
                let offset = addr - func.address;
                match &func.name {
                    Some(name) if !name.is_empty() => format!("{name}+{offset:x}"),
                    _ => format!("{:#x}+{offset:x}", func.address),
                }
            }
            None => "Unknown".to_string(),
        }
    }
}
