//! Read-only index over a function's variable access records.
//!
//! The binder never walks raw access lists; it asks an `AccessLookup` two
//! questions: which variables of a storage class are touched at an address,
//! and whether a given variable has a given access type there.

use std::collections::HashMap;

use thiserror::Error;

use crate::model::{AccessType, Address, StorageClass, Variable, VariableAccess};

/// Inconsistent variable or access input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndexError {
    #[error("Access at {address:#x} references unknown variable '{ident}'")]
    UnknownVariable { ident: String, address: Address },
    #[error("Variable ident '{0}' is defined more than once")]
    DuplicateIdent(String),
}

/// A variable touched at some address, with the byte offset of the access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate<'a> {
    pub variable: &'a Variable,
    pub offset: Option<i64>,
}

/// Queries the binder needs from a variable-recovery result.
pub trait AccessLookup {
    /// Variables of any class in `storage` accessed at `address`, in supplied order.
    fn candidates_at(&self, address: Address, storage: &[StorageClass]) -> Vec<Candidate<'_>>;

    /// Whether `ident` has an access of `access_type` at `address`.
    fn has_access(&self, ident: &str, address: Address, access_type: AccessType) -> bool;
}

/// `AccessLookup` built from plain variable and access lists.
#[derive(Debug, Clone, Default)]
pub struct AccessIndex {
    variables: Vec<Variable>,
    by_ident: HashMap<String, usize>,
    /// address -> (variable slot, offset), first access per variable only.
    by_address: HashMap<Address, Vec<(usize, Option<i64>)>>,
    /// (variable slot, address) -> access types seen there.
    access_types: HashMap<(usize, Address), Vec<AccessType>>,
}

impl AccessIndex {
    /// Index `accesses` over `variables`.
    ///
    /// Fails on duplicate idents and on accesses naming an unknown variable.
    pub fn build(
        variables: Vec<Variable>,
        accesses: &[VariableAccess],
    ) -> Result<Self, IndexError> {
        let mut by_ident = HashMap::with_capacity(variables.len());
        for (slot, variable) in variables.iter().enumerate() {
            if by_ident.insert(variable.ident.clone(), slot).is_some() {
                return Err(IndexError::DuplicateIdent(variable.ident.clone()));
            }
        }

        let mut by_address: HashMap<Address, Vec<(usize, Option<i64>)>> = HashMap::new();
        let mut access_types: HashMap<(usize, Address), Vec<AccessType>> = HashMap::new();
        for access in accesses {
            let slot = *by_ident.get(&access.ident).ok_or_else(|| IndexError::UnknownVariable {
                ident: access.ident.clone(),
                address: access.address,
            })?;

            let at_address = by_address.entry(access.address).or_default();
            if !at_address.iter().any(|(s, _)| *s == slot) {
                at_address.push((slot, access.offset));
            }

            let types = access_types.entry((slot, access.address)).or_default();
            if !types.contains(&access.access_type) {
                types.push(access.access_type);
            }
        }

        Ok(Self { variables, by_ident, by_address, access_types })
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, ident: &str) -> Option<&Variable> {
        self.by_ident.get(ident).map(|&slot| &self.variables[slot])
    }
}

impl AccessLookup for AccessIndex {
    fn candidates_at(&self, address: Address, storage: &[StorageClass]) -> Vec<Candidate<'_>> {
        self.by_address
            .get(&address)
            .map(|entries| {
                entries
                    .iter()
                    .map(|&(slot, offset)| Candidate { variable: &self.variables[slot], offset })
                    .filter(|candidate| storage.contains(&candidate.variable.storage))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn has_access(&self, ident: &str, address: Address, access_type: AccessType) -> bool {
        let Some(&slot) = self.by_ident.get(ident) else {
            return false;
        };
        self.access_types
            .get(&(slot, address))
            .is_some_and(|types| types.contains(&access_type))
    }
}
