//! Registry of predeployed names, addresses and bytecode
//!
//! The registry is the single ordered list every output artifact is rendered from:
//! mirrored tokens first (including LP tokens), then system contracts in declaration
//! order. It is built in one step and never mutated afterwards.

pub mod system;

pub use system::{SystemContract, SYSTEM_CONTRACTS};

use alloy_primitives::{Address, Bytes};
use std::collections::{HashMap, HashSet};

use crate::errors::{RegistryConflict, Result};
use crate::tokens::{LpPair, TokenDescriptor};
use crate::zones::Zone;

/// One named predeploy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    /// Unique name, used verbatim as an identifier in emitted files
    pub name: String,
    /// Unique address
    pub address: Address,
    /// Bytecode; empty for entries without code of their own (LP tokens) or when
    /// compilation was skipped
    pub bytecode: Bytes,
    /// Zone the address was allocated in
    pub zone: Zone,
}

impl RegistryEntry {
    /// Entry for a mirrored fungible token
    pub fn token(token: &TokenDescriptor, bytecode: Bytes) -> Result<Self> {
        Ok(Self {
            name: token.symbol.clone(),
            address: token.address()?,
            bytecode,
            zone: Zone::MirroredTokens,
        })
    }

    /// Entry for a mirrored LP token
    pub fn lp(pair: &LpPair) -> Result<Self> {
        Ok(Self {
            name: pair.name(),
            address: pair.address()?,
            bytecode: Bytes::new(),
            zone: Zone::LiquidityPoolTokens,
        })
    }

    /// Entry for a system contract
    pub fn system(contract: &SystemContract, bytecode: Bytes) -> Result<Self> {
        Ok(Self {
            name: contract.name.to_string(),
            address: contract.address()?,
            bytecode,
            zone: Zone::SystemContracts,
        })
    }

    /// EIP-55 checksummed address text
    pub fn checksummed_address(&self) -> String {
        self.address.to_checksum(None)
    }
}

/// Ordered, conflict-free list of predeploys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
}

impl Registry {
    /// Merge token entries and system entries, in that order.
    ///
    /// Fails with a registry conflict on duplicate names, duplicate addresses, or an
    /// address outside the entry's zone.
    pub fn build(
        token_entries: Vec<RegistryEntry>,
        system_entries: Vec<RegistryEntry>,
    ) -> Result<Self> {
        let entries: Vec<_> = token_entries.into_iter().chain(system_entries).collect();

        check_conflicts(&entries)?;

        Ok(Self { entries })
    }

    /// Entries in canonical order
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    /// Iterate entries in canonical order
    pub fn iter(&self) -> std::slice::Iter<'_, RegistryEntry> {
        self.entries.iter()
    }

    /// Look up an entry by name
    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Enforce zone membership, unique names and unique addresses
fn check_conflicts(entries: &[RegistryEntry]) -> Result<()> {
    let mut names = HashSet::with_capacity(entries.len());
    let mut addresses: HashMap<Address, &str> = HashMap::with_capacity(entries.len());

    for entry in entries {
        if !entry.zone.contains(&entry.address) {
            return Err(RegistryConflict::OutsideZone {
                name: entry.name.clone(),
                address: entry.address,
                expected: entry.zone,
            }
            .into());
        }
        if !names.insert(entry.name.as_str()) {
            return Err(RegistryConflict::DuplicateName(entry.name.clone()).into());
        }
        if let Some(first) = addresses.insert(entry.address, entry.name.as_str()) {
            return Err(RegistryConflict::DuplicateAddress {
                address: entry.address,
                first: first.to_string(),
                second: entry.name.clone(),
            }
            .into());
        }
    }

    Ok(())
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a RegistryEntry;
    type IntoIter = std::slice::Iter<'a, RegistryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
