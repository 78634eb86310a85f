//! Compiler adapter
//!
//! The generator does not compile Solidity itself. It hands a set of contract sources
//! (already written to disk) to a [`Compiler`] and receives bytecode per contract name.

pub mod artifacts;

pub use artifacts::ArtifactCompiler;

use alloy_primitives::Bytes;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::errors::{Error, Result};

/// A contract the compiler must produce an artifact for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractSource {
    /// Contract name (artifact key)
    pub name: String,
    /// Source file, relative to the project root
    pub path: PathBuf,
}

impl ContractSource {
    /// Create a contract source reference
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self { name: name.into(), path: path.into() }
    }
}

/// Which bytecode goes into the registry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum BytecodeKind {
    /// Creation (constructor) bytecode
    Creation,
    /// Runtime bytecode as stored in genesis state
    #[default]
    Deployed,
}

/// Compiler output for one contract
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledContract {
    /// Creation bytecode
    pub bytecode: Bytes,
    /// Runtime bytecode
    pub deployed_bytecode: Bytes,
}

impl CompiledContract {
    /// Select the bytecode of the given kind
    pub fn code(&self, kind: BytecodeKind) -> &Bytes {
        match kind {
            BytecodeKind::Creation => &self.bytecode,
            BytecodeKind::Deployed => &self.deployed_bytecode,
        }
    }
}

/// Compiled contracts keyed by contract name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Artifacts {
    contracts: BTreeMap<String, CompiledContract>,
}

impl Artifacts {
    /// Record a compiled contract
    pub fn insert(&mut self, name: impl Into<String>, contract: CompiledContract) {
        self.contracts.insert(name.into(), contract);
    }

    /// Look up a contract; a missing artifact is a compile error.
    pub fn get(&self, name: &str) -> Result<&CompiledContract> {
        self.contracts
            .get(name)
            .ok_or_else(|| Error::Compile(format!("missing artifact for contract `{name}`")))
    }

    /// Number of compiled contracts
    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    /// Whether no contract was compiled
    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}

/// External contract compiler.
///
/// Implementations must return an artifact for every requested contract or fail; the
/// pipeline treats any error as fatal.
#[async_trait]
pub trait Compiler: Send + Sync {
    /// Compile `sources`, returning bytecode per contract name.
    async fn compile(&self, sources: &[ContractSource]) -> Result<Artifacts>;
}
