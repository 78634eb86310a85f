//! Shared fixtures for unit tests

use alloy_primitives::{bytes, Bytes};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::compiler::{Artifacts, CompiledContract, Compiler, ContractSource};
use crate::errors::{Error, Result};
use crate::registry::{Registry, RegistryEntry, SYSTEM_CONTRACTS};
use crate::tokens::TokenConfig;

/// Minimal generic token contract carrying every sentinel
pub(crate) const TOKEN_TEMPLATE: &str = r#"// SPDX-License-Identifier: GPL-3.0-or-later
pragma solidity ^0.6.0;

import "./MultiCurrency.sol";
import "./IMultiCurrency.sol";

contract ERC20 is IERC20 {
    uint256 private constant _currencyId = 0xffff;
    string private constant _name = "TEMPLATE";
    string private constant _symbol = "TEMP";
    uint8 private constant _decimals = 0;
}
"#;

/// Token configuration mirroring the live network's first six tokens
pub(crate) const TOKENS_JSON: &str = r#"{
    "tokens": [
        { "name": "Setheum", "symbol": "SETM", "decimals": 12, "currencyId": 0 },
        { "name": "Serp", "symbol": "SERP", "decimals": 12, "currencyId": 1 },
        { "name": "Dinar", "symbol": "DNAR", "decimals": 12, "currencyId": 2 },
        { "name": "HighEnd LaunchPad", "symbol": "HELP", "decimals": 12, "currencyId": 3 },
        { "name": "Setter", "symbol": "SETR", "decimals": 12, "currencyId": 4 },
        { "name": "SetDollar", "symbol": "SETUSD", "decimals": 12, "currencyId": 5 }
    ],
    "lpPairs": [["SETM", "SETUSD"], ["SETR", "SERP"]]
}"#;

pub(crate) fn sample_tokens() -> TokenConfig {
    TokenConfig::from_json_str(TOKENS_JSON).unwrap()
}

/// Registry built from [`sample_tokens`]; token code `0x60016002`, system code `0x6080`
pub(crate) fn sample_registry() -> Registry {
    let config = sample_tokens();
    let mut tokens: Vec<_> = config
        .tokens
        .iter()
        .map(|t| RegistryEntry::token(t, bytes!("60016002")).unwrap())
        .collect();
    tokens.extend(config.lp_pairs.iter().map(|p| RegistryEntry::lp(p).unwrap()));
    let system = SYSTEM_CONTRACTS
        .iter()
        .map(|c| RegistryEntry::system(c, bytes!("6080")).unwrap())
        .collect();
    Registry::build(tokens, system).unwrap()
}

/// Compiler double returning `0x60 <name>` creation code and `0x61 <name>` deployed code
/// for every requested contract
#[derive(Debug, Default)]
pub(crate) struct MockCompiler {
    /// Project root; when set, records whether each source existed at compile time
    root: Option<PathBuf>,
    /// Contract that should be reported as missing
    fail_on: Option<String>,
    /// Requested contract names per call, with on-disk presence
    calls: Mutex<Vec<Vec<(String, bool)>>>,
}

impl MockCompiler {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: Some(root.into()), ..Self::default() }
    }

    pub(crate) fn failing_on(mut self, name: &str) -> Self {
        self.fail_on = Some(name.to_string());
        self
    }

    pub(crate) fn creation_code_for(name: &str) -> Bytes {
        Self::code(0x60, name)
    }

    pub(crate) fn deployed_code_for(name: &str) -> Bytes {
        Self::code(0x61, name)
    }

    fn code(prefix: u8, name: &str) -> Bytes {
        let mut code = vec![prefix];
        code.extend_from_slice(name.as_bytes());
        Bytes::from(code)
    }

    pub(crate) fn calls(&self) -> Vec<Vec<(String, bool)>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Compiler for MockCompiler {
    async fn compile(&self, sources: &[ContractSource]) -> Result<Artifacts> {
        let seen = sources
            .iter()
            .map(|s| {
                let on_disk = self.root.as_ref().is_some_and(|root| root.join(&s.path).exists());
                (s.name.clone(), on_disk)
            })
            .collect();
        self.calls.lock().unwrap().push(seen);

        let mut artifacts = Artifacts::default();
        for source in sources {
            if self.fail_on.as_deref() == Some(source.name.as_str()) {
                return Err(Error::Compile(format!("missing artifact for contract `{}`", source.name)));
            }
            artifacts.insert(
                source.name.clone(),
                CompiledContract {
                    bytecode: Self::creation_code_for(&source.name),
                    deployed_bytecode: Self::deployed_code_for(&source.name),
                },
            );
        }
        Ok(artifacts)
    }
}
