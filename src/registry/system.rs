use alloy_primitives::Address;

use crate::compiler::ContractSource;
use crate::errors::Result;
use crate::zones::Zone;

/// A predeployed system contract with a fixed slot in the system-contract zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemContract {
    /// Contract (and artifact) name
    pub name: &'static str,
    /// Offset inside [`Zone::SystemContracts`]
    pub offset: u128,
    /// Source file, relative to the project root. It must declare a contract named
    /// `name`, since artifacts are keyed by contract name.
    pub source: &'static str,
}

impl SystemContract {
    /// Predeploy address
    pub fn address(&self) -> Result<Address> {
        Zone::SystemContracts.address(self.offset)
    }

    /// Source reference handed to the compiler
    pub fn contract_source(&self) -> ContractSource {
        ContractSource::new(self.name, self.source)
    }
}

/// System contracts in declaration order.
///
/// Offsets are part of the on-chain ABI: appending is fine, reordering or reusing an
/// offset breaks every consumer of the emitted constants.
pub const SYSTEM_CONTRACTS: &[SystemContract] = &[
    SystemContract { name: "Token", offset: 0, source: "contracts/system/Token.sol" },
    SystemContract { name: "StateRent", offset: 1, source: "contracts/state_rent/StateRent.sol" },
    SystemContract { name: "Oracle", offset: 2, source: "contracts/oracle/Oracle.sol" },
    SystemContract { name: "Schedule", offset: 3, source: "contracts/schedule/Schedule.sol" },
    SystemContract { name: "DEX", offset: 4, source: "contracts/dex/DEX.sol" },
];
