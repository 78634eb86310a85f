//! Address zones
//!
//! The 160-bit address space is split into fixed, non-overlapping zones:
//!
//! ```text
//! 0x0                  .. 0x400                 Ethereum precompiles
//! 0x400                .. 0x800                 runtime precompiles
//! 0x800                .. 0x1000                predeployed system contracts
//! 0x0100_0000          .. 0x0200_0000           mirrored tokens (offset = currency id)
//! 0x0200_0000          .. 0x0300_0000           mirrored NFTs
//! 0x1_0000_0000_0000_0000 .. 0x2_0000_0000_0000_0000  mirrored LP tokens
//! ```
//!
//! All zones sit below 2^128, so an address is `base + offset` in the low 16 bytes.

use alloy_primitives::Address;
use std::fmt;

use crate::constants::{
    ADDRESS_LENGTH, ETHEREUM_PRECOMPILES_START, LP_FIRST_ID_SHIFT, MIRRORED_LP_TOKENS_ADDRESS_START,
    MIRRORED_NFT_ADDRESS_START, MIRRORED_TOKENS_ADDRESS_START, PREDEPLOY_ADDRESS_START,
    RUNTIME_PRECOMPILES_START,
};
use crate::errors::{Error, Result};

/// A reserved sub-range of the address space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Zone {
    /// Standard Ethereum precompiles
    EthereumPrecompiles,
    /// Precompiles provided by the runtime
    RuntimePrecompiles,
    /// Predeployed system contracts (Token, StateRent, Oracle, ...)
    SystemContracts,
    /// Mirrored fungible tokens
    MirroredTokens,
    /// Mirrored NFT classes
    MirroredNfts,
    /// Mirrored liquidity-pool share tokens
    LiquidityPoolTokens,
}

impl Zone {
    /// Every zone, in ascending address order.
    pub const ALL: [Zone; 6] = [
        Zone::EthereumPrecompiles,
        Zone::RuntimePrecompiles,
        Zone::SystemContracts,
        Zone::MirroredTokens,
        Zone::MirroredNfts,
        Zone::LiquidityPoolTokens,
    ];

    /// First address value of the zone
    pub const fn base(self) -> u128 {
        match self {
            Zone::EthereumPrecompiles => ETHEREUM_PRECOMPILES_START,
            Zone::RuntimePrecompiles => RUNTIME_PRECOMPILES_START,
            Zone::SystemContracts => PREDEPLOY_ADDRESS_START,
            Zone::MirroredTokens => MIRRORED_TOKENS_ADDRESS_START,
            Zone::MirroredNfts => MIRRORED_NFT_ADDRESS_START,
            Zone::LiquidityPoolTokens => MIRRORED_LP_TOKENS_ADDRESS_START,
        }
    }

    /// Number of reserved slots in the zone
    pub const fn width(self) -> u128 {
        match self {
            Zone::EthereumPrecompiles => RUNTIME_PRECOMPILES_START - ETHEREUM_PRECOMPILES_START,
            Zone::RuntimePrecompiles => PREDEPLOY_ADDRESS_START - RUNTIME_PRECOMPILES_START,
            Zone::SystemContracts => 0x800,
            Zone::MirroredTokens => MIRRORED_NFT_ADDRESS_START - MIRRORED_TOKENS_ADDRESS_START,
            Zone::MirroredNfts => 0x0100_0000,
            Zone::LiquidityPoolTokens => 1 << 64,
        }
    }

    /// One past the last address value of the zone
    pub const fn end(self) -> u128 {
        self.base() + self.width()
    }

    /// Map a zone-local offset to its address.
    ///
    /// Fails with [`Error::AllocationOverflow`] when the offset would spill into the
    /// next zone.
    pub fn address(self, offset: u128) -> Result<Address> {
        if offset >= self.width() {
            return Err(Error::AllocationOverflow { zone: self, offset, width: self.width() });
        }
        Ok(address_from_value(self.base() + offset))
    }

    /// Whether `address` falls inside this zone
    pub fn contains(self, address: &Address) -> bool {
        address_value(address).is_some_and(|v| v >= self.base() && v < self.end())
    }

    /// The zone an address belongs to, if any
    pub fn of(address: &Address) -> Option<Zone> {
        Zone::ALL.into_iter().find(|zone| zone.contains(address))
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Zone::EthereumPrecompiles => "ethereum-precompiles",
            Zone::RuntimePrecompiles => "runtime-precompiles",
            Zone::SystemContracts => "system-contracts",
            Zone::MirroredTokens => "mirrored-tokens",
            Zone::MirroredNfts => "mirrored-nfts",
            Zone::LiquidityPoolTokens => "lp-tokens",
        };
        f.write_str(name)
    }
}

/// Allocate `offset` inside `zone`. Same as [`Zone::address`].
pub fn allocate(zone: Zone, offset: u128) -> Result<Address> {
    zone.address(offset)
}

/// Pack an LP pair into a zone-local offset: `first << 32 | second`.
///
/// The packing is order sensitive; callers pass a canonical pair (lower currency id
/// first), see [`crate::tokens::LpPair`]. The lower id goes in the high 32 bits, the
/// same layout as the runtime's LP currency id (`symbol_0 << 32 | symbol_1`) and the
/// deployed `Address.d.ts`. Swapping the fields moves every LP token address.
pub const fn lp_offset(first: u32, second: u32) -> u128 {
    ((first as u128) << LP_FIRST_ID_SHIFT) | second as u128
}

/// Address with `value` in its low 16 bytes
fn address_from_value(value: u128) -> Address {
    let mut bytes = [0u8; ADDRESS_LENGTH];
    bytes[ADDRESS_LENGTH - 16..].copy_from_slice(&value.to_be_bytes());
    Address::new(bytes)
}

/// Numeric value of an address, or `None` when it exceeds 128 bits
fn address_value(address: &Address) -> Option<u128> {
    let (high, low) = address.as_slice().split_at(ADDRESS_LENGTH - 16);
    if high.iter().any(|b| *b != 0) {
        return None;
    }
    let mut buf = [0u8; 16];
    buf.copy_from_slice(low);
    Some(u128::from_be_bytes(buf))
}
