//! Token configuration
//!
//! Mirrored tokens are described by an external JSON file, either as a bare array of
//! tokens or as an object carrying the tokens and the LP pairs to mirror:
//!
//! ```json
//! {
//!   "tokens": [
//!     { "name": "Setheum", "symbol": "SETM", "decimals": 12, "currencyId": 0 }
//!   ],
//!   "lpPairs": [["SETM", "SETUSD"]]
//! }
//! ```
//!
//! The configuration is validated as a whole before any address is allocated.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::constants::ADDRESS_LIBRARY_NAME;
use crate::errors::{Error, Result};
use crate::zones::{lp_offset, Zone};

/// One mirrored fungible token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDescriptor {
    /// Display name
    pub name: String,
    /// Unique symbol, used verbatim as an identifier in emitted files
    pub symbol: String,
    /// Token decimals
    pub decimals: u8,
    /// Runtime currency id
    pub currency_id: u8,
}

impl TokenDescriptor {
    /// Mirrored contract address, derived from the currency id
    pub fn address(&self) -> Result<Address> {
        Zone::MirroredTokens.address(u128::from(self.currency_id))
    }

    /// Name of the specialized token contract
    pub fn contract_name(&self) -> String {
        format!("{}ERC20", self.symbol)
    }
}

/// A mirrored liquidity-pool token, stored with the lower currency id first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LpPair {
    first: (String, u8),
    second: (String, u8),
}

impl LpPair {
    /// Build the canonical pair from two `(symbol, currency id)` sides given in any order.
    ///
    /// The side with the lower currency id becomes `first` and is packed into the high
    /// field of the LP offset. A pair of identical currency ids is rejected.
    pub fn canonical(a: (String, u8), b: (String, u8)) -> Result<Self> {
        if a.1 == b.1 {
            return Err(Error::input(format!(
                "LP pair {}/{} uses the same currency id {} twice",
                a.0, b.0, a.1
            )));
        }
        let (first, second) = if a.1 < b.1 { (a, b) } else { (b, a) };
        Ok(Self { first, second })
    }

    /// Registry name, `LP_{first}_{second}`
    pub fn name(&self) -> String {
        format!("LP_{}_{}", self.first.0, self.second.0)
    }

    /// Currency ids in canonical order
    pub fn currency_ids(&self) -> (u8, u8) {
        (self.first.1, self.second.1)
    }

    /// Zone-local offset of the LP token
    pub fn offset(&self) -> u128 {
        lp_offset(u32::from(self.first.1), u32::from(self.second.1))
    }

    /// Mirrored LP token address
    pub fn address(&self) -> Result<Address> {
        Zone::LiquidityPoolTokens.address(self.offset())
    }
}

/// Validated token configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenConfig {
    /// Mirrored fungible tokens, in configuration order
    pub tokens: Vec<TokenDescriptor>,
    /// Mirrored LP tokens, in configuration order
    pub lp_pairs: Vec<LpPair>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawToken {
    name: String,
    symbol: Option<String>,
    decimals: u8,
    currency_id: u8,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTokenConfig {
    tokens: Vec<RawToken>,
    #[serde(default)]
    lp_pairs: Vec<(String, String)>,
}

impl TokenConfig {
    /// Parse and validate a JSON token configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| Error::input(format!("token config is not valid JSON: {e}")))?;

        let raw = if value.is_array() {
            RawTokenConfig {
                tokens: serde_json::from_value(value)
                    .map_err(|e| Error::input(format!("malformed token list: {e}")))?,
                lp_pairs: Vec::new(),
            }
        } else {
            serde_json::from_value(value)
                .map_err(|e| Error::input(format!("malformed token config: {e}")))?
        };

        Self::validate(raw)
    }

    /// Build a configuration from already-typed tokens and LP pairs given as symbols.
    pub fn new(tokens: Vec<TokenDescriptor>, lp_pairs: Vec<(String, String)>) -> Result<Self> {
        let tokens = tokens
            .into_iter()
            .map(|t| RawToken {
                name: t.name,
                symbol: Some(t.symbol),
                decimals: t.decimals,
                currency_id: t.currency_id,
            })
            .collect();
        Self::validate(RawTokenConfig { tokens, lp_pairs })
    }

    fn validate(raw: RawTokenConfig) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut tokens = Vec::with_capacity(raw.tokens.len());

        for (index, token) in raw.tokens.into_iter().enumerate() {
            let symbol = token
                .symbol
                .ok_or_else(|| Error::input(format!("token #{index} has no symbol")))?;
            if !is_identifier(&symbol) {
                return Err(Error::input(format!(
                    "token #{index} symbol `{symbol}` is not a valid identifier"
                )));
            }
            if is_reserved(&symbol) {
                return Err(Error::input(format!(
                    "token #{index} symbol `{symbol}` is a reserved word"
                )));
            }
            if token.name.trim().is_empty() {
                return Err(Error::input(format!("token `{symbol}` has an empty name")));
            }
            if !seen.insert(symbol.clone()) {
                return Err(Error::input(format!("duplicate token symbol `{symbol}`")));
            }
            tokens.push(TokenDescriptor {
                name: token.name,
                symbol,
                decimals: token.decimals,
                currency_id: token.currency_id,
            });
        }

        let ids: HashMap<&str, u8> =
            tokens.iter().map(|t| (t.symbol.as_str(), t.currency_id)).collect();
        let lookup = |symbol: &str| {
            ids.get(symbol)
                .map(|id| (symbol.to_string(), *id))
                .ok_or_else(|| Error::input(format!("LP pair references unknown token `{symbol}`")))
        };

        let lp_pairs = raw
            .lp_pairs
            .iter()
            .map(|(a, b)| LpPair::canonical(lookup(a)?, lookup(b)?))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { tokens, lp_pairs })
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`, valid as-is in both Solidity and JavaScript
fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// JavaScript reserved words, including strict-mode and module-only ones
const JS_RESERVED: &[&str] = &[
    "arguments", "await", "break", "case", "catch", "class", "const", "continue",
    "debugger", "default", "delete", "do", "else", "enum", "eval", "export", "extends",
    "false", "finally", "for", "function", "if", "implements", "import", "in",
    "instanceof", "interface", "let", "new", "null", "package", "private", "protected",
    "public", "return", "static", "super", "switch", "this", "throw", "true", "try",
    "typeof", "var", "void", "while", "with", "yield",
];

/// Solidity keywords and reserved words; sized elementary types are matched separately
const SOLIDITY_RESERVED: &[&str] = &[
    "abstract", "address", "after", "alias", "anonymous", "apply", "assembly", "auto",
    "bool", "break", "byte", "bytes", "calldata", "case", "catch", "constant",
    "constructor", "continue", "contract", "copyof", "days", "default", "define",
    "delete", "do", "else", "emit", "enum", "error", "ether", "event", "external",
    "fallback", "false", "final", "finney", "fixed", "for", "function", "gwei", "hex",
    "hours", "if", "immutable", "implements", "import", "in", "indexed", "inline",
    "interface", "internal", "is", "let", "library", "macro", "mapping", "match",
    "memory", "minutes", "modifier", "mutable", "new", "null", "of", "override",
    "partial", "payable", "pragma", "private", "promise", "public", "pure", "receive",
    "reference", "relocatable", "return", "returns", "revert", "sealed", "seconds",
    "sizeof", "static", "storage", "string", "struct", "super", "supports", "switch",
    "szabo", "this", "throw", "true", "try", "type", "typedef", "typeof", "ufixed",
    "unchecked", "unicode", "using", "var", "view", "virtual", "weeks", "wei", "while",
    "years",
];

/// Whether `s` cannot be used as a constant name in the emitted Solidity or JavaScript
fn is_reserved(s: &str) -> bool {
    s == ADDRESS_LIBRARY_NAME
        || JS_RESERVED.contains(&s)
        || SOLIDITY_RESERVED.contains(&s)
        || is_sized_elementary_type(s)
}

/// `intN`, `uintN`, `bytesN`, `fixedMxN`, `ufixedMxN`
fn is_sized_elementary_type(s: &str) -> bool {
    let digits = |t: &str| !t.is_empty() && t.bytes().all(|b| b.is_ascii_digit());
    if let Some(size) = s.strip_prefix("uint").or_else(|| s.strip_prefix("int")) {
        return size.is_empty() || digits(size);
    }
    if let Some(size) = s.strip_prefix("bytes") {
        return digits(size);
    }
    if let Some(rest) = s.strip_prefix("ufixed").or_else(|| s.strip_prefix("fixed")) {
        return rest.split_once('x').is_some_and(|(m, n)| digits(m) && digits(n));
    }
    false
}
