//! Per-token specialization of the generic ERC20 template
//!
//! The template is a compilable Solidity contract whose token-specific constants are
//! sentinel values. Each sentinel line is a placeholder bound to a value derived from
//! the [`TokenDescriptor`].

use alloy_primitives::U256;

use super::{Binding, Template};
use crate::constants::CURRENCY_ID_WORD_SHIFT;
use crate::errors::Result;
use crate::tokens::TokenDescriptor;

/// Generic contract declaration in the template
pub const CONTRACT_PLACEHOLDER: &str = "contract ERC20 is IERC20";
/// Relative import of the multi-currency precompile wrapper
pub const MULTI_CURRENCY_IMPORT_PLACEHOLDER: &str = r#"import "./MultiCurrency.sol";"#;
/// Relative import of the multi-currency interface
pub const MULTI_CURRENCY_INTERFACE_IMPORT_PLACEHOLDER: &str = r#"import "./IMultiCurrency.sol";"#;
/// Currency id sentinel
pub const CURRENCY_ID_PLACEHOLDER: &str = "uint256 private constant _currencyId = 0xffff;";
/// Display name sentinel
pub const NAME_PLACEHOLDER: &str = r#"string private constant _name = "TEMPLATE";"#;
/// Symbol sentinel
pub const SYMBOL_PLACEHOLDER: &str = r#"string private constant _symbol = "TEMP";"#;
/// Decimals sentinel
pub const DECIMALS_PLACEHOLDER: &str = "uint8 private constant _decimals = 0;";

/// A token contract ready to be handed to the compiler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecializedContract {
    /// Contract name, `{symbol}ERC20`
    pub contract_name: String,
    /// Source file name, `{symbol}ERC20.sol`
    pub file_name: String,
    /// Specialized Solidity source
    pub source: String,
}

/// On-chain currency id constant.
///
/// The runtime reads the currency id from a 256-bit word in which bytes 29 and 31 must
/// be zero, so the 8-bit id is shifted one byte to the left (byte 30 of the big-endian
/// word).
pub fn currency_id_word(currency_id: u8) -> U256 {
    U256::from(currency_id) << CURRENCY_ID_WORD_SHIFT
}

/// Specialize the generic token template for one token.
pub fn specialize(template: &Template, token: &TokenDescriptor) -> Result<SpecializedContract> {
    let contract_name = token.contract_name();
    let word = currency_id_word(token.currency_id);

    let bindings = [
        Binding::new(CONTRACT_PLACEHOLDER, format!("contract {contract_name} is IERC20")),
        Binding::new(
            MULTI_CURRENCY_IMPORT_PLACEHOLDER,
            r#"import "../token/MultiCurrency.sol";"#,
        ),
        Binding::new(
            MULTI_CURRENCY_INTERFACE_IMPORT_PLACEHOLDER,
            r#"import "../token/IMultiCurrency.sol";"#,
        ),
        Binding::new(
            CURRENCY_ID_PLACEHOLDER,
            format!("uint256 private constant _currencyId = {word:#x};"),
        ),
        Binding::new(
            NAME_PLACEHOLDER,
            format!(r#"string private constant _name = "{}";"#, escape_string(&token.name)),
        ),
        Binding::new(
            SYMBOL_PLACEHOLDER,
            format!(r#"string private constant _symbol = "{}";"#, token.symbol),
        ),
        Binding::new(
            DECIMALS_PLACEHOLDER,
            format!("uint8 private constant _decimals = {};", token.decimals),
        ),
    ];

    let source = template.render(&contract_name, &bindings)?;

    Ok(SpecializedContract { file_name: format!("{contract_name}.sol"), contract_name, source })
}

/// Escape a value for a Solidity double-quoted string literal
fn escape_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
