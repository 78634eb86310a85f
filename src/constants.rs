/// Ethereum address length (20 bytes)
pub const ADDRESS_LENGTH: usize = 20;

/// Start of the Ethereum precompile range
pub const ETHEREUM_PRECOMPILES_START: u128 = 0x0;
/// Start of the runtime's own precompiles
pub const RUNTIME_PRECOMPILES_START: u128 = 0x400;
/// Start of the predeployed system contracts (except mirrored tokens)
pub const PREDEPLOY_ADDRESS_START: u128 = 0x800;
/// Start of the mirrored fungible token range (offset = currency id)
pub const MIRRORED_TOKENS_ADDRESS_START: u128 = 0x0100_0000;
/// Start of the mirrored NFT range
pub const MIRRORED_NFT_ADDRESS_START: u128 = 0x0200_0000;
/// Start of the mirrored liquidity-pool token range
pub const MIRRORED_LP_TOKENS_ADDRESS_START: u128 = 1 << 64;

/// Bit position of the first currency id inside a packed LP offset
pub const LP_FIRST_ID_SHIFT: u32 = 32;

/// Byte shift applied to a currency id to form its on-chain 256-bit constant
pub const CURRENCY_ID_WORD_SHIFT: usize = 8;

/// Directory (relative to the project root) for specialized token sources
pub const SPECIALIZED_CONTRACTS_DIR: &str = "contracts/tmp";
/// Directory (relative to the project root) for the emitted address constants
pub const ADDRESS_CONSTANTS_DIR: &str = "contracts/utils";
/// Bytecode manifest path (relative to the project root)
pub const BYTECODE_MANIFEST_PATH: &str = "resources/bytecodes.json";
/// Default token configuration path (relative to the project root)
pub const DEFAULT_TOKENS_PATH: &str = "resources/tokens.json";
/// Default generic token template path (relative to the project root)
pub const DEFAULT_TOKEN_TEMPLATE_PATH: &str = "contracts/token/Token.sol";
/// Default compiler artifact directory (relative to the project root)
pub const DEFAULT_BUILD_DIR: &str = "build/contracts";

/// Name of the Solidity library holding the emitted address constants
pub const ADDRESS_LIBRARY_NAME: &str = "ADDRESS";
