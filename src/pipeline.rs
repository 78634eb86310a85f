//! Generation pipeline
//!
//! ```text
//! load config -> allocate -> specialize -> write sources
//!     -> compile (phase 1) -> build registry -> render all targets -> write targets
//!     -> compile emitted constants (phase 2)
//! ```
//!
//! Every write is awaited before the stage that reads it starts. Allocation and
//! conflict checks run before anything touches the filesystem.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::compiler::{Artifacts, BytecodeKind, Compiler, ContractSource};
use crate::constants::{
    ADDRESS_CONSTANTS_DIR, ADDRESS_LIBRARY_NAME, DEFAULT_TOKENS_PATH, DEFAULT_TOKEN_TEMPLATE_PATH,
    SPECIALIZED_CONTRACTS_DIR,
};
use crate::emit::{write_files, EmittedArtifacts, OutputFile};
use crate::errors::{Error, Result};
use crate::registry::{Registry, RegistryEntry, SystemContract, SYSTEM_CONTRACTS};
use crate::template::{specialize, SpecializedContract, Template};
use crate::tokens::TokenConfig;

/// Immutable configuration of one generation run
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Contracts project root; relative paths below resolve against it
    pub root: PathBuf,
    /// Token configuration file
    pub tokens_path: PathBuf,
    /// Generic token contract template
    pub template_path: PathBuf,
    /// Bytecode recorded in the registry
    pub bytecode: BytecodeKind,
    /// Run both compiler phases; when false every entry gets empty bytecode
    pub compile: bool,
    /// System contracts in declaration order
    pub(crate) system_contracts: &'static [SystemContract],
}

impl GenerateConfig {
    /// Default layout under `root`
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            tokens_path: PathBuf::from(DEFAULT_TOKENS_PATH),
            template_path: PathBuf::from(DEFAULT_TOKEN_TEMPLATE_PATH),
            bytecode: BytecodeKind::default(),
            compile: true,
            system_contracts: SYSTEM_CONTRACTS,
        }
    }

    /// Builder method to set the token configuration file
    pub fn with_tokens_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.tokens_path = path.into();
        self
    }

    /// Builder method to set the token template
    pub fn with_template_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.template_path = path.into();
        self
    }

    /// Builder method to select creation or deployed bytecode
    pub fn with_bytecode(mut self, kind: BytecodeKind) -> Self {
        self.bytecode = kind;
        self
    }

    /// Builder method to enable or skip compilation
    pub fn with_compile(mut self, compile: bool) -> Self {
        self.compile = compile;
        self
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct GenerateReport {
    /// The registry every artifact was rendered from
    pub registry: Registry,
    /// Specialized token sources written
    pub sources: Vec<PathBuf>,
    /// Emitted artifacts written
    pub outputs: Vec<PathBuf>,
}

/// Run the whole pipeline.
pub async fn run(config: &GenerateConfig, compiler: &dyn Compiler) -> Result<GenerateReport> {
    let tokens_path = config.resolve(&config.tokens_path);
    let json = tokio::fs::read_to_string(&tokens_path)
        .await
        .map_err(|e| Error::io(&tokens_path, e))?;
    let tokens = TokenConfig::from_json_str(&json)?;
    info!(
        target: "pipeline",
        tokens = tokens.tokens.len(),
        lp_pairs = tokens.lp_pairs.len(),
        "loaded token configuration"
    );

    // Allocation and conflict checks, before any file is written
    let planned = assemble(&tokens, config.system_contracts, None, config.bytecode)?;
    info!(target: "pipeline", entries = planned.len(), "allocated addresses");

    let template_path = config.resolve(&config.template_path);
    let template_text = tokio::fs::read_to_string(&template_path)
        .await
        .map_err(|e| Error::io(&template_path, e))?;
    let template = Template::new(template_path.display().to_string(), template_text);
    let specialized = tokens
        .tokens
        .iter()
        .map(|token| specialize(&template, token))
        .collect::<Result<Vec<_>>>()?;
    info!(target: "pipeline", contracts = specialized.len(), "specialized token contracts");

    let source_files: Vec<_> = specialized.iter().map(source_file).collect();
    let sources = write_files(&config.root, &source_files).await?;

    let registry = if config.compile {
        let artifacts = compiler.compile(&phase_one_sources(config, &specialized)).await?;
        info!(target: "pipeline", artifacts = artifacts.len(), "compile phase 1 finished");
        assemble(&tokens, config.system_contracts, Some(&artifacts), config.bytecode)?
    } else {
        info!(target: "pipeline", "compilation skipped, registry carries empty bytecode");
        planned
    };

    let emitted = EmittedArtifacts::render(&registry)?;
    let outputs = emitted.write(&config.root).await?;
    info!(target: "pipeline", files = outputs.len(), "emitted artifacts");

    if config.compile {
        let constants = ContractSource::new(
            ADDRESS_LIBRARY_NAME,
            Path::new(ADDRESS_CONSTANTS_DIR).join("Address.sol"),
        );
        let artifacts = compiler.compile(std::slice::from_ref(&constants)).await?;
        artifacts.get(ADDRESS_LIBRARY_NAME)?;
        info!(target: "pipeline", "compile phase 2 finished");
    }

    Ok(GenerateReport { registry, sources, outputs })
}

/// Build the registry; without artifacts every entry has empty bytecode.
fn assemble(
    tokens: &TokenConfig,
    system_contracts: &[SystemContract],
    artifacts: Option<&Artifacts>,
    kind: BytecodeKind,
) -> Result<Registry> {
    let code = |name: &str| -> Result<_> {
        Ok(match artifacts {
            Some(artifacts) => artifacts.get(name)?.code(kind).clone(),
            None => Default::default(),
        })
    };

    let mut token_entries = Vec::with_capacity(tokens.tokens.len() + tokens.lp_pairs.len());
    for token in &tokens.tokens {
        let entry = RegistryEntry::token(token, code(&token.contract_name())?)?;
        debug!(target: "pipeline", name = %entry.name, address = %entry.address, "token");
        token_entries.push(entry);
    }
    for pair in &tokens.lp_pairs {
        let entry = RegistryEntry::lp(pair)?;
        debug!(target: "pipeline", name = %entry.name, address = %entry.address, "lp token");
        token_entries.push(entry);
    }

    let system_entries = system_contracts
        .iter()
        .map(|contract| RegistryEntry::system(contract, code(contract.name)?))
        .collect::<Result<Vec<_>>>()?;

    Registry::build(token_entries, system_entries)
}

fn source_file(contract: &SpecializedContract) -> OutputFile {
    OutputFile::new(
        Path::new(SPECIALIZED_CONTRACTS_DIR).join(&contract.file_name),
        contract.source.as_str(),
    )
}

fn phase_one_sources(
    config: &GenerateConfig,
    specialized: &[SpecializedContract],
) -> Vec<ContractSource> {
    specialized
        .iter()
        .map(|c| {
            ContractSource::new(
                c.contract_name.as_str(),
                Path::new(SPECIALIZED_CONTRACTS_DIR).join(&c.file_name),
            )
        })
        .chain(config.system_contracts.iter().map(SystemContract::contract_source))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::ArtifactCompiler;
    use crate::constants::{BYTECODE_MANIFEST_PATH, DEFAULT_BUILD_DIR};
    use crate::test_utils::{MockCompiler, TOKENS_JSON, TOKEN_TEMPLATE};
    use crate::zones::Zone;
    use alloy_primitives::{address, bytes};

    fn project() -> tempfile::TempDir {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(root.path().join("resources")).unwrap();
        std::fs::create_dir_all(root.path().join("contracts/token")).unwrap();
        std::fs::write(root.path().join(DEFAULT_TOKENS_PATH), TOKENS_JSON).unwrap();
        std::fs::write(root.path().join(DEFAULT_TOKEN_TEMPLATE_PATH), TOKEN_TEMPLATE).unwrap();
        root
    }

    fn read(root: &Path, rel: impl AsRef<Path>) -> String {
        std::fs::read_to_string(root.join(rel)).unwrap()
    }

    #[tokio::test]
    async fn test_full_run() {
        let root = project();
        let compiler = MockCompiler::new();
        let report = run(&GenerateConfig::new(root.path()), &compiler).await.unwrap();

        assert_eq!(report.registry.len(), 13);
        assert_eq!(report.sources.len(), 6);
        assert_eq!(report.outputs.len(), 4);

        let setm = report.registry.get("SETM").unwrap();
        assert_eq!(setm.address, address!("0000000000000000000000000000000001000000"));
        assert_eq!(setm.bytecode, MockCompiler::deployed_code_for("SETMERC20"));
        let oracle = report.registry.get("Oracle").unwrap();
        assert_eq!(oracle.bytecode, MockCompiler::deployed_code_for("Oracle"));
        assert!(report.registry.get("LP_SETM_SETUSD").unwrap().bytecode.is_empty());

        let source = read(root.path(), "contracts/tmp/SETUSDERC20.sol");
        assert!(source.contains("contract SETUSDERC20 is IERC20"));
        assert!(source.contains("_currencyId = 0x500;"));
    }

    #[tokio::test]
    async fn test_two_compile_phases_with_write_barrier() {
        let root = project();
        let compiler = MockCompiler::with_root(root.path());
        run(&GenerateConfig::new(root.path()), &compiler).await.unwrap();

        let calls = compiler.calls();
        assert_eq!(calls.len(), 2);

        // Phase 1 sees every specialized source already on disk
        let phase_one = &calls[0];
        assert_eq!(phase_one.len(), 6 + SYSTEM_CONTRACTS.len());
        for (name, on_disk) in phase_one.iter().filter(|(n, _)| n.ends_with("ERC20")) {
            assert!(on_disk, "{name} not written before compile");
        }

        // Phase 2 compiles the freshly emitted constants
        assert_eq!(calls[1], vec![(ADDRESS_LIBRARY_NAME.to_string(), true)]);
    }

    #[tokio::test]
    async fn test_run_is_idempotent() {
        let root = project();
        let config = GenerateConfig::new(root.path());
        let files = [
            "contracts/utils/Address.sol",
            "contracts/utils/Address.js",
            "contracts/utils/Address.d.ts",
            BYTECODE_MANIFEST_PATH,
            "contracts/tmp/SETMERC20.sol",
        ];

        run(&config, &MockCompiler::new()).await.unwrap();
        let first: Vec<_> = files.iter().map(|f| read(root.path(), f)).collect();
        run(&config, &MockCompiler::new()).await.unwrap();
        let second: Vec<_> = files.iter().map(|f| read(root.path(), f)).collect();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_skip_compile_emits_placeholders() {
        let root = project();
        let compiler = MockCompiler::new();
        let config = GenerateConfig::new(root.path()).with_compile(false);
        let report = run(&config, &compiler).await.unwrap();

        assert!(compiler.calls().is_empty());
        assert!(report.registry.iter().all(|e| e.bytecode.is_empty()));
        let manifest: serde_json::Value =
            serde_json::from_str(&read(root.path(), BYTECODE_MANIFEST_PATH)).unwrap();
        assert_eq!(manifest[0][2], "0x");
    }

    #[tokio::test]
    async fn test_duplicate_symbol_aborts_before_writing() {
        let root = project();
        let json = r#"[
            { "name": "A", "symbol": "SETM", "decimals": 12, "currencyId": 0 },
            { "name": "B", "symbol": "SETM", "decimals": 12, "currencyId": 1 }
        ]"#;
        std::fs::write(root.path().join(DEFAULT_TOKENS_PATH), json).unwrap();

        let err = run(&GenerateConfig::new(root.path()), &MockCompiler::new()).await.unwrap_err();
        assert!(matches!(err, Error::InputValidation { .. }));
        assert!(!root.path().join("contracts/tmp").exists());
        assert!(!root.path().join("contracts/utils").exists());
    }

    #[tokio::test]
    async fn test_allocation_overflow_aborts_before_writing() {
        static OVERFLOWING: &[SystemContract] = &[
            SystemContract { name: "Token", offset: 0, source: "contracts/system/Token.sol" },
            SystemContract { name: "Beyond", offset: 0x800, source: "contracts/Beyond.sol" },
        ];
        let root = project();
        let mut config = GenerateConfig::new(root.path());
        config.system_contracts = OVERFLOWING;

        let compiler = MockCompiler::new();
        let err = run(&config, &compiler).await.unwrap_err();
        assert!(matches!(err, Error::AllocationOverflow { zone: Zone::SystemContracts, .. }));
        assert!(compiler.calls().is_empty());
        assert!(!root.path().join("contracts/tmp").exists());
        assert!(!root.path().join(BYTECODE_MANIFEST_PATH).exists());
    }

    #[tokio::test]
    async fn test_currency_collision_is_registry_conflict() {
        let root = project();
        let json = r#"[
            { "name": "A", "symbol": "AAA", "decimals": 12, "currencyId": 9 },
            { "name": "B", "symbol": "BBB", "decimals": 12, "currencyId": 9 }
        ]"#;
        std::fs::write(root.path().join(DEFAULT_TOKENS_PATH), json).unwrap();

        let err = run(&GenerateConfig::new(root.path()), &MockCompiler::new()).await.unwrap_err();
        assert!(matches!(err, Error::RegistryConflict(_)));
        assert!(!root.path().join("contracts/utils").exists());
    }

    #[tokio::test]
    async fn test_phase_one_compile_failure_leaves_outputs_untouched() {
        let root = project();
        let compiler = MockCompiler::new().failing_on("DEX");
        let err = run(&GenerateConfig::new(root.path()), &compiler).await.unwrap_err();
        assert!(matches!(err, Error::Compile(_)));
        assert!(!root.path().join("contracts/utils/Address.js").exists());
        assert!(!root.path().join(BYTECODE_MANIFEST_PATH).exists());
    }

    #[tokio::test]
    async fn test_missing_constants_artifact_fails_phase_two() {
        let root = project();
        let compiler = MockCompiler::new().failing_on(ADDRESS_LIBRARY_NAME);
        let err = run(&GenerateConfig::new(root.path()), &compiler).await.unwrap_err();
        assert!(matches!(err, Error::Compile(ref msg) if msg.contains(ADDRESS_LIBRARY_NAME)));
    }

    #[tokio::test]
    async fn test_edited_template_fails_before_compile() {
        let root = project();
        let edited = TOKEN_TEMPLATE.replace("_decimals = 0;", "_decimals = 18;");
        std::fs::write(root.path().join(DEFAULT_TOKEN_TEMPLATE_PATH), edited).unwrap();

        let compiler = MockCompiler::new();
        let err = run(&GenerateConfig::new(root.path()), &compiler).await.unwrap_err();
        assert!(matches!(err, Error::TemplateMismatch { .. }));
        assert!(compiler.calls().is_empty());
    }

    #[tokio::test]
    async fn test_creation_bytecode_selected() {
        let root = project();
        let deployed = run(&GenerateConfig::new(root.path()), &MockCompiler::new()).await.unwrap();
        let config = GenerateConfig::new(root.path()).with_bytecode(BytecodeKind::Creation);
        let creation = run(&config, &MockCompiler::new()).await.unwrap();

        for (name, contract) in [("SETM", "SETMERC20"), ("DEX", "DEX")] {
            let d = &deployed.registry.get(name).unwrap().bytecode;
            let c = &creation.registry.get(name).unwrap().bytecode;
            assert_eq!(d, &MockCompiler::deployed_code_for(contract), "{name}");
            assert_eq!(c, &MockCompiler::creation_code_for(contract), "{name}");
            assert_ne!(c, d, "{name}");
        }

        let manifest: serde_json::Value =
            serde_json::from_str(&read(root.path(), BYTECODE_MANIFEST_PATH)).unwrap();
        assert_eq!(manifest[0][2], MockCompiler::creation_code_for("SETMERC20").to_string());
    }

    #[tokio::test]
    async fn test_run_with_artifact_compiler() {
        let root = project();
        let build = root.path().join(DEFAULT_BUILD_DIR);
        std::fs::create_dir_all(&build).unwrap();
        let names = ["SETMERC20", "SERPERC20", "DNARERC20", "HELPERC20", "SETRERC20", "SETUSDERC20"]
            .into_iter()
            .chain(SYSTEM_CONTRACTS.iter().map(|c| c.name))
            .chain([ADDRESS_LIBRARY_NAME]);
        for name in names {
            let artifact = serde_json::json!({
                "contractName": name,
                "bytecode": "0x6080",
                "deployedBytecode": "0x6001",
            });
            std::fs::write(build.join(format!("{name}.json")), artifact.to_string()).unwrap();
        }

        let compiler = ArtifactCompiler::new(root.path(), DEFAULT_BUILD_DIR);
        let report = run(&GenerateConfig::new(root.path()), &compiler).await.unwrap();
        assert_eq!(report.registry.get("Token").unwrap().bytecode, bytes!("6001"));
        assert_eq!(report.registry.get("SETUSD").unwrap().bytecode, bytes!("6001"));
    }

    #[tokio::test]
    async fn test_missing_tokens_file_is_io_error() {
        let root = tempfile::tempdir().unwrap();
        let err = run(&GenerateConfig::new(root.path()), &MockCompiler::new()).await.unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
