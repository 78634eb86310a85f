use clap::Parser;
use std::path::PathBuf;

use crate::compiler::BytecodeKind;
use crate::constants::{DEFAULT_BUILD_DIR, DEFAULT_TOKENS_PATH, DEFAULT_TOKEN_TEMPLATE_PATH};
use crate::pipeline::GenerateConfig;

/// CLI arguments for the predeploy registry generator
#[derive(Parser, Debug)]
#[command(
    name = "predeploy-registry",
    about = "Generate predeploy addresses, token contracts and bytecode manifests"
)]
pub struct Cli {
    /// Contracts project root
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Token configuration file, relative to the root
    #[arg(long, default_value = DEFAULT_TOKENS_PATH)]
    pub tokens: PathBuf,

    /// Generic token contract template, relative to the root
    #[arg(long, default_value = DEFAULT_TOKEN_TEMPLATE_PATH)]
    pub template: PathBuf,

    /// Directory the compiler writes `{Contract}.json` artifacts to, relative to the root
    #[arg(long, default_value = DEFAULT_BUILD_DIR)]
    pub build_dir: PathBuf,

    /// Command run before artifacts are read (e.g. `--compile-cmd npx,truffle,compile`).
    /// When omitted, existing artifacts are read as-is.
    #[arg(long, value_delimiter = ',')]
    pub compile_cmd: Option<Vec<String>>,

    /// Bytecode recorded in the manifest
    #[arg(long, value_enum, default_value_t = BytecodeKind::Deployed)]
    pub bytecode: BytecodeKind,

    /// Skip both compile phases; the manifest carries empty bytecode
    #[arg(long)]
    pub skip_compile: bool,

    /// Emit logs as JSON lines instead of human-readable text
    #[arg(long)]
    pub log_json: bool,
}

impl Cli {
    /// Pipeline configuration described by these arguments
    pub fn generate_config(&self) -> GenerateConfig {
        GenerateConfig::new(&self.root)
            .with_tokens_path(&self.tokens)
            .with_template_path(&self.template)
            .with_bytecode(self.bytecode)
            .with_compile(!self.skip_compile)
    }
}
