use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

use super::{Artifacts, CompiledContract, Compiler, ContractSource};
use crate::errors::{Error, Result};

/// Compiler adapter for toolchains that write one JSON artifact per contract
/// (`{build_dir}/{Contract}.json` with `bytecode` and `deployedBytecode`), such as
/// truffle.
///
/// The optional command runs in the project root before artifacts are read. Without
/// a command, artifacts are expected to exist already.
#[derive(Debug, Clone)]
pub struct ArtifactCompiler {
    /// Project root the command runs in
    root: PathBuf,
    /// Artifact directory, relative to `root` unless absolute
    build_dir: PathBuf,
    /// Program and arguments, e.g. `["yarn", "truffle-compile"]`
    command: Option<Vec<String>>,
}

impl ArtifactCompiler {
    /// Create an adapter reading artifacts from `build_dir`.
    pub fn new(root: impl AsRef<Path>, build_dir: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            build_dir: build_dir.as_ref().to_path_buf(),
            command: None,
        }
    }

    /// Builder method to set the compile command
    pub fn with_command(mut self, command: Vec<String>) -> Self {
        self.command = (!command.is_empty()).then_some(command);
        self
    }

    fn artifact_path(&self, name: &str) -> PathBuf {
        self.root.join(&self.build_dir).join(format!("{name}.json"))
    }

    async fn run_command(&self, command: &[String]) -> Result<()> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| Error::Compile("empty compile command".into()))?;

        info!(target: "compiler", command = %command.join(" "), "running compiler");
        let output = Command::new(program)
            .args(args)
            .current_dir(&self.root)
            .output()
            .await
            .map_err(|e| Error::Compile(format!("failed to spawn `{program}`: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Compile(format!(
                "`{}` exited with {}: {}",
                command.join(" "),
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Compiler for ArtifactCompiler {
    async fn compile(&self, sources: &[ContractSource]) -> Result<Artifacts> {
        if let Some(command) = &self.command {
            self.run_command(command).await?;
        }

        let mut artifacts = Artifacts::default();
        for source in sources {
            let path = self.artifact_path(&source.name);
            let json = tokio::fs::read_to_string(&path).await.map_err(|e| {
                Error::Compile(format!(
                    "missing artifact for `{}` ({}) at {}: {e}",
                    source.name,
                    source.path.display(),
                    path.display()
                ))
            })?;
            let contract: CompiledContract = serde_json::from_str(&json).map_err(|e| {
                Error::Compile(format!("malformed artifact {}: {e}", path.display()))
            })?;
            debug!(
                target: "compiler",
                contract = %source.name,
                deployed_len = contract.deployed_bytecode.len(),
                "loaded artifact"
            );
            artifacts.insert(source.name.clone(), contract);
        }
        Ok(artifacts)
    }
}
