//! Multi-target emission
//!
//! Every artifact is rendered from one [`Registry`] snapshot, in registry order:
//!
//! - `contracts/utils/Address.sol`: Solidity library of address constants
//! - `contracts/utils/Address.js`: JavaScript module of address constants
//! - `contracts/utils/Address.d.ts`: literal-type declarations derived from `Address.js`
//! - `resources/bytecodes.json`: `[name, address, bytecode]` manifest
//!
//! All targets are rendered in memory first and only then written, so a rendering
//! failure leaves every file on disk untouched.

pub mod declarations;

pub use declarations::{derive_declarations, parse_constants, parse_declarations, JsConstant};

use futures_util::future::try_join_all;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::{ADDRESS_CONSTANTS_DIR, ADDRESS_LIBRARY_NAME, BYTECODE_MANIFEST_PATH};
use crate::errors::{Error, Result};
use crate::registry::Registry;
use crate::template::{Binding, Template};

/// Entry placeholder for the registry name
pub const NAME_PLACEHOLDER: &str = "{{name}}";
/// Entry placeholder for the checksummed address
pub const ADDRESS_PLACEHOLDER: &str = "{{address}}";

/// Header, per-entry template and footer of a constants file
#[derive(Debug, Clone)]
pub struct ConstantsTemplate {
    /// Text before the first entry
    pub header: String,
    /// Rendered once per registry entry
    pub entry: Template,
    /// Text after the last entry
    pub footer: String,
}

impl ConstantsTemplate {
    /// Solidity library of `address public constant` declarations
    pub fn solidity() -> Self {
        Self {
            header: format!(
                "// SPDX-License-Identifier: GPL-3.0-or-later\n\
                 // Generated by predeploy-registry. Do not edit.\n\
                 \n\
                 pragma solidity ^0.6.0;\n\
                 \n\
                 library {ADDRESS_LIBRARY_NAME} {{\n"
            ),
            entry: Template::new(
                "Address.sol",
                "    address public constant {{name}} = {{address}};\n",
            ),
            footer: "}\n".to_string(),
        }
    }

    /// JavaScript module of exported string constants
    pub fn javascript() -> Self {
        Self {
            header: "// Generated by predeploy-registry. Do not edit.\n\n".to_string(),
            entry: Template::new("Address.js", "export const {{name}} = \"{{address}}\";\n"),
            footer: String::new(),
        }
    }
}

/// Render one constants file from the registry.
pub fn emit(registry: &Registry, template: &ConstantsTemplate) -> Result<String> {
    let mut out = template.header.clone();
    for entry in registry {
        let bindings = [
            Binding::new(NAME_PLACEHOLDER, entry.name.as_str()),
            Binding::new(ADDRESS_PLACEHOLDER, entry.checksummed_address()),
        ];
        out.push_str(&template.entry.render(template.entry.label(), &bindings)?);
    }
    out.push_str(&template.footer);
    Ok(out)
}

/// Render the bytecode manifest as pretty JSON.
pub fn emit_manifest(registry: &Registry) -> Result<String> {
    let triples: Vec<_> = registry
        .iter()
        .map(|e| (e.name.as_str(), e.checksummed_address(), &e.bytecode))
        .collect();
    let mut json = serde_json::to_string_pretty(&triples)
        .map_err(|e| Error::emission("bytecodes.json", e.to_string()))?;
    json.push('\n');
    Ok(json)
}

/// A rendered file and where it goes, relative to the project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    /// Path relative to the project root
    pub path: PathBuf,
    /// File contents
    pub contents: String,
}

impl OutputFile {
    /// Create an output file
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self { path: path.into(), contents: contents.into() }
    }
}

/// Every artifact rendered from one registry snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedArtifacts {
    /// Solidity constants
    pub solidity: OutputFile,
    /// JavaScript constants
    pub javascript: OutputFile,
    /// TypeScript declarations derived from the JavaScript constants
    pub declarations: OutputFile,
    /// Bytecode manifest
    pub manifest: OutputFile,
}

impl EmittedArtifacts {
    /// Render all targets and cross-check them against the registry.
    pub fn render(registry: &Registry) -> Result<Self> {
        let solidity = emit(registry, &ConstantsTemplate::solidity())?;
        let javascript = emit(registry, &ConstantsTemplate::javascript())?;
        let declarations = derive_declarations(&javascript)?;
        let manifest = emit_manifest(registry)?;

        check_consistency(registry, &javascript, &declarations)?;

        let dir = Path::new(ADDRESS_CONSTANTS_DIR);
        Ok(Self {
            solidity: OutputFile::new(dir.join("Address.sol"), solidity),
            javascript: OutputFile::new(dir.join("Address.js"), javascript),
            declarations: OutputFile::new(dir.join("Address.d.ts"), declarations),
            manifest: OutputFile::new(BYTECODE_MANIFEST_PATH, manifest),
        })
    }

    /// Files in write order
    pub fn files(&self) -> [&OutputFile; 4] {
        [&self.solidity, &self.javascript, &self.declarations, &self.manifest]
    }

    /// Write every artifact under `root`.
    pub async fn write(&self, root: &Path) -> Result<Vec<PathBuf>> {
        write_files(root, self.files()).await
    }
}

/// The JavaScript and declaration files must carry exactly the registry's names and
/// addresses, in registry order.
fn check_consistency(registry: &Registry, javascript: &str, declarations: &str) -> Result<()> {
    let expected: Vec<_> = registry
        .iter()
        .map(|e| JsConstant { name: e.name.clone(), value: e.checksummed_address() })
        .collect();

    if parse_constants(javascript)? != expected {
        return Err(Error::emission("Address.js", "constants do not match the registry"));
    }
    if parse_declarations(declarations)? != expected {
        return Err(Error::emission("Address.d.ts", "declarations do not match the registry"));
    }
    Ok(())
}

/// Write files under `root` concurrently, creating parent directories.
///
/// Each file is written to a sibling temporary file and renamed into place.
pub async fn write_files<'a>(
    root: &Path,
    files: impl IntoIterator<Item = &'a OutputFile>,
) -> Result<Vec<PathBuf>> {
    try_join_all(files.into_iter().map(|file| write_file(root, file))).await
}

async fn write_file(root: &Path, file: &OutputFile) -> Result<PathBuf> {
    let path = root.join(&file.path);
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|e| Error::io(parent, e))?;
    }

    let file_name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    let tmp = path.with_file_name(format!(".{file_name}.tmp"));
    tokio::fs::write(&tmp, &file.contents).await.map_err(|e| Error::io(&tmp, e))?;
    tokio::fs::rename(&tmp, &path).await.map_err(|e| Error::io(&path, e))?;

    debug!(target: "emit", path = %path.display(), bytes = file.contents.len(), "wrote file");
    Ok(path)
}
