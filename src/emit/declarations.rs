//! TypeScript declarations derived from the emitted JavaScript constants
//!
//! Declarations are not rendered from the registry directly: they are read back from
//! the JavaScript text so the two files cannot disagree. Each constant becomes its own
//! string-literal type, which keeps two addresses from being interchangeable at the
//! type level.

use crate::errors::{Error, Result};

/// Target label used in errors
const TARGET: &str = "Address.d.ts";

/// A `name = "literal"` constant read from the JavaScript artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsConstant {
    /// Exported identifier
    pub name: String,
    /// String literal value, without quotes
    pub value: String,
}

/// Parse `export const NAME = "VALUE";` lines. Blank lines and `//` comments are
/// skipped; anything else is an emission error.
pub fn parse_constants(js: &str) -> Result<Vec<JsConstant>> {
    js.lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with("//")
        })
        .map(|(index, line)| {
            parse_line(line.trim()).ok_or_else(|| {
                Error::emission(TARGET, format!("unrecognised line {}: `{line}`", index + 1))
            })
        })
        .collect()
}

fn parse_line(line: &str) -> Option<JsConstant> {
    let rest = line.strip_prefix("export const ")?;
    let (name, value) = rest.split_once('=')?;
    let value = value.trim().strip_suffix(';')?.trim();
    let value = value.strip_prefix('"')?.strip_suffix('"')?;
    let name = name.trim();
    if name.is_empty() || value.contains('"') {
        return None;
    }
    Some(JsConstant { name: name.to_string(), value: value.to_string() })
}

/// Derive the declaration file from the JavaScript constants text.
pub fn derive_declarations(js: &str) -> Result<String> {
    let constants = parse_constants(js)?;

    let mut out = String::new();
    for JsConstant { name, value } in &constants {
        out.push_str(&format!("export const {name}: \"{value}\";\n"));
    }
    Ok(out)
}

/// Parse `export const NAME: "VALUE";` declaration lines.
pub fn parse_declarations(dts: &str) -> Result<Vec<JsConstant>> {
    dts.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let line = line.trim();
            line.strip_prefix("export const ")
                .and_then(|rest| rest.split_once(':'))
                .and_then(|(name, ty)| {
                    let ty = ty.trim().strip_suffix(';')?.trim();
                    let value = ty.strip_prefix('"')?.strip_suffix('"')?;
                    Some(JsConstant { name: name.trim().to_string(), value: value.to_string() })
                })
                .ok_or_else(|| Error::emission(TARGET, format!("unrecognised declaration `{line}`")))
        })
        .collect()
}
