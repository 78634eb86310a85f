//! Colored console output for the generator.
//!
//! Color scheme: blue+bold headers, cyan values, green success,
//! yellow warnings, dimmed secondary text.

use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::registry::{Registry, RegistryEntry};

// ── Helpers ────────────────────────────────────────────────────────

/// Format a bytecode length for display: `-` for entries without code.
pub fn format_code_size(len: usize) -> String {
    match len {
        0 => "-".to_string(),
        n if n < 1024 => format!("{n} B"),
        n => format!("{:.1} KiB", n as f64 / 1024.0),
    }
}

/// Path relative to `root` when possible
fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

// ── Banner ─────────────────────────────────────────────────────────

/// Print the startup banner.
pub fn print_banner(root: &Path, compile: bool) {
    println!();
    println!("{}", "=== Predeploy Registry Generator ===".blue().bold());
    println!("  Project root: {}", root.display().to_string().cyan());
    if !compile {
        println!(
            "  {} Compilation skipped. Bytecode manifest will be empty.",
            "WARNING:".yellow().bold()
        );
    }
}

// ── Registry ───────────────────────────────────────────────────────

/// Print one registry row.
fn print_entry(entry: &RegistryEntry, name_width: usize) {
    println!(
        "  {}  {}  {:>9}  {}",
        format!("{:<name_width$}", entry.name).cyan(),
        entry.checksummed_address(),
        format_code_size(entry.bytecode.len()),
        entry.zone.to_string().dimmed(),
    );
}

/// Print the registry in canonical order.
pub fn print_registry(registry: &Registry) {
    let width = registry.iter().map(|e| e.name.len()).max().unwrap_or(0);
    println!();
    println!(
        "{} ({} entries)",
        "Registry:".blue().bold(),
        registry.len().to_string().cyan()
    );
    for entry in registry {
        print_entry(entry, width);
    }
}

// ── Files ──────────────────────────────────────────────────────────

/// Print a list of written files under a heading.
pub fn print_written(heading: &str, root: &Path, paths: &[PathBuf]) {
    println!();
    println!("{}", heading.blue().bold());
    for path in paths {
        println!("  {} {}", "OK".green().bold(), display_path(root, path));
    }
}

/// Print the final success line.
pub fn print_done(entries: usize) {
    println!();
    println!(
        "  {} Generated {} predeploy entries",
        "DONE".green().bold(),
        entries.to_string().cyan()
    );
}

/// Print a fatal error.
pub fn print_error(err: &dyn std::fmt::Display) {
    eprintln!("  {} {}", "ERROR".red().bold(), err);
}

// ── Tests ───────────────────────────────────────────────────────────
