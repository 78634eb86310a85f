//! # Predeploy Registry Generator
//!
//! Allocates deterministic addresses for predeployed contracts, specializes the
//! generic token contract per mirrored token, collects compiled bytecode, and emits
//! one consistent registry as Solidity, JavaScript, TypeScript declarations and a
//! JSON bytecode manifest.

pub mod cli;
pub mod compiler;
pub mod constants;
pub mod errors;
pub mod emit;
pub mod output;
pub mod pipeline;
pub mod registry;
pub mod template;
pub mod tokens;
pub mod zones;

#[cfg(test)]
mod test_utils;
