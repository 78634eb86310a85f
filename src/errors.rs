use alloy_primitives::Address;
use std::path::PathBuf;
use thiserror::Error;

use crate::zones::Zone;

/// Result alias used across the generator
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while generating the predeploy registry.
///
/// Every stage fails fast: the first error aborts the run and no later stage
/// observes a partially built registry.
#[derive(Debug, Error)]
pub enum Error {
    /// Token configuration is malformed or inconsistent
    #[error("Invalid token configuration: {reason}")]
    InputValidation {
        /// What was wrong with the input
        reason: String,
    },

    /// A template placeholder was missing before substitution or survived it
    #[error("Template mismatch for {contract}: placeholder `{placeholder}` {problem}")]
    TemplateMismatch {
        /// Contract or target being rendered
        contract: String,
        /// The offending placeholder text
        placeholder: String,
        /// Either "not found in template" or "left unresolved"
        problem: &'static str,
    },

    /// Offset does not fit inside the zone's reserved width
    #[error("Offset {offset:#x} overflows zone {zone} (width {width:#x})")]
    AllocationOverflow {
        /// Zone being allocated into
        zone: Zone,
        /// Requested zone-local offset
        offset: u128,
        /// Number of reserved slots in the zone
        width: u128,
    },

    /// Two registry entries collide, or an entry sits outside its zone
    #[error("Registry conflict: {0}")]
    RegistryConflict(RegistryConflict),

    /// The external compiler failed or did not produce an expected artifact
    #[error("Compile error: {0}")]
    Compile(String),

    /// Rendering or writing an output artifact failed
    #[error("Emission error for {target}: {reason}")]
    Emission {
        /// Artifact being emitted
        target: String,
        /// Failure description
        reason: String,
    },

    /// Filesystem failure with the path involved
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// The specific invariant a registry build violated
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryConflict {
    /// Two entries share a name
    #[error("duplicate name `{0}`")]
    DuplicateName(String),

    /// Two entries share an address
    #[error("address {address} used by both `{first}` and `{second}`")]
    DuplicateAddress {
        /// Shared address
        address: Address,
        /// Entry that claimed the address first
        first: String,
        /// Entry that collided
        second: String,
    },

    /// Entry address lies outside the zone it was allocated for
    #[error("`{name}` at {address} is outside zone {expected}")]
    OutsideZone {
        /// Entry name
        name: String,
        /// Entry address
        address: Address,
        /// Zone the entry should live in
        expected: Zone,
    },
}

impl From<RegistryConflict> for Error {
    fn from(conflict: RegistryConflict) -> Self {
        Error::RegistryConflict(conflict)
    }
}

impl Error {
    pub(crate) fn input(reason: impl Into<String>) -> Self {
        Error::InputValidation { reason: reason.into() }
    }

    pub(crate) fn emission(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Emission { target: target.into(), reason: reason.into() }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }
}
