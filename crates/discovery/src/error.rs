use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures observed while discovering skills.
///
/// Only [`DiscoveryError::Configuration`] ever escapes [`crate::SkillResolver::resolve`];
/// the other variants are contained inside the resolution pass and logged.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DiscoveryError {
    /// A configured search directory could not be listed.
    #[error("skill location {path} is unavailable: {source}")]
    LocationUnavailable {
        /// The location path as configured (before or after expansion).
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A candidate's manifest could not be opened or read.
    #[error("failed to read manifest {path}: {source}")]
    ManifestUnreadable {
        /// Path to the manifest file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A candidate's front-matter block is not valid YAML.
    #[error("failed to parse front-matter in {path}: {message}")]
    ManifestUnparseable {
        /// Path to the manifest file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
    /// The location table itself is unusable. Fatal for a resolution pass.
    #[error("invalid location table: {0}")]
    Configuration(String),
    /// A resolution pass could not be run to completion (e.g. the worker panicked).
    #[error("resolution pass aborted: {0}")]
    Aborted(String),
}

/// Result type for discovery operations.
pub type Result<T, E = DiscoveryError> = std::result::Result<T, E>;
