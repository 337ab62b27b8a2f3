//! Error types for the installer
//!
//! Only failures that stop the whole workflow live here. A failed
//! `composer`/`npm` invocation is reported per phase through
//! [`crate::orchestrator::PhaseOutcome`] instead.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal installer errors
#[derive(Debug, Error)]
pub enum InstallerError {
    /// The host runtime or framework is older than the suite supports
    #[error("{component} {required} or higher is required. You have {found}")]
    IncompatibleVersion {
        component: &'static str,
        required: String,
        found: String,
    },

    /// The lock file exists but is not valid JSON of the expected shape
    #[error("Failed to parse {}: {source}", .path.display())]
    MalformedLockFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The lock file exists but could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    LockFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The runtime or framework version could not be detected
    #[error("Could not determine {tool} version: {reason}")]
    VersionDetection { tool: &'static str, reason: String },

    /// A version string had no usable numeric components
    #[error("Invalid version '{0}'")]
    InvalidVersion(String),

    /// Prompt or terminal I/O failed (includes the user aborting a prompt)
    #[error("Terminal I/O failed: {0}")]
    Terminal(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, InstallerError>;
