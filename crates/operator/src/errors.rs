//! Error types for the operator crate

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, OperatorError>;

/// Errors surfaced to callers. Broken ancestor links and unavailable
/// collaborators are absorbed where they occur and never appear here;
/// any surfaced error means the in-memory documents are in an undefined
/// state and should be reloaded.
#[derive(Error, Debug)]
pub enum OperatorError {
    /// IO operations failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The document layer rejected a descriptor
    #[error(transparent)]
    Document(#[from] pom::PomError),

    /// An operation that requires a target coordinate was invoked without one
    #[error("a target dependency coordinate is required for this operation")]
    MissingDependency,

    /// A coordinate string had fewer than group:artifact:version segments
    #[error("invalid dependency coordinate {0:?}: expected group:artifact:version")]
    InvalidCoordinate(String),

    /// The property is shared by several references and may not be redefined
    #[error("property {property} is already defined and referenced more than once")]
    PropertyConflict { property: String },

    /// An ancestor descriptor does not declare pom packaging
    #[error("ancestor descriptor {path:?} must declare pom packaging, found {found:?}")]
    WrongParentPackaging {
        path: Option<PathBuf>,
        found: Option<String>,
    },

    /// A document carries more than one dependencies container
    #[error("more than one dependencies container in document")]
    DuplicateDependenciesSection,

    /// Discovered version definitions cannot be combined into one answer
    #[error("inconsistent version definitions: {0}")]
    VersionDefinitionClash(String),

    /// A version string could not be parsed where a comparison was required
    #[error("invalid version {value:?}: {message}")]
    InvalidVersion { value: String, message: String },

    /// An external build-tool invocation returned a non-zero exit status
    #[error("external build tool exited with status {code}")]
    ExternalProcessFailure { code: i32 },
}
