//! Error types for lintctl.
//!
//! Subsystems carry their own error enums; `LintError` is the top-level type
//! that reaches `main`, where it is printed and turned into exit status 1.

mod context;

pub use context::IoOperation;

use crate::config::ConfigError;
use crate::container::{CredentialError, EngineError};
use crate::context::ContextError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error for a lintctl invocation.
#[derive(Error, Debug)]
pub enum LintError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error("Couldn't connect to the container engine: {0}")]
    EngineUnavailable(#[source] EngineError),

    #[error("Couldn't retrieve container engine information: {0}")]
    EngineInfo(#[source] EngineError),

    #[error("Can't pull image {image}: {source}")]
    Pull {
        image: String,
        #[source]
        source: EngineError,
    },

    #[error("Can't pull image {image} from the private registry: {source}")]
    AuthenticatedPull {
        image: String,
        #[source]
        source: EngineError,
    },

    #[error("Can't load registry credentials for {host}: {source}")]
    Credentials {
        host: String,
        #[source]
        source: CredentialError,
    },

    #[error("Couldn't read the image pull logs for {image}: {source}")]
    PullStream {
        image: String,
        #[source]
        source: EngineError,
    },

    #[error("Couldn't parse volume {0}")]
    InvalidVolume(String),

    #[error("Couldn't create the container {name}: {source}")]
    CreateContainer {
        name: String,
        #[source]
        source: EngineError,
    },

    #[error("Couldn't bootstrap the container {name}: {source}")]
    StartContainer {
        name: String,
        #[source]
        source: EngineError,
    },

    #[error("Container {name} hasn't finished: {source}")]
    Wait {
        name: String,
        #[source]
        source: EngineError,
    },

    #[error("Couldn't stop the container {name}: {source}")]
    StopContainer {
        name: String,
        #[source]
        source: EngineError,
    },

    #[error("Couldn't get the running containers: {0}")]
    ListContainers(#[source] EngineError),

    #[error("Failed to {operation} {path}: {source}")]
    Io {
        path: PathBuf,
        operation: IoOperation,
        #[source]
        source: std::io::Error,
    },

    #[error("Native analyzer {0} can't be run in a container; use --linter with an image instead")]
    NativeAnalyzer(String),

    #[error("Couldn't install signal handlers: {0}")]
    Signals(#[source] std::io::Error),
}

impl LintError {
    /// Create an I/O error for a directory that could not be created.
    pub fn create_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            operation: IoOperation::Create,
            source,
        }
    }

    /// Create an I/O error for a path that could not be removed.
    pub fn delete_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            operation: IoOperation::Delete,
            source,
        }
    }
}

/// Result type alias for lintctl operations.
pub type Result<T> = std::result::Result<T, LintError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_volume_display() {
        let err = LintError::InvalidVolume("/only-source".to_string());
        assert_eq!(err.to_string(), "Couldn't parse volume /only-source");
    }

    #[test]
    fn test_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = LintError::create_error("/cache/dir", io_err);
        assert_eq!(err.to_string(), "Failed to create /cache/dir: denied");
    }

    #[test]
    fn test_pull_error_includes_engine_text() {
        let err = LintError::Pull {
            image: "lintctl/linter-jvm:2025.1".to_string(),
            source: EngineError::Other("manifest unknown".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("lintctl/linter-jvm:2025.1"));
        assert!(msg.contains("manifest unknown"));
    }

    #[test]
    fn test_native_analyzer_display() {
        let err = LintError::NativeAnalyzer("QDJVM".to_string());
        assert!(err.to_string().contains("QDJVM"));
        assert!(err.to_string().contains("--linter"));
    }
}
