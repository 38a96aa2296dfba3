//! Project configuration for lintctl.
//!
//! - `types`: Configuration type definitions
//! - `loading`: File discovery and parsing

mod error;
mod loading;
mod types;

pub use error::ConfigError;
pub use loading::CONFIG_FILE_NAMES;
pub use types::{ClangConfig, DotnetConfig, ProjectConfig};
