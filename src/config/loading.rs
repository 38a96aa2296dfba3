//! Configuration loading functions.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::ConfigError;
use super::types::ProjectConfig;

/// File names searched in the project root, in order.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    "lintctl.yaml",
    "lintctl.yml",
    "lintctl.json",
    "lintctl.toml",
];

impl ProjectConfig {
    /// Load configuration from a file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.display().to_string(),
            source: e,
        })?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let config: Self = match ext.as_str() {
            // An empty YAML document deserializes to unit, not a map.
            "yaml" | "yml" if content.trim().is_empty() => Self::default(),
            "yaml" | "yml" => {
                serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseYaml {
                    path: path.display().to_string(),
                    source: e,
                })?
            }
            "json" => serde_json::from_str(&content).map_err(|e| ConfigError::ParseJson {
                path: path.display().to_string(),
                source: e,
            })?,
            "toml" => toml::from_str(&content).map_err(|e| ConfigError::ParseToml {
                path: path.display().to_string(),
                source: e,
            })?,
            _ => {
                return Err(ConfigError::UnsupportedFormat(
                    path.display().to_string(),
                    ext,
                ));
            }
        };

        if let (Some(linter), Some(ide)) = (&config.linter, &config.ide) {
            return Err(ConfigError::ConflictingAnalyzers {
                linter: linter.clone(),
                ide: ide.clone(),
                path: path.display().to_string(),
            });
        }

        Ok(config)
    }

    /// Find the configuration file in the project root.
    pub fn find(project_root: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| project_root.join(name))
            .find(|path| path.is_file())
    }

    /// Load the project configuration.
    ///
    /// An explicit path must exist. Otherwise the project root is searched
    /// and a missing file yields the default configuration.
    pub fn load(project_root: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) if path.is_absolute() => Some(path.to_path_buf()),
            Some(path) => Some(project_root.join(path)),
            None => Self::find(project_root),
        };

        match path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Loading project configuration");
                Self::from_file(&path)
            }
            None => Ok(Self::default()),
        }
    }
}
