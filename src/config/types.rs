//! Configuration type definitions.

use serde::{Deserialize, Serialize};

/// Project configuration (`lintctl.yaml`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Configuration format version.
    pub version: Option<String>,
    /// Container image of the linter.
    pub linter: Option<String>,
    /// Native analyzer code.
    pub ide: Option<String>,
    /// .NET project selection.
    pub dotnet: DotnetConfig,
    /// Clang project selection.
    pub clang: ClangConfig,
    /// Extra `key=value` properties passed to the analyzer.
    pub properties: Vec<String>,
    /// Number of problems above which the run fails.
    pub fail_threshold: Option<u32>,
}

impl ProjectConfig {
    /// Whether the configured linter belongs to the .NET family.
    pub fn is_dotnet(&self) -> bool {
        self.linter.as_deref().is_some_and(|l| l.contains("dotnet") || l.contains("cdnet"))
            || self.ide.as_deref().is_some_and(|i| i.starts_with("QDNET"))
    }
}

/// .NET solution/project selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DotnetConfig {
    pub solution: Option<String>,
    pub project: Option<String>,
    pub configuration: Option<String>,
    pub platform: Option<String>,
}

impl DotnetConfig {
    pub fn is_empty(&self) -> bool {
        self.solution.is_none()
            && self.project.is_none()
            && self.configuration.is_none()
            && self.platform.is_none()
    }
}

/// Clang compilation database settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClangConfig {
    pub compile_commands: Option<String>,
    pub args: Option<String>,
}
