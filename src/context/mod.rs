//! Scan context: the fully resolved description of one analysis run.
//!
//! A context is a value. It is computed once from CLI options, the project
//! configuration file and the environment, and afterwards only copied with
//! extra environment variables via [`ScanContext::with_env`].

mod args;
mod compute;
mod id;

pub use args::container_command;
pub use compute::{ContextInputs, compute};
pub use id::RunId;

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while resolving a scan context.
#[derive(Error, Debug)]
pub enum ContextError {
    #[error(
        "No linter is configured for {0}. Set `linter:` or `ide:` in lintctl.yaml, or pass --linter"
    )]
    NoAnalyzer(PathBuf),

    #[error("Only one of --linter ({linter}) and --ide ({ide}) can be set")]
    ConflictingOverrides { linter: String, ide: String },

    #[error("Couldn't get absolute path for {what} {path}: {source}")]
    AbsolutePath {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Couldn't determine the user cache directory; pass --cache-dir")]
    NoCacheDir,
}

/// What performs the analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Analyzer {
    /// A native analyzer, identified by its product code.
    Native(String),
    /// A container image reference.
    Container(String),
}

impl Analyzer {
    /// The string hashed into the run id.
    pub fn name(&self) -> &str {
        match self {
            Self::Native(code) => code,
            Self::Container(image) => image,
        }
    }

    pub fn image(&self) -> Option<&str> {
        match self {
            Self::Container(image) => Some(image),
            Self::Native(_) => None,
        }
    }
}

/// Linter-family specific arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LinterArgs {
    #[default]
    None,
    Dotnet(DotnetArgs),
    Clang(ClangArgs),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DotnetArgs {
    pub solution: Option<String>,
    pub project: Option<String>,
    pub configuration: Option<String>,
    pub platform: Option<String>,
    pub no_build: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClangArgs {
    pub compile_commands: Option<String>,
    pub clang_args: Option<String>,
}

/// Analysis options forwarded to the linter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOptions {
    pub save_report: bool,
    pub source_directory: Option<String>,
    pub disable_sanity: bool,
    pub profile_name: Option<String>,
    pub profile_path: Option<String>,
    pub run_promo: Option<String>,
    pub baseline: Option<String>,
    pub baseline_include_absent: bool,
    pub fail_threshold: Option<u32>,
    pub analysis_id: Option<String>,
    pub properties: Vec<String>,
}

/// One resolved analysis run.
#[derive(Debug, Clone)]
pub struct ScanContext {
    analyzer: Analyzer,
    id: RunId,
    project_dir: PathBuf,
    cache_dir: PathBuf,
    results_dir: PathBuf,
    report_dir: PathBuf,
    global_config_dir: Option<PathBuf>,
    upload_token: Option<String>,
    license_only_token: Option<String>,
    env: Vec<(String, String)>,
    volumes: Vec<String>,
    user: Option<String>,
    jvm_debug_port: Option<u16>,
    skip_pull: bool,
    clear_cache: bool,
    linter_args: LinterArgs,
    options: ScanOptions,
}

impl ScanContext {
    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    pub fn id(&self) -> &RunId {
        &self.id
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    pub fn report_dir(&self) -> &Path {
        &self.report_dir
    }

    pub fn global_config_dir(&self) -> Option<&Path> {
        self.global_config_dir.as_deref()
    }

    pub fn upload_token(&self) -> Option<&str> {
        self.upload_token.as_deref()
    }

    pub fn license_only_token(&self) -> Option<&str> {
        self.license_only_token.as_deref()
    }

    /// Extra environment as `KEY=VALUE` entries.
    pub fn env(&self) -> Vec<String> {
        self.env
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect()
    }

    pub fn env_var(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn volumes(&self) -> &[String] {
        &self.volumes
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Requested JVM debug port, if positive.
    pub fn jvm_debug_port(&self) -> Option<u16> {
        self.jvm_debug_port.filter(|port| *port > 0)
    }

    pub fn skip_pull(&self) -> bool {
        self.skip_pull
    }

    pub fn clear_cache(&self) -> bool {
        self.clear_cache
    }

    pub fn linter_args(&self) -> &LinterArgs {
        &self.linter_args
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// A copy of this context with `key` set to `value` in its environment.
    pub fn with_env(&self, key: &str, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        let value = value.into();
        match next.env.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => next.env.push((key.to_string(), value)),
        }
        next
    }
}
