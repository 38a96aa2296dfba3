//! Environment variables consumed by lintctl.
//!
//! Names here are part of the scripting surface and must stay stable.

mod ci;

pub use ci::{CiProvider, extract_ci_environment};

use std::collections::HashMap;

/// Upload token for the cloud service.
pub const LINTCTL_TOKEN: &str = "LINTCTL_TOKEN";
/// License marker; entries containing it are safe to print.
pub const LINTCTL_LICENSE: &str = "LINTCTL_LICENSE";
/// Token that only grants a license, without uploading results.
pub const LINTCTL_LICENSE_ONLY_TOKEN: &str = "LINTCTL_LICENSE_ONLY_TOKEN";
/// Overrides the synthesized container name.
pub const LINTCTL_CLI_CONTAINER_NAME: &str = "LINTCTL_CLI_CONTAINER_NAME";
/// Keeps the container after it exits.
pub const LINTCTL_CLI_CONTAINER_KEEP: &str = "LINTCTL_CLI_CONTAINER_KEEP";
/// Cloud endpoint override.
pub const LINTCTL_ENDPOINT: &str = "LINTCTL_ENDPOINT";
/// Set inside linter containers.
pub const LINTCTL_DOCKER: &str = "LINTCTL_DOCKER";

pub const LINTCTL_ENV: &str = "LINTCTL_ENV";
pub const LINTCTL_REMOTE_URL: &str = "LINTCTL_REMOTE_URL";
pub const LINTCTL_BRANCH: &str = "LINTCTL_BRANCH";
pub const LINTCTL_REVISION: &str = "LINTCTL_REVISION";
pub const LINTCTL_JOB_URL: &str = "LINTCTL_JOB_URL";

/// Read access to environment variables.
pub trait EnvSource: Send + Sync {
    /// Value of `key`, or `None` if unset or empty.
    fn var(&self, key: &str) -> Option<String>;

    fn is_set(&self, key: &str) -> bool {
        self.var(key).is_some()
    }
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }
}

/// A fixed set of variables, used for tests and for replaying an environment.
#[derive(Debug, Clone, Default)]
pub struct MapEnv(HashMap<String, String>);

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.0.insert(key.to_string(), value.to_string());
        self
    }
}

impl EnvSource for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.0.get(key).filter(|v| !v.is_empty()).cloned()
    }
}

/// Whether lintctl itself runs inside a linter container.
pub fn is_container(env: &dyn EnvSource) -> bool {
    env.is_set(LINTCTL_DOCKER)
}
