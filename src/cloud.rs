//! Cloud endpoint resolution.

use crate::env::{EnvSource, LINTCTL_ENDPOINT};

pub const DEFAULT_ENDPOINT: &str = "https://cloud.lintctl.dev";

/// The cloud service root the linter reports to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudEndpoint {
    url: String,
}

impl CloudEndpoint {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            url: url.trim_end_matches('/').to_string(),
        }
    }

    /// Endpoint from `LINTCTL_ENDPOINT`, or the default service.
    pub fn from_env(env: &dyn EnvSource) -> Self {
        Self::new(
            env.var(LINTCTL_ENDPOINT)
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether the endpoint is reached over plain HTTP.
    ///
    /// Plain HTTP endpoints are self-hosted instances on the developer
    /// machine, which a bridged container can't reach.
    pub fn is_plaintext(&self) -> bool {
        self.url
            .get(..7)
            .is_some_and(|scheme| scheme.eq_ignore_ascii_case("http://"))
    }
}

impl Default for CloudEndpoint {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}
