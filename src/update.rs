//! Best-effort check for a newer lintctl release.

use crate::output;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_RELEASES_URL: &str = "https://api.github.com/repos/lintctl/lintctl/releases/latest";

const CHECK_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
}

/// Queries the latest published release.
#[derive(Debug, Clone)]
pub struct UpdateChecker {
    url: String,
}

impl UpdateChecker {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// The latest release if it differs from `current`.
    ///
    /// Development builds and every failure yield `None`.
    pub async fn check(&self, current: &str) -> Option<String> {
        if is_dev_version(current) {
            return None;
        }
        match self.fetch_latest().await {
            Ok(latest) => newer_release(current, &latest),
            Err(e) => {
                debug!(error = %e, "Update check failed");
                None
            }
        }
    }

    /// Print a notice when a newer release exists.
    pub async fn notify(&self, current: &str) {
        if let Some(latest) = self.check(current).await {
            output::warning(&format!(
                "A new version of lintctl is available: {} (current {})",
                output::primary_bold(&latest),
                current
            ));
        }
    }

    async fn fetch_latest(&self) -> reqwest::Result<String> {
        let client = reqwest::Client::builder()
            .timeout(CHECK_TIMEOUT)
            .user_agent(format!("lintctl/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        let release: Release = client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(release.tag_name)
    }
}

impl Default for UpdateChecker {
    fn default() -> Self {
        Self::new(DEFAULT_RELEASES_URL)
    }
}

fn is_dev_version(version: &str) -> bool {
    version.contains("dev") || version.contains("nightly")
}

fn newer_release(current: &str, latest_tag: &str) -> Option<String> {
    let latest = latest_tag.trim().trim_start_matches('v');
    let current = current.trim_start_matches('v');
    if latest.is_empty() || latest == current || is_dev_version(latest) {
        None
    } else {
        Some(latest.to_string())
    }
}
