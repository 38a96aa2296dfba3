//! CI metadata forwarding.
//!
//! The analysis inside the container has no access to the CI system's
//! variables, so repository coordinates are copied into the scan context.

use super::{
    EnvSource, LINTCTL_BRANCH, LINTCTL_ENV, LINTCTL_JOB_URL, LINTCTL_REMOTE_URL, LINTCTL_REVISION,
};

/// CI systems with known variable layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CiProvider {
    GitHubActions,
    GitLab,
    Jenkins,
    Generic,
}

impl CiProvider {
    pub fn detect(env: &dyn EnvSource) -> Option<Self> {
        if env.is_set("GITHUB_ACTIONS") {
            Some(Self::GitHubActions)
        } else if env.is_set("GITLAB_CI") {
            Some(Self::GitLab)
        } else if env.is_set("JENKINS_URL") {
            Some(Self::Jenkins)
        } else if env.is_set("CI") {
            Some(Self::Generic)
        } else {
            None
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::GitHubActions => "github-actions",
            Self::GitLab => "gitlab",
            Self::Jenkins => "jenkins",
            Self::Generic => "ci",
        }
    }
}

/// Forward CI metadata through `update`.
///
/// Variables the user already set explicitly are left alone.
pub fn extract_ci_environment(
    env: &dyn EnvSource,
    cli_version: &str,
    mut update: impl FnMut(&str, String),
) {
    let Some(provider) = CiProvider::detect(env) else {
        return;
    };

    let mut set = |key: &str, value: Option<String>| {
        if env.is_set(key) {
            return;
        }
        if let Some(value) = value {
            update(key, value);
        }
    };

    set(
        LINTCTL_ENV,
        Some(format!("{}:{}", provider.name(), cli_version)),
    );

    match provider {
        CiProvider::GitHubActions => {
            let server = env
                .var("GITHUB_SERVER_URL")
                .unwrap_or_else(|| "https://github.com".to_string());
            let repository = env.var("GITHUB_REPOSITORY");
            set(
                LINTCTL_REMOTE_URL,
                repository
                    .as_ref()
                    .map(|repo| format!("{}/{}.git", server, repo)),
            );
            set(
                LINTCTL_BRANCH,
                env.var("GITHUB_HEAD_REF").or_else(|| env.var("GITHUB_REF_NAME")),
            );
            set(LINTCTL_REVISION, env.var("GITHUB_SHA"));
            set(
                LINTCTL_JOB_URL,
                match (repository, env.var("GITHUB_RUN_ID")) {
                    (Some(repo), Some(run)) => {
                        Some(format!("{}/{}/actions/runs/{}", server, repo, run))
                    }
                    _ => None,
                },
            );
        }
        CiProvider::GitLab => {
            set(LINTCTL_REMOTE_URL, env.var("CI_REPOSITORY_URL"));
            set(LINTCTL_BRANCH, env.var("CI_COMMIT_BRANCH"));
            set(LINTCTL_REVISION, env.var("CI_COMMIT_SHA"));
            set(LINTCTL_JOB_URL, env.var("CI_JOB_URL"));
        }
        CiProvider::Jenkins => {
            set(LINTCTL_REMOTE_URL, env.var("GIT_URL"));
            set(LINTCTL_BRANCH, env.var("GIT_BRANCH"));
            set(LINTCTL_REVISION, env.var("GIT_COMMIT"));
            set(LINTCTL_JOB_URL, env.var("BUILD_URL"));
        }
        CiProvider::Generic => {}
    }
}
