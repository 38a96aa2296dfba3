//! Container lifecycle: pull, create, start, follow logs, wait for exit.

use super::credentials::CredentialStore;
use super::engine::ContainerEngine;
use super::fixups::apply_platform_fixups;
use super::policy::ImagePolicy;
use super::pull::pull_image;
use super::spec::{ContainerRunSpec, SpecBuilder, debug_run_command};
use super::state::RunState;
use crate::cloud::CloudEndpoint;
use crate::context::ScanContext;
use crate::env::EnvSource;
use crate::error::{LintError, Result};
use crate::output::{self, Spinner};
use futures::StreamExt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// The only engine backend the linter images run on.
const SUPPORTED_OS: &str = "linux";

/// How long trailing container output may take to arrive after exit.
const LOG_FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

/// Collaborators of a containerized run.
pub struct ContainerRuntime {
    pub engine: Arc<dyn ContainerEngine>,
    pub state: Arc<RunState>,
    pub policy: ImagePolicy,
    pub credentials: Arc<dyn CredentialStore>,
    pub env: Arc<dyn EnvSource>,
    pub endpoint: CloudEndpoint,
    pub cli_version: String,
    pub interactive: bool,
}

/// Run the linter container for `ctx` and return its exit status.
///
/// Returns `Ok(1)` without touching images or containers when the engine
/// backend is not Linux.
pub async fn run_containerized(ctx: &ScanContext, runtime: &ContainerRuntime) -> Result<i32> {
    let engine = runtime.engine.as_ref();
    let spec = SpecBuilder::new(
        runtime.env.as_ref(),
        runtime.endpoint.clone(),
        &runtime.cli_version,
    )
    .interactive(runtime.interactive)
    .build(ctx)?;

    let os_type = engine.os_type().await.map_err(LintError::EngineInfo)?;
    if os_type != SUPPORTED_OS {
        output::error(&format!(
            "Container engine's OS ({}) is not supported. Linter images need a Linux-based engine",
            os_type
        ));
        return Ok(1);
    }

    prepare_directories(ctx)?;
    apply_platform_fixups(ctx.cache_dir());

    let outcome = launch(ctx, &spec, runtime).await;

    apply_platform_fixups(ctx.cache_dir());
    runtime.state.stop_spinner();

    let code = outcome?;
    info!(name = spec.name.as_str(), code, "Container exited");
    Ok(exit_status(code))
}

/// Pull, create and start the container, then wait for it to exit.
async fn launch(
    ctx: &ScanContext,
    spec: &ContainerRunSpec,
    runtime: &ContainerRuntime,
) -> Result<i64> {
    let engine = runtime.engine.as_ref();

    runtime.policy.check_image(&spec.image);
    if ctx.skip_pull() {
        debug!(image = spec.image.as_str(), "Pull skipped");
    } else {
        let spinner = Spinner::start(
            &format!("Pulling the image {}", output::primary_bold(&spec.image)),
            runtime.interactive,
        );
        runtime.state.set_spinner(spinner.handle());
        pull_image(engine, runtime.credentials.as_ref(), &spec.image).await?;
        runtime.state.stop_spinner();
    }

    runtime.state.record_container(&spec.name);
    debug!(command = %debug_run_command(spec), "Container run command");

    let spinner = Spinner::start("Starting the linter container", runtime.interactive);
    runtime.state.set_spinner(spinner.handle());
    let id = engine
        .create_container(spec)
        .await
        .map_err(|source| LintError::CreateContainer {
            name: spec.name.clone(),
            source,
        })?;
    engine
        .start_container(&id)
        .await
        .map_err(|source| LintError::StartContainer {
            name: spec.name.clone(),
            source,
        })?;
    runtime.state.stop_spinner();
    info!(name = spec.name.as_str(), id = id.as_str(), "Container started");

    let follower = tokio::spawn(follow_logs(engine.logs(&spec.name), runtime.state.clone()));

    let mut exits = engine.wait(&spec.name);
    let code = match exits.next().await {
        Some(Ok(code)) => code,
        Some(Err(source)) => {
            follower.abort();
            return Err(LintError::Wait {
                name: spec.name.clone(),
                source,
            });
        }
        None => 0,
    };

    if tokio::time::timeout(LOG_FLUSH_TIMEOUT, follower).await.is_err() {
        debug!("Log follower still running after exit");
    }
    Ok(code)
}

async fn follow_logs(mut logs: super::engine::LogStream, state: Arc<RunState>) {
    while let Some(chunk) = logs.next().await {
        match chunk {
            Ok(text) => output::print_above(state.spinner().as_ref(), &text),
            Err(e) => {
                warn!(error = %e, "Couldn't follow container logs");
                break;
            }
        }
    }
}

fn prepare_directories(ctx: &ScanContext) -> Result<()> {
    if ctx.clear_cache() {
        remove_dir(ctx.cache_dir())?;
    }
    for dir in [ctx.cache_dir(), ctx.results_dir(), ctx.report_dir()] {
        std::fs::create_dir_all(dir).map_err(|e| LintError::create_error(dir, e))?;
    }
    Ok(())
}

fn remove_dir(dir: &Path) -> Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => {
            info!(path = %dir.display(), "Cache cleared");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(LintError::delete_error(dir, e)),
    }
}

/// Process exit status for a container exit code.
fn exit_status(code: i64) -> i32 {
    i32::try_from(code).ok().filter(|c| *c >= 0).unwrap_or(1)
}
