//! One-shot interrupt listener.
//!
//! Installed once at startup. On the first SIGINT or SIGTERM it silences
//! logging, runs the update check, stops the active container and exits the
//! process with status 0. Later signals get the default disposition.

use crate::container::{ContainerEngine, RunState, container_cleanup};
use crate::update::UpdateChecker;
use crate::{logging, output};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// What the listener needs to tear down a run.
pub struct InterruptContext {
    pub engine: Option<Arc<dyn ContainerEngine>>,
    pub state: Arc<RunState>,
    pub updates: UpdateChecker,
    pub cli_version: String,
}

/// Register the signal handlers and spawn the listener.
///
/// Handlers are registered before this returns, so a signal delivered
/// afterwards is never lost to the default disposition.
pub fn install(ctx: InterruptContext) -> std::io::Result<JoinHandle<()>> {
    let signal = shutdown_signal()?;
    Ok(tokio::spawn(async move {
        signal.await;
        shutdown(&ctx).await;
        std::process::exit(0);
    }))
}

/// Cleanup sequence of the first signal.
pub async fn shutdown(ctx: &InterruptContext) {
    output::warning("Interrupted, stopping the linter");
    logging::suppress();
    ctx.updates.notify(&ctx.cli_version).await;
    if let Some(engine) = &ctx.engine
        && let Err(e) = container_cleanup(engine.as_ref(), &ctx.state).await
    {
        output::error(&e.to_string());
    }
    ctx.state.stop_spinner();
}

#[cfg(unix)]
fn shutdown_signal() -> std::io::Result<impl std::future::Future<Output = ()>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    Ok(async move {
        tokio::select! {
            _ = interrupt.recv() => {},
            _ = terminate.recv() => {},
        }
    })
}

#[cfg(not(unix))]
fn shutdown_signal() -> std::io::Result<impl std::future::Future<Output = ()>> {
    Ok(async {
        let _ = tokio::signal::ctrl_c().await;
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::ContainerSummary;
    use crate::test_utils::fake_engine::FakeEngine;

    fn context(engine: Arc<FakeEngine>, state: Arc<RunState>) -> InterruptContext {
        InterruptContext {
            engine: Some(engine as Arc<dyn ContainerEngine>),
            state,
            updates: UpdateChecker::new("http://127.0.0.1:9/unreachable"),
            cli_version: "dev".into(),
        }
    }

    #[tokio::test]
    async fn test_shutdown_before_container_makes_no_engine_calls() {
        let engine = Arc::new(FakeEngine::new());
        let state = Arc::new(RunState::new());

        shutdown(&context(engine.clone(), state)).await;

        assert!(engine.calls().is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_stops_recorded_container() {
        let engine = Arc::new(FakeEngine::new().with_containers(vec![ContainerSummary {
            id: "abc".into(),
            names: vec!["/lintctl-cli-run".into()],
        }]));
        let state = Arc::new(RunState::new());
        state.record_container("lintctl-cli-run");
        state.set_spinner(Some(indicatif::ProgressBar::hidden()));

        shutdown(&context(engine.clone(), state.clone())).await;

        assert_eq!(engine.calls(), vec!["list", "stop abc"]);
        assert!(state.spinner().is_none());
    }

    #[tokio::test]
    async fn test_install_registers_listener() {
        let handle = install(InterruptContext {
            engine: None,
            state: Arc::new(RunState::new()),
            updates: UpdateChecker::default(),
            cli_version: "dev".into(),
        })
        .unwrap();
        assert!(!handle.is_finished());
        handle.abort();
    }
}
