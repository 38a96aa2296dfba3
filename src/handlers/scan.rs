//! `lintctl scan`.

use super::{App, exit_code, fail};
use crate::cli::ScanArgs;
use crate::cloud::CloudEndpoint;
use crate::container::{ContainerRuntime, DockerConfigStore, ImagePolicy, run_containerized};
use crate::error::Result;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

/// Run the linter container; the exit code is the container's.
pub async fn handle_scan(app: &App, args: &ScanArgs) -> ExitCode {
    match scan(app, args).await {
        Ok(status) => exit_code(status),
        Err(e) => fail(&e),
    }
}

async fn scan(app: &App, args: &ScanArgs) -> Result<i32> {
    let ctx = app.context(&args.project, args.to_inputs())?;
    info!(
        id = %ctx.id(),
        analyzer = ctx.analyzer().name(),
        project = %ctx.project_dir().display(),
        "Starting analysis"
    );

    let runtime = ContainerRuntime {
        engine: app.engine()?,
        state: app.state.clone(),
        policy: ImagePolicy::new(app.products.clone(), &app.cli_version),
        credentials: Arc::new(DockerConfigStore::from_env(app.env.as_ref())),
        env: app.env.clone(),
        endpoint: CloudEndpoint::from_env(app.env.as_ref()),
        cli_version: app.cli_version.clone(),
        interactive: app.interactive,
    };
    run_containerized(&ctx, &runtime).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ProjectArgs;
    use crate::container::{ContainerEngine, RunState};
    use crate::env::MapEnv;
    use crate::product::ProductTable;
    use crate::test_utils::fake_engine::FakeEngine;
    use tempfile::TempDir;

    fn app(engine: Arc<FakeEngine>) -> App {
        App {
            products: Arc::new(ProductTable::current()),
            env: Arc::new(MapEnv::new()),
            state: Arc::new(RunState::new()),
            engine: Some(engine as Arc<dyn ContainerEngine>),
            cli_version: "2025.1.0".into(),
            interactive: false,
        }
    }

    fn args(dir: &std::path::Path) -> ScanArgs {
        ScanArgs {
            project: ProjectArgs {
                project_dir: dir.join("project"),
                linter: Some("lintctl/linter-jvm:2025.1".into()),
                cache_dir: Some(dir.join("system/linter/cache")),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_scan_returns_container_exit_code() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("project")).unwrap();
        let engine = Arc::new(FakeEngine::new().with_exit_code(2));

        let code = handle_scan(&app(engine), &args(dir.path())).await;
        assert_eq!(code, ExitCode::from(2));
    }

    #[tokio::test]
    async fn test_scan_without_linter_fails() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("project")).unwrap();
        let engine = Arc::new(FakeEngine::new());
        let mut args = args(dir.path());
        args.project.linter = None;

        let code = handle_scan(&app(engine.clone()), &args).await;

        assert_eq!(code, ExitCode::FAILURE);
        assert!(engine.calls().is_empty());
    }

    #[tokio::test]
    async fn test_scan_uses_linter_from_config() {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("project");
        std::fs::create_dir_all(&project).unwrap();
        std::fs::write(project.join("lintctl.yaml"), "linter: lintctl/linter-go:2025.1\n").unwrap();
        let engine = Arc::new(FakeEngine::new());
        let mut args = args(dir.path());
        args.project.linter = None;

        let code = handle_scan(&app(engine.clone()), &args).await;

        assert_eq!(code, ExitCode::SUCCESS);
        assert!(
            engine
                .calls()
                .contains(&"pull lintctl/linter-go:2025.1 anonymous".to_string())
        );
    }
}
