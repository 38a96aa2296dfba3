//! CLI command handlers.
//!
//! Handlers turn parsed arguments into calls on the library and map the
//! outcome onto a process exit code. They are kept out of `main.rs` so they
//! can be unit tested.

mod images;
mod pull;
mod scan;
mod show_id;

pub use images::handle_images;
pub use pull::handle_pull;
pub use scan::handle_scan;
pub use show_id::handle_show_id;

use crate::cli::ProjectArgs;
use crate::config::ProjectConfig;
use crate::container::{ContainerEngine, RunState};
use crate::context::{ContextInputs, ScanContext, compute};
use crate::env::EnvSource;
use crate::error::{LintError, Result};
use crate::output;
use crate::product::ProductTable;
use std::process::ExitCode;
use std::sync::Arc;

/// Collaborators created once per process and shared by all handlers.
pub struct App {
    pub products: Arc<ProductTable>,
    pub env: Arc<dyn EnvSource>,
    pub state: Arc<RunState>,
    /// Present for commands that talk to the container engine.
    pub engine: Option<Arc<dyn ContainerEngine>>,
    pub cli_version: String,
    pub interactive: bool,
}

impl App {
    fn engine(&self) -> Result<Arc<dyn ContainerEngine>> {
        self.engine.clone().ok_or_else(|| {
            LintError::EngineUnavailable(crate::container::EngineError::Other(
                "no container engine configured".to_string(),
            ))
        })
    }

    /// Resolve the scan context for `inputs` of the project in `project`.
    fn context(&self, project: &ProjectArgs, inputs: ContextInputs) -> Result<ScanContext> {
        let config = ProjectConfig::load(&project.project_dir, project.config.as_deref())?;
        Ok(compute(inputs, &config, &self.products, self.env.as_ref())?)
    }
}

/// Print a fatal error and return the failure status.
fn fail(err: &LintError) -> ExitCode {
    output::error(&err.to_string());
    ExitCode::FAILURE
}

/// Exit code for a container exit status.
fn exit_code(status: i32) -> ExitCode {
    ExitCode::from(u8::try_from(status).unwrap_or(1))
}
