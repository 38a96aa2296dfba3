pub mod cli;
pub mod cloud;
pub mod config;
pub mod container;
pub mod context;
pub mod env;
pub mod error;
pub mod handlers;
pub mod interrupt;
pub mod logging;
pub mod output;
pub mod product;
pub mod update;

#[cfg(test)]
pub mod test_utils;

pub use cli::{Cli, Commands};
pub use config::{ConfigError, ProjectConfig};
pub use container::{
    ContainerEngine, ContainerRunSpec, DockerEngine, RunState, SpecBuilder, container_cleanup,
    run_containerized,
};
pub use context::{ContextInputs, RunId, ScanContext};
pub use error::{LintError, Result};
pub use product::ProductTable;
