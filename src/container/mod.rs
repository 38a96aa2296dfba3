//! Containerized linter runs.
//!
//! The flow for one run is: image policy check, registry pull, container
//! settings, then the lifecycle driver. The interrupt listener shares
//! [`RunState`] with the driver to stop the container on Ctrl-C.

mod cleanup;
mod credentials;
mod docker;
mod driver;
mod engine;
mod fixups;
mod policy;
mod pull;
mod spec;
mod state;

pub use cleanup::container_cleanup;
pub use credentials::{CredentialError, CredentialStore, DockerConfigStore, RegistryAuth};
pub use docker::DockerEngine;
pub use driver::{ContainerRuntime, run_containerized};
pub use engine::{
    ContainerEngine, ContainerSummary, EngineError, ExitStream, LogStream, PullStream,
};
pub use fixups::{apply_platform_fixups, remove_port_sockets};
pub use policy::{ImagePolicy, ImageWarning};
pub use pull::{is_unauthorized_error, pull_image, registry_hostname};
pub use spec::{ContainerRunSpec, Mount, PortBinding, SpecBuilder, debug_run_command, parse_volume};
pub use state::RunState;

/// Namespace of the official linter images.
pub const OFFICIAL_IMAGE_PREFIX: &str = "lintctl/linter";

pub const DATA_CACHE_DIR: &str = "/data/cache";
pub const DATA_PROJECT_DIR: &str = "/data/project";
pub const DATA_RESULTS_DIR: &str = "/data/results";
pub const DATA_REPORT_DIR: &str = "/data/results/report";
pub const DATA_GLOBAL_CONFIG_DIR: &str = "/data/global-config";

/// JVM debug port inside the container.
pub const CONTAINER_DEBUG_PORT: &str = "5005/tcp";

/// Container name prefix, and the name recorded while no container exists.
pub const CONTAINER_NAME_SENTINEL: &str = "lintctl-cli";
