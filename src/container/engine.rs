//! Seam between the lifecycle driver and the container engine.

use super::credentials::RegistryAuth;
use super::spec::ContainerRunSpec;
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;
use thiserror::Error;

/// Errors reported by a container engine.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Docker(#[from] bollard::errors::Error),

    #[error("{0}")]
    Other(String),
}

/// Progress messages of an image pull, in arrival order.
pub type PullStream = Pin<Box<dyn Stream<Item = Result<String, EngineError>> + Send>>;
/// Combined stdout/stderr chunks of a running container.
pub type LogStream = Pin<Box<dyn Stream<Item = Result<String, EngineError>> + Send>>;
/// Exit statuses reported when the container stops.
pub type ExitStream = Pin<Box<dyn Stream<Item = Result<i64, EngineError>> + Send>>;

/// A container known to the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerSummary {
    pub id: String,
    /// Names as reported by the engine, with their leading `/`.
    pub names: Vec<String>,
}

/// Operations the lifecycle driver needs from a container engine.
#[async_trait]
pub trait ContainerEngine: Send + Sync {
    /// Operating system of the engine backend, e.g. `linux`.
    async fn os_type(&self) -> Result<String, EngineError>;

    /// Start pulling `image`. The first item fails if the request is rejected.
    fn pull_image(&self, image: &str, auth: Option<RegistryAuth>) -> PullStream;

    /// Create a container and return its id.
    async fn create_container(&self, spec: &ContainerRunSpec) -> Result<String, EngineError>;

    async fn start_container(&self, id: &str) -> Result<(), EngineError>;

    async fn list_containers(&self) -> Result<Vec<ContainerSummary>, EngineError>;

    async fn stop_container(&self, id: &str) -> Result<(), EngineError>;

    /// Follow combined output without timestamps until the container stops.
    fn logs(&self, name: &str) -> LogStream;

    /// Wait for the next exit of the container.
    fn wait(&self, name: &str) -> ExitStream;
}
