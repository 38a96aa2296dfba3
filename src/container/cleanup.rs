//! Stopping the active container.

use super::engine::ContainerEngine;
use super::state::RunState;
use crate::error::{LintError, Result};
use tracing::debug;

/// Stop the container recorded in `state`, if any.
///
/// Safe to call any number of times; without a recorded container no engine
/// call is made.
pub async fn container_cleanup(engine: &dyn ContainerEngine, state: &RunState) -> Result<()> {
    if !state.has_container() {
        return Ok(());
    }
    let name = state.container_name();
    let engine_name = format!("/{}", name);

    let containers = engine
        .list_containers()
        .await
        .map_err(LintError::ListContainers)?;
    for container in containers
        .iter()
        .filter(|c| c.names.iter().any(|n| *n == engine_name))
    {
        debug!(name, id = container.id.as_str(), "Stopping container");
        engine
            .stop_container(&container.id)
            .await
            .map_err(|source| LintError::StopContainer {
                name: name.to_string(),
                source,
            })?;
    }
    Ok(())
}
