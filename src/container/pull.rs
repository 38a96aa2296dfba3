//! Image pulls with a credentialed fallback for private registries.

use super::credentials::CredentialStore;
use super::engine::{ContainerEngine, PullStream};
use crate::error::{LintError, Result};
use futures::StreamExt;
use tracing::{debug, info};

const UNAUTHORIZED_MARKERS: [&str; 3] = ["unauthorized", "denied", "forbidden"];

/// Whether an engine error text means the registry refused anonymous access.
pub fn is_unauthorized_error(message: &str) -> bool {
    let message = message.to_lowercase();
    UNAUTHORIZED_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}

/// Registry part of an image reference: everything before the first `/`.
pub fn registry_hostname(image: &str) -> &str {
    image.split('/').next().unwrap_or(image)
}

/// Make `image` available locally.
///
/// Tries an anonymous pull first. If the registry rejects it, the pull is
/// repeated once with the stored credentials for the registry host.
pub async fn pull_image(
    engine: &dyn ContainerEngine,
    credentials: &dyn CredentialStore,
    image: &str,
) -> Result<()> {
    let mut stream = engine.pull_image(image, None);
    match stream.next().await {
        Some(Err(source)) if is_unauthorized_error(&source.to_string()) => {
            drop(stream);
            let host = registry_hostname(image);
            info!(image, host, "Anonymous pull refused, retrying with stored credentials");
            let auth = credentials
                .lookup(host)
                .map_err(|source| LintError::Credentials {
                    host: host.to_string(),
                    source,
                })?
                .unwrap_or_default();

            let mut stream = engine.pull_image(image, Some(auth));
            if let Some(Err(source)) = stream.next().await {
                return Err(LintError::AuthenticatedPull {
                    image: image.to_string(),
                    source,
                });
            }
            drain(stream, image).await
        }
        Some(Err(source)) => Err(LintError::Pull {
            image: image.to_string(),
            source,
        }),
        Some(Ok(status)) => {
            debug!(image, status = status.as_str(), "Pull started");
            drain(stream, image).await
        }
        None => Ok(()),
    }
}

/// Read the rest of the pull progress so the engine finishes the pull.
async fn drain(mut stream: PullStream, image: &str) -> Result<()> {
    while let Some(item) = stream.next().await {
        item.map_err(|source| LintError::PullStream {
            image: image.to_string(),
            source,
        })?;
    }
    debug!(image, "Pull finished");
    Ok(())
}
