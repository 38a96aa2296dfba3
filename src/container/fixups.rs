//! Host-specific corrections applied around each container run.

use std::io;
use std::path::Path;
use tracing::{debug, warn};

/// Directory under the cache that holds per-session IDE state.
const IDE_STATE_DIR: &str = "idea";
const PORT_MARKER: &str = ".port";

/// Remove stale `.port` markers under `<cache>/idea/*/`.
///
/// A missing state directory is not an error.
pub fn remove_port_sockets(cache_dir: &Path) -> io::Result<()> {
    let state_dir = cache_dir.join(IDE_STATE_DIR);
    let entries = match std::fs::read_dir(&state_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };

    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let marker = entry.path().join(PORT_MARKER);
        if marker.exists() {
            debug!(path = %marker.display(), "Removing stale port marker");
            std::fs::remove_file(&marker)?;
        }
    }
    Ok(())
}

/// Apply the fixups of the current host. Failures only warn.
pub fn apply_platform_fixups(cache_dir: &Path) {
    if cfg!(target_os = "macos")
        && let Err(e) = remove_port_sockets(cache_dir)
    {
        warn!(cache = %cache_dir.display(), error = %e, "Couldn't remove port markers");
    }
}
