//! Run state shared between the lifecycle driver and the interrupt listener.

use super::CONTAINER_NAME_SENTINEL;
use indicatif::ProgressBar;
use std::sync::{Mutex, OnceLock};

/// The active container name and progress indicator of this process.
///
/// The name is written once, before the container is created. A signal that
/// arrives before that write sees the sentinel and stops nothing; one that
/// arrives between the write and the create call asks the engine to stop a
/// container that doesn't exist yet, which cleanup treats as a no-op.
#[derive(Default)]
pub struct RunState {
    container: OnceLock<String>,
    spinner: Mutex<Option<ProgressBar>>,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the container name. Later calls are ignored.
    pub fn record_container(&self, name: &str) {
        let _ = self.container.set(name.to_string());
    }

    /// Name of the active container, or the sentinel if none was created.
    pub fn container_name(&self) -> &str {
        self.container
            .get()
            .map(String::as_str)
            .unwrap_or(CONTAINER_NAME_SENTINEL)
    }

    pub fn has_container(&self) -> bool {
        self.container_name() != CONTAINER_NAME_SENTINEL
    }

    /// Make `bar` the indicator stopped on interruption.
    pub fn set_spinner(&self, bar: Option<ProgressBar>) {
        if let Ok(mut slot) = self.spinner.lock() {
            *slot = bar;
        }
    }

    pub fn spinner(&self) -> Option<ProgressBar> {
        self.spinner.lock().ok().and_then(|slot| slot.clone())
    }

    pub fn stop_spinner(&self) {
        if let Ok(mut slot) = self.spinner.lock()
            && let Some(bar) = slot.take()
        {
            bar.finish_and_clear();
        }
    }
}
