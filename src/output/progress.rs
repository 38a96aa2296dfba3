//! Spinner shown while long container operations run.

use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::time::Duration;

const TICK: Duration = Duration::from_millis(120);

/// Spinner for a single long-running step.
///
/// Only drawn at an interactive terminal; elsewhere the step message is
/// printed once so CI logs still show progress.
pub struct Spinner {
    bar: Option<ProgressBar>,
}

impl Spinner {
    pub fn start(message: &str, interactive: bool) -> Self {
        if !interactive {
            eprintln!("{}", message);
            return Self { bar: None };
        }
        Self {
            bar: Some(create_spinner(message)),
        }
    }

    /// Handle used to stop the spinner from another task.
    pub fn handle(&self) -> Option<ProgressBar> {
        self.bar.clone()
    }

    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Write container output to stdout without tearing an active spinner.
pub fn print_above(bar: Option<&ProgressBar>, text: &str) {
    let write = || {
        let mut stdout = std::io::stdout().lock();
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
    };
    match bar {
        Some(bar) if !bar.is_finished() => bar.suspend(write),
        _ => write(),
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⣾⣽⣻⢿⡿⣟⣯⣷ "),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(TICK);
    pb
}
