//! User-facing console messages.

use crate::env::{EnvSource, LINTCTL_DOCKER, ProcessEnv};
use colored::Colorize;
use std::io::IsTerminal;

/// Whether the process talks to a human at an interactive terminal.
pub fn is_interactive() -> bool {
    interactive_for(&ProcessEnv, std::io::stdout().is_terminal())
}

fn interactive_for(env: &dyn EnvSource, is_tty: bool) -> bool {
    is_tty && !env.is_set("CI") && !env.is_set(LINTCTL_DOCKER) && !env.is_set("NONINTERACTIVE")
}

/// Highlight a value inside a message.
pub fn primary_bold(text: &str) -> String {
    text.bold().to_string()
}

pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

pub fn warning(message: &str) {
    eprintln!("{} {}", "!".yellow().bold(), message);
}

pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Warning that should also surface as an annotation in CI logs.
pub fn warning_ci(message: &str) {
    eprintln!("{}", format_warning_ci(&ProcessEnv, message));
}

fn format_warning_ci(env: &dyn EnvSource, message: &str) -> String {
    let message = message.trim_end();
    if env.is_set("GITHUB_ACTIONS") {
        // Annotations are single-line; newlines must be URL-encoded.
        format!("::warning::{}", message.replace('\n', "%0A"))
    } else if env.is_set("CI") {
        format!("WARNING: {}", message)
    } else {
        format!("{} {}", "!".yellow().bold(), message)
    }
}
