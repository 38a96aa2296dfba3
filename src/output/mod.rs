//! Terminal output: colored messages and progress spinners.

pub mod console;
pub mod progress;

pub use console::{error, is_interactive, primary_bold, success, warning, warning_ci};
pub use progress::{Spinner, print_above};
