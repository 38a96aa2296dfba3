//! `lintctl images`.

use super::App;
use std::process::ExitCode;

pub fn handle_images(app: &App) -> ExitCode {
    for image in app.products.all_images() {
        println!("{}", image);
    }
    ExitCode::SUCCESS
}
