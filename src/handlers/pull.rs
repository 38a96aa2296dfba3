//! `lintctl pull`.

use super::{App, fail};
use crate::cli::PullArgs;
use crate::container::{DockerConfigStore, ImagePolicy, pull_image};
use crate::error::{LintError, Result};
use crate::output::{self, Spinner};
use std::process::ExitCode;

pub async fn handle_pull(app: &App, args: &PullArgs) -> ExitCode {
    match pull(app, args).await {
        Ok(image) => {
            output::success(&format!("Pulled {}", output::primary_bold(&image)));
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

async fn pull(app: &App, args: &PullArgs) -> Result<String> {
    let ctx = app.context(&args.project, args.project.to_inputs())?;
    let image = ctx
        .analyzer()
        .image()
        .ok_or_else(|| LintError::NativeAnalyzer(ctx.analyzer().name().to_string()))?
        .to_string();

    ImagePolicy::new(app.products.clone(), &app.cli_version).check_image(&image);

    let engine = app.engine()?;
    let credentials = DockerConfigStore::from_env(app.env.as_ref());
    let spinner = Spinner::start(
        &format!("Pulling the image {}", output::primary_bold(&image)),
        app.interactive,
    );
    app.state.set_spinner(spinner.handle());
    let result = pull_image(engine.as_ref(), &credentials, &image).await;
    app.state.stop_spinner();
    result.map(|()| image)
}
