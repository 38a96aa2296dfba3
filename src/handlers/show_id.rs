//! `lintctl show-id`.

use super::{App, fail};
use crate::cli::ShowIdArgs;
use crate::context::ScanContext;
use crate::error::Result;
use std::process::ExitCode;

pub fn handle_show_id(app: &App, args: &ShowIdArgs) -> ExitCode {
    match show_id(app, args) {
        Ok(text) => {
            print!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn show_id(app: &App, args: &ShowIdArgs) -> Result<String> {
    let ctx = app.context(&args.project, args.project.to_inputs())?;
    Ok(describe(&ctx))
}

fn describe(ctx: &ScanContext) -> String {
    format!(
        "id: {}\nanalyzer: {}\nproject: {}\ncache: {}\nresults: {}\nreport: {}\n",
        ctx.id(),
        ctx.analyzer().name(),
        ctx.project_dir().display(),
        ctx.cache_dir().display(),
        ctx.results_dir().display(),
        ctx.report_dir().display(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::container_context;
    use tempfile::TempDir;

    #[test]
    fn test_describe_lists_id_and_dirs() {
        let dir = TempDir::new().unwrap();
        let ctx = container_context(dir.path(), "lintctl/linter-go:2025.1");
        let text = describe(&ctx);

        assert!(text.starts_with(&format!("id: {}\n", ctx.id())));
        assert!(text.contains("analyzer: lintctl/linter-go:2025.1"));
        assert!(text.contains(&format!("cache: {}", ctx.cache_dir().display())));
    }
}
