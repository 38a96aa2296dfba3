//! Translation of scan options into the linter container's command line.

use super::{LinterArgs, ScanContext};

/// Arguments passed to the linter entrypoint inside the container.
pub fn container_command(ctx: &ScanContext) -> Vec<String> {
    let opts = ctx.options();
    let mut args = Vec::new();

    if opts.save_report {
        args.push("--save-report".to_string());
    }
    if let Some(dir) = &opts.source_directory {
        args.push(format!("--source-directory={}", dir));
    }
    if opts.disable_sanity {
        args.push("--disable-sanity".to_string());
    }
    if let Some(name) = &opts.profile_name {
        args.push(format!("--profile-name={}", name));
    }
    if let Some(path) = &opts.profile_path {
        args.push(format!("--profile-path={}", path));
    }
    if let Some(promo) = &opts.run_promo {
        args.push(format!("--run-promo={}", promo));
    }
    if let Some(baseline) = &opts.baseline {
        args.push(format!("--baseline={}", baseline));
    }
    if opts.baseline_include_absent {
        args.push("--baseline-include-absent".to_string());
    }
    if let Some(threshold) = opts.fail_threshold {
        args.push(format!("--fail-threshold={}", threshold));
    }
    if let Some(id) = &opts.analysis_id {
        args.push(format!("--analysis-id={}", id));
    }
    for property in &opts.properties {
        args.push(format!("--property={}", property));
    }

    match ctx.linter_args() {
        LinterArgs::Dotnet(dotnet) => {
            let pairs = [
                ("solution", &dotnet.solution),
                ("project", &dotnet.project),
                ("configuration", &dotnet.configuration),
                ("platform", &dotnet.platform),
            ];
            for (flag, value) in pairs {
                if let Some(value) = value {
                    args.push(format!("--{}={}", flag, value));
                }
            }
            if dotnet.no_build {
                args.push("--no-build".to_string());
            }
        }
        LinterArgs::Clang(clang) => {
            if let Some(path) = &clang.compile_commands {
                args.push(format!("--compile-commands={}", path));
            }
            if let Some(extra) = &clang.clang_args {
                args.push(format!("--clang-args={}", extra));
            }
        }
        LinterArgs::None => {}
    }

    args
}
