//! Scan context computation from CLI options, project configuration and environment.

use super::{
    Analyzer, ClangArgs, ContextError, DotnetArgs, LinterArgs, RunId, ScanContext, ScanOptions,
};
use crate::config::ProjectConfig;
use crate::container::{DATA_CACHE_DIR, DATA_REPORT_DIR, DATA_RESULTS_DIR};
use crate::env::{self, EnvSource, LINTCTL_LICENSE_ONLY_TOKEN};
use crate::product::{self, ProductTable};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Raw inputs collected by the CLI layer.
#[derive(Debug, Clone, Default)]
pub struct ContextInputs {
    pub project_dir: PathBuf,
    pub linter: Option<String>,
    pub ide: Option<String>,
    pub cache_dir: Option<PathBuf>,
    pub results_dir: Option<PathBuf>,
    pub report_dir: Option<PathBuf>,
    pub global_config_dir: Option<PathBuf>,
    pub token: Option<String>,
    pub env: Vec<(String, String)>,
    pub volumes: Vec<String>,
    pub user: Option<String>,
    pub jvm_debug_port: Option<u16>,
    pub skip_pull: bool,
    pub clear_cache: bool,
    pub dotnet: DotnetArgs,
    pub clang: ClangArgs,
    pub options: ScanOptions,
}

/// Resolve a scan context.
pub fn compute(
    inputs: ContextInputs,
    config: &ProjectConfig,
    products: &ProductTable,
    env: &dyn EnvSource,
) -> Result<ScanContext, ContextError> {
    let project_dir = absolute("project", &inputs.project_dir)?;
    let analyzer = resolve_analyzer(&inputs, config, &project_dir)?;
    let id = RunId::compute(analyzer.name(), &project_dir);

    let system_dir = match &inputs.cache_dir {
        Some(cache_dir) => {
            let cache_dir = absolute("cache", cache_dir)?;
            cache_dir
                .parent()
                .and_then(Path::parent)
                .map(Path::to_path_buf)
                .unwrap_or(cache_dir)
        }
        None => dirs::cache_dir()
            .ok_or(ContextError::NoCacheDir)?
            .join("lintctl"),
    };
    let linter_dir = system_dir.join(id.as_str());
    let in_container = env::is_container(env);

    let results_dir = match &inputs.results_dir {
        Some(dir) => dir.clone(),
        None if in_container => PathBuf::from(DATA_RESULTS_DIR),
        None => linter_dir.join("results"),
    };
    let cache_dir = match &inputs.cache_dir {
        Some(dir) => dir.clone(),
        None if in_container => PathBuf::from(DATA_CACHE_DIR),
        None => linter_dir.join("cache"),
    };
    let report_dir = match &inputs.report_dir {
        Some(dir) => dir.clone(),
        None if in_container => PathBuf::from(DATA_REPORT_DIR),
        None => results_dir.join("report"),
    };

    let global_config_dir = inputs
        .global_config_dir
        .as_deref()
        .map(|dir| absolute("global configurations", dir))
        .transpose()?;

    let linter_args = linter_args(&analyzer, products, config, inputs.dotnet, inputs.clang);

    let mut options = inputs.options;
    let mut properties = config.properties.clone();
    properties.append(&mut options.properties);
    options.properties = properties;
    options.fail_threshold = options.fail_threshold.or(config.fail_threshold);

    let ctx = ScanContext {
        analyzer,
        id,
        cache_dir: absolute("cache", &cache_dir)?,
        results_dir: absolute("results", &results_dir)?,
        report_dir: absolute("report", &report_dir)?,
        project_dir,
        global_config_dir,
        upload_token: inputs.token.filter(|t| !t.is_empty()),
        license_only_token: env.var(LINTCTL_LICENSE_ONLY_TOKEN),
        env: dedup_env(inputs.env),
        volumes: inputs.volumes,
        user: inputs.user,
        jvm_debug_port: inputs.jvm_debug_port,
        skip_pull: inputs.skip_pull,
        clear_cache: inputs.clear_cache,
        linter_args,
        options,
    };

    debug!(
        id = %ctx.id,
        analyzer = ctx.analyzer.name(),
        cache = %ctx.cache_dir.display(),
        results = %ctx.results_dir.display(),
        "Scan context computed"
    );
    Ok(ctx)
}

fn absolute(what: &'static str, path: &Path) -> Result<PathBuf, ContextError> {
    std::path::absolute(path).map_err(|source| ContextError::AbsolutePath {
        what,
        path: path.to_path_buf(),
        source,
    })
}

fn resolve_analyzer(
    inputs: &ContextInputs,
    config: &ProjectConfig,
    project_dir: &Path,
) -> Result<Analyzer, ContextError> {
    match (&inputs.linter, &inputs.ide) {
        (Some(linter), Some(ide)) => Err(ContextError::ConflictingOverrides {
            linter: linter.clone(),
            ide: ide.clone(),
        }),
        (Some(linter), None) => Ok(Analyzer::Container(linter.clone())),
        (None, Some(ide)) => Ok(Analyzer::Native(ide.clone())),
        (None, None) => match (&config.linter, &config.ide) {
            (Some(linter), _) => Ok(Analyzer::Container(linter.clone())),
            (None, Some(ide)) => Ok(Analyzer::Native(ide.clone())),
            (None, None) => Err(ContextError::NoAnalyzer(project_dir.to_path_buf())),
        },
    }
}

fn linter_args(
    analyzer: &Analyzer,
    products: &ProductTable,
    config: &ProjectConfig,
    dotnet: DotnetArgs,
    clang: ClangArgs,
) -> LinterArgs {
    let code = match analyzer {
        Analyzer::Native(code) => products.guess_product_code(Some(code), None),
        Analyzer::Container(image) => products.guess_product_code(None, Some(image)),
    };
    let name = analyzer.name();

    let is_dotnet = matches!(code.as_deref(), Some(product::QDNET | product::QDNETC))
        || name.contains("dotnet")
        || name.contains("cdnet");
    let is_clang = matches!(code.as_deref(), Some(product::QDCLC | product::QDCPP))
        || name.contains("clang")
        || name.contains("-cpp");

    if is_dotnet {
        LinterArgs::Dotnet(DotnetArgs {
            solution: dotnet.solution.or_else(|| config.dotnet.solution.clone()),
            project: dotnet.project.or_else(|| config.dotnet.project.clone()),
            configuration: dotnet
                .configuration
                .or_else(|| config.dotnet.configuration.clone()),
            platform: dotnet.platform.or_else(|| config.dotnet.platform.clone()),
            no_build: dotnet.no_build,
        })
    } else if is_clang {
        LinterArgs::Clang(ClangArgs {
            compile_commands: clang
                .compile_commands
                .or_else(|| config.clang.compile_commands.clone()),
            clang_args: clang.clang_args.or_else(|| config.clang.args.clone()),
        })
    } else {
        LinterArgs::None
    }
}

fn dedup_env(entries: Vec<(String, String)>) -> Vec<(String, String)> {
    let mut out: Vec<(String, String)> = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        match out.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => out.push((key, value)),
        }
    }
    out
}
