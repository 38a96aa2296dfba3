use crate::context::{ClangArgs, ContextInputs, DotnetArgs, ScanOptions};
use crate::env::LINTCTL_TOKEN;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "lintctl",
    version,
    about = "Run static-analysis linters in containers",
    long_about = "lintctl configures, launches and monitors linter runs. Each linter runs in its own container with the project, cache and results directories mounted."
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a project with a containerized linter
    Scan(Box<ScanArgs>),

    /// Pull the linter image for a project
    Pull(PullArgs),

    /// List the supported linter images
    Images,

    /// Print the run identifier and directories of a project
    ShowId(ShowIdArgs),
}

/// Options that identify a project and its linter.
#[derive(Args, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// Root directory of the project to analyze
    #[arg(short = 'i', long, default_value = ".")]
    pub project_dir: PathBuf,

    /// Linter image to run, e.g. lintctl/linter-jvm:2025.1
    #[arg(short = 'l', long)]
    pub linter: Option<String>,

    /// Native analyzer product code
    #[arg(long)]
    pub ide: Option<String>,

    /// Project configuration file (default: lintctl.yaml in the project)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory for the linter caches
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct PullArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ShowIdArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ScanArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Directory for analysis results
    #[arg(short = 'o', long)]
    pub results_dir: Option<PathBuf>,

    /// Directory for the HTML report
    #[arg(long)]
    pub report_dir: Option<PathBuf>,

    /// Directory with global configurations
    #[arg(long)]
    pub global_config_dir: Option<PathBuf>,

    /// Upload token for the cloud service
    #[arg(long, env = LINTCTL_TOKEN, hide_env_values = true)]
    pub token: Option<String>,

    /// Extra environment variable for the linter (KEY=VALUE, repeatable)
    #[arg(short = 'e', long = "env", value_parser = parse_env_pair)]
    pub env: Vec<(String, String)>,

    /// Extra volume to mount (SOURCE:TARGET, repeatable)
    #[arg(short = 'v', long = "volume")]
    pub volumes: Vec<String>,

    /// User to run the container as (UID[:GID])
    #[arg(short = 'u', long)]
    pub user: Option<String>,

    /// Host port for JVM debugging of the linter
    #[arg(long)]
    pub jvm_debug_port: Option<u16>,

    /// Use the local image without pulling
    #[arg(long)]
    pub skip_pull: bool,

    /// Empty the cache directory before the run
    #[arg(long)]
    pub clear_cache: bool,

    /// Save the HTML report
    #[arg(long)]
    pub save_report: bool,

    /// Directory inside the project to analyze
    #[arg(short = 'd', long)]
    pub source_directory: Option<String>,

    /// Skip the sanity inspections
    #[arg(long)]
    pub disable_sanity: bool,

    /// Inspection profile name
    #[arg(short = 'n', long)]
    pub profile_name: Option<String>,

    /// Inspection profile path
    #[arg(short = 'p', long)]
    pub profile_path: Option<String>,

    /// Run promotional inspections (true or false)
    #[arg(long)]
    pub run_promo: Option<String>,

    /// Baseline SARIF file, relative to the project
    #[arg(short = 'b', long)]
    pub baseline: Option<String>,

    /// Keep absent baseline problems in the report
    #[arg(long)]
    pub baseline_include_absent: bool,

    /// Number of problems that fails the run
    #[arg(long)]
    pub fail_threshold: Option<u32>,

    /// Identifier of this analysis
    #[arg(long)]
    pub analysis_id: Option<String>,

    /// Linter property (KEY=VALUE, repeatable)
    #[arg(long = "property")]
    pub properties: Vec<String>,

    /// .NET solution file
    #[arg(long)]
    pub solution: Option<String>,

    /// .NET project file
    #[arg(long = "project")]
    pub dotnet_project: Option<String>,

    /// .NET build configuration
    #[arg(long)]
    pub configuration: Option<String>,

    /// .NET build platform
    #[arg(long)]
    pub platform: Option<String>,

    /// Don't build the .NET project before analysis
    #[arg(long)]
    pub no_build: bool,

    /// Path to compile_commands.json
    #[arg(long)]
    pub compile_commands: Option<String>,

    /// Extra arguments for clang
    #[arg(long)]
    pub clang_args: Option<String>,
}

impl ScanArgs {
    pub fn to_inputs(&self) -> ContextInputs {
        ContextInputs {
            project_dir: self.project.project_dir.clone(),
            linter: self.project.linter.clone(),
            ide: self.project.ide.clone(),
            cache_dir: self.project.cache_dir.clone(),
            results_dir: self.results_dir.clone(),
            report_dir: self.report_dir.clone(),
            global_config_dir: self.global_config_dir.clone(),
            token: self.token.clone(),
            env: self.env.clone(),
            volumes: self.volumes.clone(),
            user: self.user.clone(),
            jvm_debug_port: self.jvm_debug_port,
            skip_pull: self.skip_pull,
            clear_cache: self.clear_cache,
            dotnet: DotnetArgs {
                solution: self.solution.clone(),
                project: self.dotnet_project.clone(),
                configuration: self.configuration.clone(),
                platform: self.platform.clone(),
                no_build: self.no_build,
            },
            clang: ClangArgs {
                compile_commands: self.compile_commands.clone(),
                clang_args: self.clang_args.clone(),
            },
            options: ScanOptions {
                save_report: self.save_report,
                source_directory: self.source_directory.clone(),
                disable_sanity: self.disable_sanity,
                profile_name: self.profile_name.clone(),
                profile_path: self.profile_path.clone(),
                run_promo: self.run_promo.clone(),
                baseline: self.baseline.clone(),
                baseline_include_absent: self.baseline_include_absent,
                fail_threshold: self.fail_threshold,
                analysis_id: self.analysis_id.clone(),
                properties: self.properties.clone(),
            },
        }
    }
}

impl ProjectArgs {
    pub fn to_inputs(&self) -> ContextInputs {
        ContextInputs {
            project_dir: self.project_dir.clone(),
            linter: self.linter.clone(),
            ide: self.ide.clone(),
            cache_dir: self.cache_dir.clone(),
            ..Default::default()
        }
    }
}

/// Parse a `KEY=VALUE` environment entry.
pub fn parse_env_pair(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}
