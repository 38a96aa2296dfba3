//! Container run settings built from a scan context.

use super::{
    CONTAINER_DEBUG_PORT, CONTAINER_NAME_SENTINEL, DATA_CACHE_DIR, DATA_GLOBAL_CONFIG_DIR,
    DATA_PROJECT_DIR, DATA_REPORT_DIR, DATA_RESULTS_DIR,
};
use crate::cloud::CloudEndpoint;
use crate::context::{ContextError, ScanContext, container_command};
use crate::env::{
    self, EnvSource, LINTCTL_CLI_CONTAINER_KEEP, LINTCTL_CLI_CONTAINER_NAME, LINTCTL_LICENSE,
    LINTCTL_LICENSE_ONLY_TOKEN, LINTCTL_TOKEN,
};
use crate::error::{LintError, Result};
use std::path::Path;

/// Image family that needs ptrace for its debugger and profiler hooks.
const PTRACE_IMAGE_MARKER: &str = "dotnet";
const PTRACE_CAPABILITY: &str = "SYS_PTRACE";
const SECCOMP_UNCONFINED: &str = "seccomp=unconfined";
const HOST_NETWORK: &str = "host";
const ALL_INTERFACES: &str = "0.0.0.0";

/// A bind mount from the host into the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    pub source: String,
    pub target: String,
}

impl Mount {
    fn bind(source: &Path, target: &str) -> Self {
        Self {
            source: source.to_string_lossy().into_owned(),
            target: target.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortBinding {
    /// Port inside the container, e.g. `5005/tcp`.
    pub container_port: String,
    pub host_ip: String,
    pub host_port: String,
}

/// Everything the engine needs to create the linter container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRunSpec {
    pub name: String,
    pub image: String,
    pub cmd: Vec<String>,
    pub env: Vec<String>,
    pub mounts: Vec<Mount>,
    pub exposed_ports: Vec<String>,
    pub port_bindings: Vec<PortBinding>,
    pub cap_add: Vec<String>,
    pub security_opt: Vec<String>,
    /// `None` keeps the engine default (bridge).
    pub network_mode: Option<String>,
    pub auto_remove: bool,
    pub tty: bool,
    pub attach_stdout: bool,
    pub attach_stderr: bool,
    pub user: Option<String>,
}

/// Builds [`ContainerRunSpec`]s.
pub struct SpecBuilder<'a> {
    env: &'a dyn EnvSource,
    endpoint: CloudEndpoint,
    cli_version: String,
    interactive: bool,
    windows_paths: bool,
}

impl<'a> SpecBuilder<'a> {
    pub fn new(env: &'a dyn EnvSource, endpoint: CloudEndpoint, cli_version: &str) -> Self {
        Self {
            env,
            endpoint,
            cli_version: cli_version.to_string(),
            interactive: false,
            windows_paths: cfg!(windows),
        }
    }

    /// Allocate a pseudo-terminal for the container.
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Parse user volumes with drive-letter paths.
    pub fn windows_paths(mut self, windows_paths: bool) -> Self {
        self.windows_paths = windows_paths;
        self
    }

    pub fn build(&self, ctx: &ScanContext) -> Result<ContainerRunSpec> {
        let image = ctx
            .analyzer()
            .image()
            .ok_or_else(|| LintError::NativeAnalyzer(ctx.analyzer().name().to_string()))?
            .to_string();

        let mut ctx = ctx.clone();
        env::extract_ci_environment(self.env, &self.cli_version, |key, value| {
            ctx = ctx.with_env(key, value);
        });

        let mut env = ctx.env();
        if let Some(token) = ctx.upload_token() {
            env.push(format!("{}={}", LINTCTL_TOKEN, token));
        } else if let Some(token) = ctx.license_only_token() {
            env.push(format!("{}={}", LINTCTL_LICENSE_ONLY_TOKEN, token));
        }

        let name = self
            .env
            .var(LINTCTL_CLI_CONTAINER_NAME)
            .unwrap_or_else(|| format!("{}-{}", CONTAINER_NAME_SENTINEL, ctx.id()));

        let mut mounts = vec![
            Mount::bind(ctx.cache_dir(), DATA_CACHE_DIR),
            Mount::bind(ctx.project_dir(), DATA_PROJECT_DIR),
            Mount::bind(ctx.results_dir(), DATA_RESULTS_DIR),
            Mount::bind(ctx.report_dir(), DATA_REPORT_DIR),
        ];
        if let Some(dir) = ctx.global_config_dir() {
            mounts.push(Mount::bind(dir, DATA_GLOBAL_CONFIG_DIR));
        }
        for volume in ctx.volumes() {
            let mut mount = parse_volume(volume, self.windows_paths)?;
            mount.source = absolute_source(&mount.source)?;
            mounts.push(mount);
        }

        let (exposed_ports, port_bindings) = match ctx.jvm_debug_port() {
            Some(port) => (
                vec![CONTAINER_DEBUG_PORT.to_string()],
                vec![PortBinding {
                    container_port: CONTAINER_DEBUG_PORT.to_string(),
                    host_ip: ALL_INTERFACES.to_string(),
                    host_port: port.to_string(),
                }],
            ),
            None => (Vec::new(), Vec::new()),
        };

        let (cap_add, security_opt) = if image.contains(PTRACE_IMAGE_MARKER) {
            (
                vec![PTRACE_CAPABILITY.to_string()],
                vec![SECCOMP_UNCONFINED.to_string()],
            )
        } else {
            (Vec::new(), Vec::new())
        };

        let network_mode = self
            .endpoint
            .is_plaintext()
            .then(|| HOST_NETWORK.to_string());

        Ok(ContainerRunSpec {
            name,
            image,
            cmd: container_command(&ctx),
            env,
            mounts,
            exposed_ports,
            port_bindings,
            cap_add,
            security_opt,
            network_mode,
            auto_remove: !self.env.is_set(LINTCTL_CLI_CONTAINER_KEEP),
            tty: self.interactive,
            attach_stdout: true,
            attach_stderr: true,
            user: ctx.user().map(str::to_string),
        })
    }
}

/// Split a `source:target` volume string.
///
/// With drive-letter paths the first two segments form the source
/// (`C:\src:/data`), so at least three segments are required.
pub fn parse_volume(volume: &str, windows_paths: bool) -> Result<Mount> {
    let parts: Vec<&str> = volume.split(':').collect();
    let (source, target) = if windows_paths {
        match parts.as_slice() {
            [drive, path, target, ..] => (format!("{}:{}", drive, path), target.to_string()),
            _ => (String::new(), String::new()),
        }
    } else {
        match parts.as_slice() {
            [source, target, ..] => (source.to_string(), target.to_string()),
            _ => (String::new(), String::new()),
        }
    };

    if source.is_empty() || target.is_empty() || source.ends_with(':') {
        return Err(LintError::InvalidVolume(volume.to_string()));
    }
    Ok(Mount { source, target })
}

/// Resolve a bind source against the working directory.
fn absolute_source(source: &str) -> Result<String> {
    let path = Path::new(source);
    let absolute = std::path::absolute(path).map_err(|e| ContextError::AbsolutePath {
        what: "volume",
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(absolute.to_string_lossy().into_owned())
}

/// Equivalent `docker run` command line, for debug logs.
///
/// Upload tokens are left out.
pub fn debug_run_command(spec: &ContainerRunSpec) -> String {
    let mut parts = vec!["docker".to_string(), "run".to_string()];
    if spec.auto_remove {
        parts.push("--rm".to_string());
    }
    if spec.attach_stdout {
        parts.push("-a stdout".to_string());
    }
    if spec.attach_stderr {
        parts.push("-a stderr".to_string());
    }
    if spec.tty {
        parts.push("-it".to_string());
    }
    if let Some(user) = &spec.user {
        parts.push(format!("-u {}", user));
    }
    for entry in &spec.env {
        let secret = entry.contains(LINTCTL_TOKEN)
            && !entry.contains(LINTCTL_LICENSE)
            && !entry.contains(LINTCTL_LICENSE_ONLY_TOKEN);
        if !secret {
            parts.push(format!("-e {}", entry));
        }
    }
    for mount in &spec.mounts {
        parts.push(format!("-v {}:{}", mount.source, mount.target));
    }
    for cap in &spec.cap_add {
        parts.push(format!("--cap-add {}", cap));
    }
    for opt in &spec.security_opt {
        parts.push(format!("--security-opt {}", opt));
    }
    parts.push(spec.image.clone());
    parts.extend(spec.cmd.iter().cloned());
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ContextInputs, ScanOptions};
    use crate::env::{LINTCTL_BRANCH, MapEnv};
    use crate::test_utils::fixtures::{container_context, context_from, context_from_env, inputs};
    use tempfile::TempDir;

    const IMAGE: &str = "lintctl/linter-jvm:2025.1";

    fn build(env: &MapEnv, ctx: &ScanContext) -> ContainerRunSpec {
        SpecBuilder::new(env, CloudEndpoint::default(), "2025.1.0")
            .windows_paths(false)
            .build(ctx)
            .unwrap()
    }

    #[test]
    fn test_fixed_mounts_are_absolute() {
        let dir = TempDir::new().unwrap();
        let ctx = container_context(dir.path(), IMAGE);
        let spec = build(&MapEnv::new(), &ctx);

        let targets: Vec<&str> = spec.mounts.iter().map(|m| m.target.as_str()).collect();
        assert_eq!(
            targets,
            vec![DATA_CACHE_DIR, DATA_PROJECT_DIR, DATA_RESULTS_DIR, DATA_REPORT_DIR]
        );
        assert!(spec.mounts.iter().all(|m| Path::new(&m.source).is_absolute()));
    }

    #[test]
    fn test_global_config_and_user_volumes() {
        let dir = TempDir::new().unwrap();
        let ctx = context_from(ContextInputs {
            global_config_dir: Some(dir.path().join("global")),
            volumes: vec!["/host/tools:/opt/tools".into()],
            ..inputs(dir.path(), IMAGE)
        });
        let spec = build(&MapEnv::new(), &ctx);

        assert_eq!(spec.mounts.len(), 6);
        assert_eq!(spec.mounts[4].target, DATA_GLOBAL_CONFIG_DIR);
        assert_eq!(
            spec.mounts[5],
            Mount {
                source: "/host/tools".into(),
                target: "/opt/tools".into()
            }
        );
    }

    #[test]
    fn test_relative_volume_source_is_resolved() {
        let dir = TempDir::new().unwrap();
        let ctx = context_from(ContextInputs {
            volumes: vec!["./tools:/opt/tools".into()],
            ..inputs(dir.path(), IMAGE)
        });
        let spec = build(&MapEnv::new(), &ctx);

        assert!(spec.mounts.iter().all(|m| Path::new(&m.source).is_absolute()));
        let user = &spec.mounts[4];
        assert!(Path::new(&user.source).ends_with("tools"));
        assert_eq!(user.target, "/opt/tools");
    }

    #[test]
    fn test_malformed_volume_fails() {
        let dir = TempDir::new().unwrap();
        let ctx = context_from(ContextInputs {
            volumes: vec!["/only-source".into()],
            ..inputs(dir.path(), IMAGE)
        });
        let err = SpecBuilder::new(&MapEnv::new(), CloudEndpoint::default(), "2025.1.0")
            .windows_paths(false)
            .build(&ctx)
            .unwrap_err();
        assert!(matches!(err, LintError::InvalidVolume(v) if v == "/only-source"));
    }

    #[test]
    fn test_parse_volume_posix() {
        assert_eq!(
            parse_volume("/a:/b", false).unwrap(),
            Mount {
                source: "/a".into(),
                target: "/b".into()
            }
        );
        assert!(parse_volume(":/b", false).is_err());
        assert!(parse_volume("/a:", false).is_err());
        assert!(parse_volume("", false).is_err());
    }

    #[test]
    fn test_parse_volume_windows_drive_letter() {
        let mount = parse_volume(r"C:\src:/data/src", true).unwrap();
        assert_eq!(mount.source, r"C:\src");
        assert_eq!(mount.target, "/data/src");
        assert!(parse_volume(r"C:\src", true).is_err());
    }

    #[test]
    fn test_debug_port_published_on_all_interfaces() {
        let dir = TempDir::new().unwrap();
        let ctx = context_from(ContextInputs {
            jvm_debug_port: Some(5005),
            ..inputs(dir.path(), IMAGE)
        });
        let spec = build(&MapEnv::new(), &ctx);

        assert_eq!(spec.exposed_ports, vec![CONTAINER_DEBUG_PORT]);
        assert_eq!(
            spec.port_bindings,
            vec![PortBinding {
                container_port: "5005/tcp".into(),
                host_ip: "0.0.0.0".into(),
                host_port: "5005".into(),
            }]
        );
    }

    #[test]
    fn test_no_ports_without_debug_port() {
        let dir = TempDir::new().unwrap();
        let spec = build(&MapEnv::new(), &container_context(dir.path(), IMAGE));
        assert!(spec.exposed_ports.is_empty());
        assert!(spec.port_bindings.is_empty());
    }

    #[test]
    fn test_dotnet_image_gets_ptrace() {
        let dir = TempDir::new().unwrap();
        let ctx = container_context(dir.path(), "lintctl/linter-dotnet:2025.1");
        let spec = build(&MapEnv::new(), &ctx);
        assert_eq!(spec.cap_add, vec!["SYS_PTRACE"]);
        assert_eq!(spec.security_opt, vec!["seccomp=unconfined"]);

        let spec = build(&MapEnv::new(), &container_context(dir.path(), IMAGE));
        assert!(spec.cap_add.is_empty());
        assert!(spec.security_opt.is_empty());
    }

    #[test]
    fn test_plaintext_endpoint_uses_host_network() {
        let dir = TempDir::new().unwrap();
        let ctx = container_context(dir.path(), IMAGE);
        let env = MapEnv::new();

        let local = SpecBuilder::new(
            &env,
            CloudEndpoint::new("http://localhost:8080"),
            "2025.1.0",
        )
        .build(&ctx)
        .unwrap();
        assert_eq!(local.network_mode.as_deref(), Some("host"));

        let remote = SpecBuilder::new(
            &env,
            CloudEndpoint::new("https://cloud.lintctl.dev"),
            "2025.1.0",
        )
        .build(&ctx)
        .unwrap();
        assert_eq!(remote.network_mode, None);
    }

    #[test]
    fn test_upload_token_excludes_license_only_token() {
        let dir = TempDir::new().unwrap();
        let license = MapEnv::new().with(LINTCTL_LICENSE_ONLY_TOKEN, "license");

        let ctx = context_from_env(
            ContextInputs {
                token: Some("upload".into()),
                ..inputs(dir.path(), IMAGE)
            },
            &license,
        );
        let spec = build(&MapEnv::new(), &ctx);
        assert!(spec.env.contains(&"LINTCTL_TOKEN=upload".to_string()));
        assert!(!spec.env.iter().any(|e| e.starts_with(LINTCTL_LICENSE_ONLY_TOKEN)));

        let ctx = context_from_env(inputs(dir.path(), IMAGE), &license);
        let spec = build(&MapEnv::new(), &ctx);
        assert!(spec.env.contains(&"LINTCTL_LICENSE_ONLY_TOKEN=license".to_string()));
        assert!(!spec.env.iter().any(|e| e.starts_with("LINTCTL_TOKEN=")));
    }

    #[test]
    fn test_no_tokens_no_token_env() {
        let dir = TempDir::new().unwrap();
        let spec = build(&MapEnv::new(), &container_context(dir.path(), IMAGE));
        assert!(!spec.env.iter().any(|e| e.contains("TOKEN")));
    }

    #[test]
    fn test_default_and_overridden_name() {
        let dir = TempDir::new().unwrap();
        let ctx = container_context(dir.path(), IMAGE);

        let spec = build(&MapEnv::new(), &ctx);
        assert_eq!(spec.name, format!("lintctl-cli-{}", ctx.id()));

        let env = MapEnv::new().with(LINTCTL_CLI_CONTAINER_NAME, "custom");
        assert_eq!(build(&env, &ctx).name, "custom");
    }

    #[test]
    fn test_keep_container_disables_auto_remove() {
        let dir = TempDir::new().unwrap();
        let ctx = container_context(dir.path(), IMAGE);
        assert!(build(&MapEnv::new(), &ctx).auto_remove);

        let env = MapEnv::new().with(LINTCTL_CLI_CONTAINER_KEEP, "1");
        assert!(!build(&env, &ctx).auto_remove);
    }

    #[test]
    fn test_tty_follows_interactive() {
        let dir = TempDir::new().unwrap();
        let ctx = container_context(dir.path(), IMAGE);
        let env = MapEnv::new();
        let spec = SpecBuilder::new(&env, CloudEndpoint::default(), "2025.1.0")
            .interactive(true)
            .build(&ctx)
            .unwrap();
        assert!(spec.tty);
        assert!(spec.attach_stdout && spec.attach_stderr);
        assert!(!build(&env, &ctx).tty);
    }

    #[test]
    fn test_ci_metadata_is_forwarded() {
        let dir = TempDir::new().unwrap();
        let ctx = container_context(dir.path(), IMAGE);
        let env = MapEnv::new()
            .with("GITHUB_ACTIONS", "true")
            .with("GITHUB_REF_NAME", "main");
        let spec = build(&env, &ctx);
        assert!(spec.env.contains(&format!("{}=main", LINTCTL_BRANCH)));
        assert_eq!(ctx.env_var(LINTCTL_BRANCH), None);
    }

    #[test]
    fn test_command_from_scan_options() {
        let dir = TempDir::new().unwrap();
        let ctx = context_from(ContextInputs {
            options: ScanOptions {
                save_report: true,
                ..Default::default()
            },
            ..inputs(dir.path(), IMAGE)
        });
        assert_eq!(build(&MapEnv::new(), &ctx).cmd, vec!["--save-report"]);
    }

    #[test]
    fn test_native_analyzer_is_rejected() {
        let dir = TempDir::new().unwrap();
        let ctx = context_from(ContextInputs {
            linter: None,
            ide: Some("QDJVM".into()),
            ..inputs(dir.path(), IMAGE)
        });
        let err = SpecBuilder::new(&MapEnv::new(), CloudEndpoint::default(), "2025.1.0")
            .build(&ctx)
            .unwrap_err();
        assert!(matches!(err, LintError::NativeAnalyzer(code) if code == "QDJVM"));
    }

    #[test]
    fn test_debug_command_order_and_redaction() {
        let spec = ContainerRunSpec {
            name: "lintctl-cli-x".into(),
            image: "lintctl/linter-go:2025.1".into(),
            cmd: vec!["--save-report".into()],
            env: vec![
                "A=1".into(),
                "LINTCTL_TOKEN=secret".into(),
                "LINTCTL_LICENSE_ONLY_TOKEN=lic".into(),
            ],
            mounts: vec![Mount {
                source: "/p".into(),
                target: "/data/project".into(),
            }],
            exposed_ports: Vec::new(),
            port_bindings: Vec::new(),
            cap_add: vec!["SYS_PTRACE".into()],
            security_opt: vec!["seccomp=unconfined".into()],
            network_mode: None,
            auto_remove: true,
            tty: true,
            attach_stdout: true,
            attach_stderr: true,
            user: Some("1000:1000".into()),
        };

        assert_eq!(
            debug_run_command(&spec),
            "docker run --rm -a stdout -a stderr -it -u 1000:1000 -e A=1 \
             -e LINTCTL_LICENSE_ONLY_TOKEN=lic -v /p:/data/project --cap-add SYS_PTRACE \
             --security-opt seccomp=unconfined lintctl/linter-go:2025.1 --save-report"
        );
    }
}
