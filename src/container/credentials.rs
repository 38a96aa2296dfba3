//! Registry credentials from the local Docker client configuration.

use crate::env::EnvSource;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::debug;

/// Username credential helpers report for identity tokens.
const IDENTITY_TOKEN_USER: &str = "<token>";

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Credential helper docker-credential-{helper} couldn't be run: {source}")]
    HelperSpawn {
        helper: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Credential helper docker-credential-{helper} failed: {message}")]
    Helper { helper: String, message: String },

    #[error("Malformed auth entry for {0}")]
    MalformedAuth(String),
}

/// Credentials attached to an authenticated pull.
///
/// The engine client encodes them into the `X-Registry-Auth` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryAuth {
    pub username: Option<String>,
    pub password: Option<String>,
    pub auth: Option<String>,
    pub serveraddress: Option<String>,
    pub identitytoken: Option<String>,
}

/// Lookup of stored registry credentials by hostname.
pub trait CredentialStore: Send + Sync {
    fn lookup(&self, host: &str) -> Result<Option<RegistryAuth>, CredentialError>;
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    auths: HashMap<String, AuthEntry>,
    #[serde(default, rename = "credHelpers")]
    cred_helpers: HashMap<String, String>,
    #[serde(default, rename = "credsStore")]
    creds_store: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AuthEntry {
    auth: Option<String>,
    username: Option<String>,
    password: Option<String>,
    identitytoken: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HelperResponse {
    #[serde(rename = "Username", default)]
    username: String,
    #[serde(rename = "Secret", default)]
    secret: String,
}

/// Credentials from `config.json` of the Docker CLI.
#[derive(Debug, Clone)]
pub struct DockerConfigStore {
    path: PathBuf,
}

impl DockerConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$DOCKER_CONFIG/config.json`, else `~/.docker/config.json`.
    pub fn from_env(env: &dyn EnvSource) -> Self {
        let dir = env
            .var("DOCKER_CONFIG")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".docker")))
            .unwrap_or_else(|| PathBuf::from(".docker"));
        Self::new(dir.join("config.json"))
    }

    fn load(&self) -> Result<Option<ConfigFile>, CredentialError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(CredentialError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| CredentialError::Parse {
                path: self.path.clone(),
                source,
            })
    }
}

impl CredentialStore for DockerConfigStore {
    fn lookup(&self, host: &str) -> Result<Option<RegistryAuth>, CredentialError> {
        let Some(config) = self.load()? else {
            debug!(path = %self.path.display(), "No Docker client configuration");
            return Ok(None);
        };

        let helper = config
            .cred_helpers
            .get(host)
            .or(config.creds_store.as_ref());
        if let Some(helper) = helper {
            debug!(host, helper = helper.as_str(), "Using credential helper");
            return run_helper(helper, host);
        }

        let entry = config
            .auths
            .iter()
            .find(|(key, _)| normalize_registry_key(key) == host)
            .map(|(_, entry)| entry);
        entry.map(|entry| from_auth_entry(host, entry)).transpose()
    }
}

/// Bare hostname of an `auths` key such as `https://index.docker.io/v1/`.
pub fn normalize_registry_key(key: &str) -> &str {
    let key = key
        .strip_prefix("https://")
        .or_else(|| key.strip_prefix("http://"))
        .unwrap_or(key);
    key.split('/').next().unwrap_or(key)
}

fn from_auth_entry(host: &str, entry: &AuthEntry) -> Result<RegistryAuth, CredentialError> {
    let mut auth = RegistryAuth {
        serveraddress: Some(host.to_string()),
        identitytoken: entry.identitytoken.clone().filter(|t| !t.is_empty()),
        ..Default::default()
    };

    match &entry.auth {
        Some(encoded) if !encoded.is_empty() => {
            let decoded = STANDARD
                .decode(encoded.trim())
                .ok()
                .and_then(|bytes| String::from_utf8(bytes).ok())
                .ok_or_else(|| CredentialError::MalformedAuth(host.to_string()))?;
            let (user, password) = decoded
                .split_once(':')
                .ok_or_else(|| CredentialError::MalformedAuth(host.to_string()))?;
            auth.username = Some(user.to_string());
            auth.password = Some(password.to_string());
        }
        _ => {
            auth.username = entry.username.clone();
            auth.password = entry.password.clone();
        }
    }
    Ok(auth)
}

fn run_helper(helper: &str, host: &str) -> Result<Option<RegistryAuth>, CredentialError> {
    let program = format!("docker-credential-{}", helper);
    let spawn_error = |source| CredentialError::HelperSpawn {
        helper: helper.to_string(),
        source,
    };

    let mut child = Command::new(&program)
        .arg("get")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(spawn_error)?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(host.as_bytes()).map_err(spawn_error)?;
    }
    let output = child.wait_with_output().map_err(spawn_error)?;

    if !output.status.success() {
        let message = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if message.contains("credentials not found") {
            return Ok(None);
        }
        return Err(CredentialError::Helper {
            helper: helper.to_string(),
            message,
        });
    }

    let response: HelperResponse =
        serde_json::from_slice(&output.stdout).map_err(|e| CredentialError::Helper {
            helper: helper.to_string(),
            message: e.to_string(),
        })?;
    Ok(Some(from_helper_response(host, response)))
}

fn from_helper_response(host: &str, response: HelperResponse) -> RegistryAuth {
    let mut auth = RegistryAuth {
        serveraddress: Some(host.to_string()),
        ..Default::default()
    };
    if response.username == IDENTITY_TOKEN_USER {
        auth.identitytoken = Some(response.secret);
    } else {
        auth.username = Some(response.username);
        auth.password = Some(response.secret);
    }
    auth
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with(content: &str) -> (TempDir, DockerConfigStore) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, content).unwrap();
        (dir, DockerConfigStore::new(path))
    }

    #[test]
    fn test_missing_config_is_anonymous() {
        let dir = TempDir::new().unwrap();
        let store = DockerConfigStore::new(dir.path().join("config.json"));
        assert_eq!(store.lookup("registry.example.com").unwrap(), None);
    }

    #[test]
    fn test_auth_field_is_decoded() {
        let encoded = STANDARD.encode("alice:s3cret");
        let (_dir, store) = store_with(&format!(
            r#"{{"auths": {{"https://registry.example.com/v1/": {{"auth": "{}"}}}}}}"#,
            encoded
        ));

        let auth = store.lookup("registry.example.com").unwrap().unwrap();
        assert_eq!(auth.username.as_deref(), Some("alice"));
        assert_eq!(auth.password.as_deref(), Some("s3cret"));
        assert_eq!(auth.serveraddress.as_deref(), Some("registry.example.com"));
    }

    #[test]
    fn test_explicit_username_and_identity_token() {
        let (_dir, store) = store_with(
            r#"{"auths": {"ghcr.io": {"username": "bob", "password": "pw", "identitytoken": "tok"}}}"#,
        );
        let auth = store.lookup("ghcr.io").unwrap().unwrap();
        assert_eq!(auth.username.as_deref(), Some("bob"));
        assert_eq!(auth.identitytoken.as_deref(), Some("tok"));
    }

    #[test]
    fn test_unknown_host_is_none() {
        let (_dir, store) = store_with(r#"{"auths": {"ghcr.io": {"username": "bob"}}}"#);
        assert_eq!(store.lookup("quay.io").unwrap(), None);
    }

    #[test]
    fn test_malformed_auth_is_error() {
        let (_dir, store) = store_with(r#"{"auths": {"ghcr.io": {"auth": "bm9jb2xvbg=="}}}"#);
        let err = store.lookup("ghcr.io").unwrap_err();
        assert!(matches!(err, CredentialError::MalformedAuth(_)));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let (_dir, store) = store_with("{not json");
        assert!(matches!(
            store.lookup("ghcr.io").unwrap_err(),
            CredentialError::Parse { .. }
        ));
    }

    #[test]
    fn test_normalize_registry_key() {
        assert_eq!(
            normalize_registry_key("https://index.docker.io/v1/"),
            "index.docker.io"
        );
        assert_eq!(normalize_registry_key("http://localhost:5000"), "localhost:5000");
        assert_eq!(normalize_registry_key("ghcr.io"), "ghcr.io");
    }

    #[test]
    fn test_helper_identity_token() {
        let auth = from_helper_response(
            "ghcr.io",
            HelperResponse {
                username: IDENTITY_TOKEN_USER.to_string(),
                secret: "refresh".to_string(),
            },
        );
        assert_eq!(auth.identitytoken.as_deref(), Some("refresh"));
        assert_eq!(auth.username, None);
    }
}
