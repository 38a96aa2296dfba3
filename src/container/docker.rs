//! Docker engine over the local daemon socket.

use super::credentials::RegistryAuth;
use super::engine::{
    ContainerEngine, ContainerSummary, EngineError, ExitStream, LogStream, PullStream,
};
use super::spec::ContainerRunSpec;
use async_trait::async_trait;
use bollard::Docker;
use bollard::auth::DockerCredentials;
use bollard::container::{
    Config, CreateContainerOptions, ListContainersOptions, LogsOptions, StartContainerOptions,
    StopContainerOptions, WaitContainerOptions,
};
use bollard::errors::Error as DockerError;
use bollard::image::CreateImageOptions;
use bollard::models::{HostConfig, Mount, MountTypeEnum, PortBinding};
use futures::StreamExt;
use std::collections::HashMap;

/// Exit-wait condition: the next time the container stops.
const NEXT_EXIT: &str = "next-exit";

/// [`ContainerEngine`] backed by the local Docker daemon.
#[derive(Clone)]
pub struct DockerEngine {
    docker: Docker,
}

impl DockerEngine {
    /// Connect using `DOCKER_HOST` or the platform default socket.
    pub fn connect() -> Result<Self, EngineError> {
        let docker = Docker::connect_with_local_defaults()?;
        Ok(Self { docker })
    }

    fn create_config(spec: &ContainerRunSpec) -> Config<String> {
        let mounts = spec
            .mounts
            .iter()
            .map(|m| Mount {
                source: Some(m.source.clone()),
                target: Some(m.target.clone()),
                typ: Some(MountTypeEnum::BIND),
                ..Default::default()
            })
            .collect();

        let mut port_bindings: HashMap<String, Option<Vec<PortBinding>>> = HashMap::new();
        for binding in &spec.port_bindings {
            port_bindings
                .entry(binding.container_port.clone())
                .or_insert_with(|| Some(Vec::new()))
                .get_or_insert_with(Vec::new)
                .push(PortBinding {
                    host_ip: Some(binding.host_ip.clone()),
                    host_port: Some(binding.host_port.clone()),
                });
        }
        let exposed_ports: HashMap<String, HashMap<(), ()>> = spec
            .exposed_ports
            .iter()
            .map(|port| (port.clone(), HashMap::new()))
            .collect();

        let non_empty = |items: &Vec<String>| (!items.is_empty()).then(|| items.clone());

        Config {
            image: Some(spec.image.clone()),
            cmd: Some(spec.cmd.clone()),
            env: Some(spec.env.clone()),
            tty: Some(spec.tty),
            attach_stdout: Some(spec.attach_stdout),
            attach_stderr: Some(spec.attach_stderr),
            user: spec.user.clone(),
            exposed_ports: (!exposed_ports.is_empty()).then_some(exposed_ports),
            host_config: Some(HostConfig {
                auto_remove: Some(spec.auto_remove),
                mounts: Some(mounts),
                port_bindings: (!port_bindings.is_empty()).then_some(port_bindings),
                cap_add: non_empty(&spec.cap_add),
                security_opt: non_empty(&spec.security_opt),
                network_mode: spec.network_mode.clone(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}

impl From<RegistryAuth> for DockerCredentials {
    fn from(auth: RegistryAuth) -> Self {
        DockerCredentials {
            username: auth.username,
            password: auth.password,
            auth: auth.auth,
            serveraddress: auth.serveraddress,
            identitytoken: auth.identitytoken,
            ..Default::default()
        }
    }
}

#[async_trait]
impl ContainerEngine for DockerEngine {
    async fn os_type(&self) -> Result<String, EngineError> {
        let info = self.docker.info().await?;
        Ok(info.os_type.unwrap_or_default())
    }

    fn pull_image(&self, image: &str, auth: Option<RegistryAuth>) -> PullStream {
        let options = CreateImageOptions {
            from_image: image.to_string(),
            ..Default::default()
        };
        let stream = self
            .docker
            .create_image(Some(options), None, auth.map(DockerCredentials::from))
            .map(|item| {
                let info = item?;
                match info.error {
                    Some(error) => Err(EngineError::Other(error)),
                    None => Ok(info.status.unwrap_or_default()),
                }
            });
        Box::pin(stream)
    }

    async fn create_container(&self, spec: &ContainerRunSpec) -> Result<String, EngineError> {
        let options = CreateContainerOptions {
            name: spec.name.clone(),
            platform: None,
        };
        let response = self
            .docker
            .create_container(Some(options), Self::create_config(spec))
            .await?;
        Ok(response.id)
    }

    async fn start_container(&self, id: &str) -> Result<(), EngineError> {
        self.docker
            .start_container(id, None::<StartContainerOptions<String>>)
            .await?;
        Ok(())
    }

    async fn list_containers(&self) -> Result<Vec<ContainerSummary>, EngineError> {
        let containers = self
            .docker
            .list_containers(Some(ListContainersOptions::<String> {
                all: false,
                ..Default::default()
            }))
            .await?;
        Ok(containers
            .into_iter()
            .map(|c| ContainerSummary {
                id: c.id.unwrap_or_default(),
                names: c.names.unwrap_or_default(),
            })
            .collect())
    }

    async fn stop_container(&self, id: &str) -> Result<(), EngineError> {
        self.docker
            .stop_container(id, None::<StopContainerOptions>)
            .await?;
        Ok(())
    }

    fn logs(&self, name: &str) -> LogStream {
        let options = LogsOptions::<String> {
            follow: true,
            stdout: true,
            stderr: true,
            timestamps: false,
            ..Default::default()
        };
        let stream = self.docker.logs(name, Some(options)).map(|item| {
            let output = item?;
            Ok(String::from_utf8_lossy(&output.into_bytes()).into_owned())
        });
        Box::pin(stream)
    }

    fn wait(&self, name: &str) -> ExitStream {
        let options = WaitContainerOptions {
            condition: NEXT_EXIT.to_string(),
        };
        let stream = self
            .docker
            .wait_container(name, Some(options))
            .map(|item| match item {
                Ok(response) => Ok(response.status_code),
                // A non-zero exit arrives as an error without a message.
                Err(DockerError::DockerContainerWaitError { error, code }) if error.is_empty() => {
                    Ok(code)
                }
                Err(e) => Err(EngineError::from(e)),
            });
        Box::pin(stream)
    }
}
