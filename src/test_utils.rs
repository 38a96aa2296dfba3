#[cfg(test)]
pub mod fixtures {
    use crate::config::ProjectConfig;
    use crate::context::{ContextInputs, ScanContext, compute};
    use crate::env::MapEnv;
    use crate::product::ProductTable;
    use std::path::Path;

    /// Inputs for a container run of `image` on `<dir>/project`.
    pub fn inputs(dir: &Path, image: &str) -> ContextInputs {
        ContextInputs {
            project_dir: dir.join("project"),
            linter: Some(image.to_string()),
            cache_dir: Some(dir.join("system/linter/cache")),
            ..Default::default()
        }
    }

    pub fn context_from_env(inputs: ContextInputs, env: &MapEnv) -> ScanContext {
        compute(inputs, &ProjectConfig::default(), &ProductTable::current(), env)
            .expect("test context should resolve")
    }

    pub fn context_from(inputs: ContextInputs) -> ScanContext {
        context_from_env(inputs, &MapEnv::new())
    }

    pub fn container_context(dir: &Path, image: &str) -> ScanContext {
        context_from(inputs(dir, image))
    }
}

#[cfg(test)]
pub mod fake_engine {
    use crate::container::{
        ContainerEngine, ContainerRunSpec, ContainerSummary, EngineError, ExitStream, LogStream,
        PullStream, RegistryAuth,
    };
    use async_trait::async_trait;
    use futures::stream;
    use std::sync::Mutex;

    /// In-memory engine that records every call.
    pub struct FakeEngine {
        calls: Mutex<Vec<String>>,
        os_type: String,
        anonymous_pull_error: Option<String>,
        authenticated_pull_error: Option<String>,
        pull_stream_error: Option<String>,
        containers: Vec<ContainerSummary>,
        create_error: Option<String>,
        exit: Option<Result<i64, String>>,
        logs: Vec<String>,
        log_error: Option<String>,
    }

    impl FakeEngine {
        pub fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                os_type: "linux".to_string(),
                anonymous_pull_error: None,
                authenticated_pull_error: None,
                pull_stream_error: None,
                containers: Vec::new(),
                create_error: None,
                exit: Some(Ok(0)),
                logs: Vec::new(),
                log_error: None,
            }
        }

        pub fn with_os_type(mut self, os_type: &str) -> Self {
            self.os_type = os_type.to_string();
            self
        }

        pub fn with_anonymous_pull_error(mut self, message: &str) -> Self {
            self.anonymous_pull_error = Some(message.to_string());
            self
        }

        pub fn with_authenticated_pull_error(mut self, message: &str) -> Self {
            self.authenticated_pull_error = Some(message.to_string());
            self
        }

        /// Fail after the first progress message of the pull.
        pub fn with_pull_stream_error(mut self, message: &str) -> Self {
            self.pull_stream_error = Some(message.to_string());
            self
        }

        pub fn with_containers(mut self, containers: Vec<ContainerSummary>) -> Self {
            self.containers = containers;
            self
        }

        pub fn with_create_error(mut self, message: &str) -> Self {
            self.create_error = Some(message.to_string());
            self
        }

        pub fn with_exit_code(mut self, code: i64) -> Self {
            self.exit = Some(Ok(code));
            self
        }

        pub fn with_wait_error(mut self, message: &str) -> Self {
            self.exit = Some(Err(message.to_string()));
            self
        }

        /// The wait stream ends without reporting an exit.
        pub fn without_exit(mut self) -> Self {
            self.exit = None;
            self
        }

        pub fn with_logs(mut self, chunks: Vec<&str>) -> Self {
            self.logs = chunks.into_iter().map(str::to_string).collect();
            self
        }

        pub fn with_log_error(mut self, message: &str) -> Self {
            self.log_error = Some(message.to_string());
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl Default for FakeEngine {
        fn default() -> Self {
            Self::new()
        }
    }

    fn other(message: &str) -> EngineError {
        EngineError::Other(message.to_string())
    }

    #[async_trait]
    impl ContainerEngine for FakeEngine {
        async fn os_type(&self) -> Result<String, EngineError> {
            self.record("os_type".to_string());
            Ok(self.os_type.clone())
        }

        fn pull_image(&self, image: &str, auth: Option<RegistryAuth>) -> PullStream {
            let mode = if auth.is_some() { "authenticated" } else { "anonymous" };
            self.record(format!("pull {} {}", image, mode));

            let rejection = match auth {
                Some(_) => &self.authenticated_pull_error,
                None => &self.anonymous_pull_error,
            };
            let items = match (rejection, &self.pull_stream_error) {
                (Some(message), _) => vec![Err(other(message))],
                (None, Some(message)) => {
                    vec![Ok("Pulling fs layer".to_string()), Err(other(message))]
                }
                (None, None) => vec![
                    Ok("Pulling from lintctl".to_string()),
                    Ok("Download complete".to_string()),
                ],
            };
            Box::pin(stream::iter(items))
        }

        async fn create_container(&self, spec: &ContainerRunSpec) -> Result<String, EngineError> {
            self.record(format!("create {}", spec.name));
            match &self.create_error {
                Some(message) => Err(other(message)),
                None => Ok(format!("{}-id", spec.name)),
            }
        }

        async fn start_container(&self, id: &str) -> Result<(), EngineError> {
            self.record(format!("start {}", id));
            Ok(())
        }

        async fn list_containers(&self) -> Result<Vec<ContainerSummary>, EngineError> {
            self.record("list".to_string());
            Ok(self.containers.clone())
        }

        async fn stop_container(&self, id: &str) -> Result<(), EngineError> {
            self.record(format!("stop {}", id));
            Ok(())
        }

        fn logs(&self, name: &str) -> LogStream {
            self.record(format!("logs {}", name));
            let mut items: Vec<Result<String, EngineError>> =
                self.logs.iter().cloned().map(Ok).collect();
            if let Some(message) = &self.log_error {
                items.push(Err(other(message)));
            }
            Box::pin(stream::iter(items))
        }

        fn wait(&self, name: &str) -> ExitStream {
            self.record(format!("wait {}", name));
            let items = match &self.exit {
                Some(Ok(code)) => vec![Ok(*code)],
                Some(Err(message)) => vec![Err(other(message))],
                None => Vec::new(),
            };
            Box::pin(stream::iter(items))
        }
    }
}
