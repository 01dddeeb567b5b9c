/*
[INPUT]:  Optional YAML configuration file, LINKFLOW__* environment variables
[OUTPUT]: Parsed client configuration with defaults for every field
[POS]:    Configuration layer - backend location, storage, offline flags
[UPDATE]: When adding new configuration options
*/

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use linkflow_adapter::{ClientConfig, Endpoints};
use serde::{Deserialize, Serialize};

use crate::session::default_session_path;

const ENV_PREFIX: &str = "LINKFLOW";
const ENV_SEPARATOR: &str = "__";

/// Top-level configuration for the linkflow client
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LinkflowConfig {
    /// Backend base URL
    pub base_url: String,
    /// Endpoint paths relative to `base_url`
    pub endpoints: EndpointConfig,
    pub connect_timeout_secs: u64,
    /// Overall request deadline; unset means none
    pub request_timeout_secs: Option<u64>,
    /// Session slot location; unset means the platform data dir
    pub session_path: Option<PathBuf>,
    /// Per-operation offline fallbacks
    pub offline: OfflineConfig,
    /// tracing filter directive, e.g. "info" or "linkflow_workflow=debug"
    pub log_level: String,
}

impl Default for LinkflowConfig {
    fn default() -> Self {
        Self {
            base_url: linkflow_adapter::DEFAULT_BASE_URL.to_string(),
            endpoints: EndpointConfig::default(),
            connect_timeout_secs: 10,
            request_timeout_secs: None,
            session_path: None,
            offline: OfflineConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub login: String,
    pub register: String,
    pub submit_task: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        let endpoints = Endpoints::default();
        Self {
            login: endpoints.login,
            register: endpoints.register,
            submit_task: endpoints.submit_task,
        }
    }
}

impl From<&EndpointConfig> for Endpoints {
    fn from(config: &EndpointConfig) -> Self {
        Endpoints {
            login: config.login.clone(),
            register: config.register.clone(),
            submit_task: config.submit_task.clone(),
        }
    }
}

/// Which operations may substitute a local outcome for an unreachable backend.
///
/// Authentication fallbacks grant dashboard access, so they stay off unless
/// enabled explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct OfflineConfig {
    #[serde(default)]
    pub login: bool,
    #[serde(default)]
    pub register: bool,
    #[serde(default = "default_submit_task_fallback")]
    pub submit_task: bool,
}

impl Default for OfflineConfig {
    fn default() -> Self {
        Self {
            login: false,
            register: false,
            submit_task: default_submit_task_fallback(),
        }
    }
}

fn default_submit_task_fallback() -> bool {
    true
}

impl LinkflowConfig {
    /// Load from an optional YAML file layered under `LINKFLOW__*` env vars
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Yaml)
                    .required(true),
            );
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator(ENV_SEPARATOR)
                .try_parsing(true)
                .source(env),
        );

        builder
            .build()
            .context("read configuration sources")?
            .try_deserialize()
            .context("parse configuration")
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content).context("parse YAML configuration")?;
        Ok(config)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn session_path(&self) -> PathBuf {
        self.session_path
            .clone()
            .unwrap_or_else(default_session_path)
    }
}
