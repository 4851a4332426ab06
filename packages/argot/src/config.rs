//! Session configuration.
//!
//! Layered the usual way: built-in defaults, then an optional `argot.toml`
//! in the working directory, then `ARGOT_*` environment variables with `__`
//! separating sections (`ARGOT_ORCHESTRATOR__HOST` overrides
//! `[orchestrator] host`). Later layers win.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "argot.toml";

const ENV_PREFIX: &str = "ARGOT_";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Seconds between reconnect attempts. The session never stops retrying;
    /// this only paces it.
    #[serde(default = "default_reconnect_delay_secs")]
    pub reconnect_delay_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    17444
}

fn default_reconnect_delay_secs() -> u64 {
    5
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            reconnect_delay_secs: default_reconnect_delay_secs(),
        }
    }
}

/// Runtime view of the configuration the session core consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub orchestrator_host: String,
    pub orchestrator_port: u16,
    pub reconnect_delay: Duration,
}

impl SessionConfig {
    /// Load from defaults, `argot.toml` under `dir`, then the environment.
    pub fn load_from(dir: &Path) -> Result<Self> {
        let file: FileConfig = Figment::new()
            .merge(Serialized::defaults(FileConfig::default()))
            .merge(Toml::file(dir.join(CONFIG_FILE)))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("failed to load configuration")?;
        Ok(Self::from_file(&file))
    }

    /// Load from the working directory.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("."))
    }

    pub fn from_file(file: &FileConfig) -> Self {
        Self {
            orchestrator_host: file.orchestrator.host.clone(),
            orchestrator_port: file.orchestrator.port,
            reconnect_delay: Duration::from_secs(file.orchestrator.reconnect_delay_secs),
        }
    }

    /// `host:port` dial string, also used as log context.
    pub fn address(&self) -> String {
        format!("{}:{}", self.orchestrator_host, self.orchestrator_port)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from_file(&FileConfig::default())
    }
}
