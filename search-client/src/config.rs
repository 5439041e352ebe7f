use crate::error::ClientError;
use crate::error::Result;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const CONFIG_FILENAME: &str = "config.toml";
pub const HOME_ENV: &str = "CODESEARCH_HOME";
pub const URL_ENV: &str = "CODESEARCH_URL";
pub const CODEBASE_ENV: &str = "CODESEARCH_CODEBASE";

/// Configuration for talking to the code search backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// Root URL of the backend; endpoints are resolved relative to it
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Codebase root sent with every file fetch
    #[serde(default)]
    pub codebase_path: Option<String>,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Directory holding generated artifacts (structures, embeddings)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_embedding_poll_ms")]
    pub embedding_poll_ms: u64,

    #[serde(default = "default_structure_poll_ms")]
    pub structure_poll_ms: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000/".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_embedding_poll_ms() -> u64 {
    500
}

fn default_structure_poll_ms() -> u64 {
    1000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            codebase_path: None,
            timeout_secs: default_timeout_secs(),
            data_dir: default_data_dir(),
            embedding_poll_ms: default_embedding_poll_ms(),
            structure_poll_ms: default_structure_poll_ms(),
        }
    }
}

impl ClientConfig {
    /// Load from `path`, or from `$CODESEARCH_HOME/config.toml` when it
    /// exists, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(candidate) if candidate.is_file() => Self::from_file(&candidate)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            ClientError::Config(format!("failed to read {}: {err}", path.display()))
        })?;
        Ok(toml::from_str(&raw)?)
    }

    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(URL_ENV).filter(|value| !value.trim().is_empty()) {
            self.base_url = url;
        }
        if let Some(path) = lookup(CODEBASE_ENV).filter(|value| !value.trim().is_empty()) {
            self.codebase_path = Some(path);
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.base_url()?;
        if self.timeout_secs == 0 {
            return Err(ClientError::Config("timeout_secs must be > 0".to_string()));
        }
        if self.embedding_poll_ms == 0 || self.structure_poll_ms == 0 {
            return Err(ClientError::Config(
                "poll intervals must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Base URL with a trailing slash so relative endpoints join beneath it.
    pub fn base_url(&self) -> Result<Url> {
        let mut raw = self.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Ok(Url::parse(&raw)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn embedding_poll_interval(&self) -> Duration {
        Duration::from_millis(self.embedding_poll_ms)
    }

    pub fn structure_poll_interval(&self) -> Duration {
        Duration::from_millis(self.structure_poll_ms)
    }

    pub fn structures_path(&self) -> PathBuf {
        self.data_dir.join("structures.json")
    }
}

pub fn codesearch_home() -> Option<PathBuf> {
    if let Some(value) = std::env::var_os(HOME_ENV) {
        return Some(PathBuf::from(value));
    }
    dirs::home_dir().map(|home| home.join(".codesearch"))
}

fn default_config_path() -> Option<PathBuf> {
    codesearch_home().map(|home| home.join(CONFIG_FILENAME))
}
