//! Configuration loading and management

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::server::versioning::ApiVersion;

/// Network settings for the HTTP listener
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    /// Address to bind, e.g. `127.0.0.1:5000`
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Query-string API versioning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Version assumed when the request does not name one
    pub default_version: String,

    /// Versions the API accepts
    pub supported_versions: Vec<String>,

    /// Query parameter carrying the requested version
    pub version_parameter: String,

    /// Add an `api-supported-versions` header to every response
    pub report_versions: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            default_version: "1.1".to_string(),
            supported_versions: vec!["1.0".to_string(), "1.1".to_string(), "2.0".to_string()],
            version_parameter: "ver".to_string(),
            report_versions: true,
        }
    }
}

/// Storage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Load the sample camp, talks and speakers at startup
    pub seed: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { seed: true }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` takes precedence
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "codecamp=info,tower_http=info".to_string(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the versioning section is self-consistent
    pub fn validate(&self) -> Result<()> {
        let supported = self.supported_versions()?;
        if supported.is_empty() {
            return Err(anyhow!("api.supported_versions must not be empty"));
        }

        let default = self.default_version()?;
        if !supported.contains(&default) {
            return Err(anyhow!(
                "api.default_version {} is not one of the supported versions",
                default
            ));
        }

        if self.api.version_parameter.trim().is_empty() {
            return Err(anyhow!("api.version_parameter must not be empty"));
        }

        Ok(())
    }

    pub fn default_version(&self) -> Result<ApiVersion> {
        Ok(self.api.default_version.parse()?)
    }

    pub fn supported_versions(&self) -> Result<Vec<ApiVersion>> {
        self.api
            .supported_versions
            .iter()
            .map(|v| v.parse().map_err(anyhow::Error::from))
            .collect()
    }
}

/// Shared, reloadable view of the configuration
///
/// Cloning the handle shares the same underlying configuration. Readers get
/// an `Arc` snapshot, so a reload never blocks an in-flight request.
#[derive(Clone)]
pub struct ConfigHandle {
    current: Arc<RwLock<Arc<AppConfig>>>,
    source: Option<PathBuf>,
}

impl ConfigHandle {
    /// Handle over a configuration that has no backing file
    pub fn new(config: AppConfig) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(config))),
            source: None,
        }
    }

    /// Load a configuration file and remember it for later reloads
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let config = AppConfig::from_yaml_file(&path)?;
        Ok(Self {
            current: Arc::new(RwLock::new(Arc::new(config))),
            source: Some(path),
        })
    }

    /// File the configuration is reloaded from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Current configuration snapshot
    pub fn current(&self) -> Arc<AppConfig> {
        match self.current.read() {
            Ok(config) => config.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Re-read the backing file and swap it in
    ///
    /// On failure the previous configuration stays active. Without a backing
    /// file this is a no-op returning the current configuration.
    pub fn reload(&self) -> Result<Arc<AppConfig>> {
        let Some(path) = &self.source else {
            return Ok(self.current());
        };

        let config = Arc::new(AppConfig::from_yaml_file(path)?);
        let mut current = self
            .current
            .write()
            .map_err(|e| anyhow!("Failed to acquire config write lock: {}", e))?;
        *current = config.clone();

        tracing::info!(path = %path.display(), "configuration reloaded");
        Ok(config)
    }
}

impl Default for ConfigHandle {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}
