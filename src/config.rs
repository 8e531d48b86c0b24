use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::agents::{builtin_agent, RemoteAiAgent, RemoteAiConfig, BUILTIN_AGENT_IDS};
use crate::logging::LogConfig;
use crate::orchestrator::Orchestrator;
use crate::source::FileSource;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application metadata
    pub metadata: ConfigMetadata,

    /// Data locations
    pub settings: AppSettings,

    /// Logging output
    #[serde(default)]
    pub logging: LogConfig,

    /// Which agents take part in an analysis cycle
    #[serde(default)]
    pub agents: AgentSettings,
}

/// Configuration metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Data file locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Data directory path
    pub data_dir: PathBuf,

    /// Daily metrics file, relative to `data_dir` unless absolute
    pub metrics_file: PathBuf,

    /// User profile file, relative to `data_dir` unless absolute
    pub profile_file: Option<PathBuf>,
}

/// Agent registry settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Built-in agent ids, registered in this order
    pub enabled: Vec<String>,

    /// Seed for the fitness coach's session choice; random when unset
    pub rng_seed: Option<u64>,

    /// Remote recommendation service, registered after the built-ins
    pub remote: Option<RemoteAiConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now();

        AppConfig {
            metadata: ConfigMetadata {
                version: "1.0".to_string(),
                created_at: now,
                updated_at: now,
            },
            settings: AppSettings::default(),
            logging: LogConfig::default(),
            agents: AgentSettings::default(),
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            data_dir: PathBuf::from("./data"),
            metrics_file: PathBuf::from("metrics.json"),
            profile_file: Some(PathBuf::from("profile.json")),
        }
    }
}

impl Default for AgentSettings {
    fn default() -> Self {
        AgentSettings {
            enabled: BUILTIN_AGENT_IDS.iter().map(|id| id.to_string()).collect(),
            rng_seed: None,
            remote: None,
        }
    }
}

impl AppSettings {
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }

    /// Absolute or data-dir relative metrics path
    pub fn metrics_path(&self) -> PathBuf {
        self.resolve(&self.metrics_file)
    }

    pub fn profile_path(&self) -> Option<PathBuf> {
        self.profile_file.as_deref().map(|p| self.resolve(p))
    }
}

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".vitalrs")
            .join("config.toml")
    }

    /// Load configuration with fallback to defaults
    pub fn load_or_default() -> Self {
        let path = Self::default_config_path();
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from_file(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "invalid config, using defaults");
                Self::default()
            }
        }
    }

    /// Save to the default location
    pub fn save_default(&mut self) -> Result<PathBuf> {
        let path = Self::default_config_path();
        self.save_to_file(&path)?;
        Ok(path)
    }

    /// File source for the configured data, with optional overrides.
    ///
    /// An explicit profile path is always used, so a missing file surfaces
    /// as an error. The configured profile is skipped when it does not exist.
    pub fn file_source(&self, metrics: Option<&Path>, profile: Option<&Path>) -> FileSource {
        let metrics_path = metrics
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.settings.metrics_path());
        let source = FileSource::new(metrics_path);

        match (profile, self.settings.profile_path()) {
            (Some(explicit), _) => source.with_profile(explicit),
            (None, Some(configured)) if configured.exists() => source.with_profile(configured),
            _ => source,
        }
    }

    /// Build an orchestrator with the configured agents.
    ///
    /// Unknown agent ids are skipped with a warning.
    pub fn build_orchestrator(&self) -> Result<Orchestrator> {
        let mut orchestrator = Orchestrator::new();

        for id in &self.agents.enabled {
            match builtin_agent(id, self.agents.rng_seed) {
                Some(agent) => {
                    orchestrator.register_agent(agent);
                }
                None => tracing::warn!(agent = %id, "unknown agent in configuration, skipping"),
            }
        }

        if let Some(remote) = &self.agents.remote {
            let agent = RemoteAiAgent::new(remote.clone())
                .with_context(|| "Failed to configure remote AI agent")?;
            orchestrator.register_agent(Box::new(agent));
        }

        Ok(orchestrator)
    }
}
