use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub providers: ProviderConfig,

    pub refresh: RefreshConfig,

    pub recommendations: RecommendationConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/trackarr.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 7474,
            cors_allowed_origins: vec![
                "http://localhost:7474".to_string(),
                "http://127.0.0.1:7474".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// TMDB v3 API key. Overridable via the `TMDB_API_KEY` env var; empty
    /// means movie/show search and upcoming refresh are unavailable.
    pub tmdb_api_key: String,

    /// OpenAI API key. Overridable via the `OPENAI_API_KEY` env var; empty
    /// means recommendation endpoints answer 503.
    pub openai_api_key: String,

    pub openai_model: String,

    /// Per-request timeout applied to every upstream call (default: 15)
    pub request_timeout_seconds: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            tmdb_api_key: String::new(),
            openai_api_key: String::new(),
            openai_model: "gpt-4o-mini".to_string(),
            request_timeout_seconds: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Whether the background job refreshing stale upcoming-episode data
    /// runs at all. The request-triggered paths work regardless.
    pub auto_refresh_enabled: bool,

    pub check_interval_minutes: u32,

    pub cron_expression: Option<String>,

    /// Hours after which cached next-episode data counts as stale (default: 24)
    pub staleness_hours: u32,

    /// Shows refreshed concurrently per window (default: 5)
    pub batch_size: usize,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            auto_refresh_enabled: true,
            check_interval_minutes: 60,
            cron_expression: None,
            staleness_hours: 24,
            batch_size: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    /// Cap per media type on library items fed into the recommendation
    /// context, most recently updated first (default: 200)
    pub max_context_items: usize,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            max_context_items: 200,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,

    pub loki_labels: std::collections::HashMap<String, String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        let mut labels = std::collections::HashMap::new();
        labels.insert("app".to_string(), "trackarr".to_string());

        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
            loki_labels: labels,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            server: ServerConfig::default(),
            providers: ProviderConfig::default(),
            refresh: RefreshConfig::default(),
            recommendations: RecommendationConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path).map(Self::apply_env_overrides);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default().apply_env_overrides())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    fn apply_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var("TMDB_API_KEY")
            && !key.is_empty()
        {
            self.providers.tmdb_api_key = key;
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY")
            && !key.is_empty()
        {
            self.providers.openai_api_key = key;
        }
        self
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::default_config_path();
        self.save_to_path(&path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("trackarr").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".trackarr").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.general.database_path.is_empty() {
            anyhow::bail!("Database path cannot be empty");
        }

        if self.refresh.staleness_hours == 0 {
            anyhow::bail!("Refresh staleness threshold must be > 0 hours");
        }

        if self.refresh.batch_size == 0 {
            anyhow::bail!("Refresh batch size must be > 0");
        }

        if self.refresh.auto_refresh_enabled
            && self.refresh.check_interval_minutes == 0
            && self.refresh.cron_expression.is_none()
        {
            anyhow::bail!("Refresh interval must be > 0 or cron expression must be set");
        }

        if self.recommendations.max_context_items == 0 {
            anyhow::bail!("Recommendation context cap must be > 0");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 7474);
        assert_eq!(config.refresh.staleness_hours, 24);
        assert_eq!(config.refresh.batch_size, 5);
        assert_eq!(config.recommendations.max_context_items, 200);
        assert!(config.providers.tmdb_api_key.is_empty());
        config.validate().unwrap();
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[providers]"));
        assert!(toml_str.contains("[refresh]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [refresh]
            staleness_hours = 12
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.refresh.staleness_hours, 12);

        assert_eq!(config.server.port, 7474);
        assert_eq!(config.providers.openai_model, "gpt-4o-mini");
    }

    #[test]
    fn test_validation_rejects_zero_batch_size() {
        let mut config = Config::default();
        config.refresh.batch_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_requires_interval_or_cron() {
        let mut config = Config::default();
        config.refresh.check_interval_minutes = 0;
        config.refresh.cron_expression = None;
        assert!(config.validate().is_err());

        config.refresh.cron_expression = Some("0 0 * * * *".to_string());
        config.validate().unwrap();
    }
}
