use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::domain::{MAX_YEAR, MIN_YEAR, YearRange};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub seed: SeedConfig,

    pub window: WindowConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    pub log_format: LogFormat,

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
            database_path: "sqlite:data/salesboard.db".to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,

    pub port: u16,

    /// Origins allowed to call the API from a browser. `"*"` allows any.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

/// How a seed run treats records whose `id` is already stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedMode {
    /// Plain insert; an existing `id` fails the run.
    #[default]
    Append,
    /// Insert or overwrite by `id`, so repeated runs converge.
    Upsert,
}

impl std::fmt::Display for SeedMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Append => write!(f, "append"),
            Self::Upsert => write!(f, "upsert"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// JSON feed the seed loader imports from.
    pub feed_url: String,

    /// Request timeout in seconds (default: 30)
    pub request_timeout_seconds: u64,

    pub mode: SeedMode,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            feed_url: "http://localhost:8000/product_transaction.json".to_string(),
            request_timeout_seconds: 30,
            mode: SeedMode::Append,
        }
    }
}

/// Years a month query spans when no explicit year is given.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub start_year: i32,

    pub end_year: i32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            start_year: 2020,
            end_year: 2022,
        }
    }
}

impl WindowConfig {
    #[must_use]
    pub const fn years(&self) -> YearRange {
        YearRange::new(self.start_year, self.end_year)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            server: ServerConfig::default(),
            seed: SeedConfig::default(),
            window: WindowConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Config {
    /// Loads the first config file found (or defaults), then applies
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;
        config.apply_env_overrides_with(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Overrides from `DB_URL`, `THIRD_PARTY_API_URL`, `PORT` and `LOG_LEVEL`.
    pub fn apply_env_overrides_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("DB_URL").filter(|v| !v.is_empty()) {
            self.general.database_path = url;
        }

        if let Some(url) = lookup("THIRD_PARTY_API_URL").filter(|v| !v.is_empty()) {
            self.seed.feed_url = url;
        }

        if let Some(port) = lookup("PORT").and_then(|v| v.parse().ok()) {
            self.server.port = port;
        }

        if let Some(level) = lookup("LOG_LEVEL").filter(|v| !v.is_empty()) {
            self.general.log_level = level;
        }
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
            paths.push(config_dir.join("salesboard").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".salesboard").join("config.toml"));
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
        if self.general.database_path.trim().is_empty() {
            anyhow::bail!("Database path cannot be empty");
        }

        if self.server.port == 0 {
            anyhow::bail!("Server port must be > 0");
        }

        let feed = url::Url::parse(&self.seed.feed_url)
            .with_context(|| format!("Invalid seed feed URL: {}", self.seed.feed_url))?;
        if !matches!(feed.scheme(), "http" | "https") {
            anyhow::bail!("Seed feed URL must use http or https");
        }

        let years = self.window.years();
        if years.is_empty() {
            anyhow::bail!(
                "Window start year {} is after end year {}",
                years.start,
                years.end
            );
        }
        if years.start < MIN_YEAR || years.end > MAX_YEAR {
            anyhow::bail!("Window years must be within {MIN_YEAR}-{MAX_YEAR}");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.seed.mode, SeedMode::Append);
        assert_eq!(config.window.years(), YearRange::new(2020, 2022));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[seed]"));
        assert!(toml_str.contains("[window]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"
            log_format = "json"

            [seed]
            mode = "upsert"

            [window]
            start_year = 2021
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.general.log_format, LogFormat::Json);
        assert_eq!(config.seed.mode, SeedMode::Upsert);
        assert_eq!(config.window.start_year, 2021);
        assert_eq!(config.window.end_year, 2022);
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("DB_URL", "sqlite:/tmp/other.db"),
            ("THIRD_PARTY_API_URL", "http://localhost:9000/feed.json"),
            ("PORT", "8080"),
            ("LOG_LEVEL", ""),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env_overrides_with(|key| env.get(key).map(|v| (*v).to_string()));

        assert_eq!(config.general.database_path, "sqlite:/tmp/other.db");
        assert_eq!(config.seed.feed_url, "http://localhost:9000/feed.json");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.window.start_year = 2023;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.seed.feed_url = "ftp://example.test/feed".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.seed.feed_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.general.database_path = " ".to_string();
        assert!(config.validate().is_err());
    }
}
