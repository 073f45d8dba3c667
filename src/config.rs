use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Tenant slug used when none is given on the command line
    #[serde(default)]
    pub default_tenant: Option<String>,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_tenant: None,
            api: ApiConfig::default(),
            paths: PathsConfig::default(),
            ui: UiConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the platform configuration service
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout; bounds reads and the combined write
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Name of the environment variable holding the bearer token
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_token_env() -> String {
    "TENANTCTL_API_TOKEN".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
            token_env: default_token_env(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Override for the state directory; platform data dir when unset
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Seconds a notice stays on the status bar before expiring
    #[serde(default = "default_notice_ttl")]
    pub notice_ttl_secs: u64,
}

fn default_tick_rate() -> u64 {
    250
}

fn default_notice_ttl() -> u64 {
    6
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            notice_ttl_secs: default_notice_ttl(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_to_file")]
    pub to_file: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_to_file() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: default_log_to_file(),
        }
    }
}

impl Config {
    /// Path to the user config file in the platform config directory
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("tenantctl").join("config.toml"))
    }

    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Start with embedded defaults so tenantctl works without config files
        let defaults = Config::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        // User config in ~/.config/tenantctl/ (optional)
        if let Some(user_config) = Self::user_config_path() {
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        // Explicit config file (CLI override)
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment variables with TENANTCTL_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("TENANTCTL")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Save config to the user config file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::user_config_path()
            .context("No config directory available on this platform")?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_str =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;
        std::fs::write(&config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }

    /// Root state directory for drafts and logs
    pub fn state_path(&self) -> PathBuf {
        match &self.paths.state {
            Some(path) => PathBuf::from(path),
            None => dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("tenantctl"),
        }
    }

    /// Directory for draft cache files
    pub fn drafts_path(&self) -> PathBuf {
        self.state_path().join("drafts")
    }

    /// Directory for log files
    pub fn logs_path(&self) -> PathBuf {
        self.state_path().join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_complete() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.ui.tick_rate_ms, 250);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_state_path_override() {
        let mut config = Config::default();
        config.paths.state = Some("/tmp/tenantctl-test".to_string());
        assert_eq!(
            config.drafts_path(),
            PathBuf::from("/tmp/tenantctl-test/drafts")
        );
        assert_eq!(config.logs_path(), PathBuf::from("/tmp/tenantctl-test/logs"));
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(back.api.base_url, config.api.base_url);
        assert_eq!(back.ui.notice_ttl_secs, config.ui.notice_ttl_secs);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[api]\nbase_url = \"https://cfg.example.com\"\n")
            .unwrap();
        assert_eq!(config.api.base_url, "https://cfg.example.com");
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.logging.level, "info");
    }
}
