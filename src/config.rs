use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: String,

    #[serde(default = "default_listen")]
    pub listen: String,

    pub newsapi_key: Option<String>,

    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_minutes: u64,

    #[serde(default = "default_initial_delay")]
    pub initial_delay_secs: u64,

    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

fn default_db_path() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("targeted-news");
    std::fs::create_dir_all(&data_dir).ok();
    data_dir.join("news.db").to_string_lossy().to_string()
}

fn default_listen() -> String {
    "127.0.0.1:3001".to_string()
}

fn default_refresh_interval() -> u64 {
    10
}

fn default_initial_delay() -> u64 {
    5
}

fn default_fetch_timeout() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            listen: default_listen(),
            newsapi_key: None,
            refresh_interval_minutes: default_refresh_interval(),
            initial_delay_secs: default_initial_delay(),
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("targeted-news")
            .join("config.toml")
    }
}
