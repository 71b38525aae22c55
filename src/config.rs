use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::gemini;

pub const DEFAULT_PORT: u16 = 8787;

/// Runtime configuration: where studio state lives plus the upstream model
/// credentials. Persisted as `config.json` inside the data directory; the
/// API key falls back to the environment when the file carries none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip)]
    pub data_dir: PathBuf,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Config {
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("contentjet")
        });

        std::fs::create_dir_all(&data_dir).context("Failed to create data directory")?;

        let config_path = data_dir.join("config.json");
        if config_path.exists() {
            let raw = std::fs::read_to_string(&config_path).context("Failed to read config.json")?;
            match serde_json::from_str::<Config>(&raw) {
                Ok(mut config) => {
                    config.data_dir = data_dir;
                    if config.api_key.as_ref().map_or(true, |key| key.is_empty()) {
                        config.api_key = std::env::var("GEMINI_API_KEY").ok();
                    }
                    return Ok(config);
                }
                Err(e) => {
                    log::warn!("Failed to parse config.json, recreating defaults: {}", e);
                }
            }
        }

        let config = Config {
            data_dir,
            model: gemini::DEFAULT_MODEL.to_string(),
            api_key: std::env::var("GEMINI_API_KEY").ok(),
        };
        config.save()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = self.data_dir.join("config.json");
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, json).context("Failed to write config.json")?;
        Ok(())
    }
}
