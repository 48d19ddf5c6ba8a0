use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://ticketline.sapo.pt";
pub const DEFAULT_QUERY: &str = "cozinhas do mundo";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Plain,
    Html,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub query: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub format: OutputFormat,
    /// Address handed to the external mail collaborator; unused when printing.
    pub recipient: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            query: DEFAULT_QUERY.to_string(),
            timeout_secs: 20,
            user_agent: "TicketScrape/0.1".to_string(),
            format: OutputFormat::Html,
            recipient: None,
        }
    }
}

impl AppConfig {
    /// Reads the config file at `path`, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config {}", path.display()))?;
        Self::from_json(&contents).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let mut config: AppConfig = serde_json::from_str(contents)?;
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        anyhow::ensure!(!config.base_url.is_empty(), "base_url must not be empty");
        anyhow::ensure!(!config.query.trim().is_empty(), "query must not be empty");
        anyhow::ensure!(config.timeout_secs > 0, "timeout_secs must be positive");
        Ok(config)
    }
}
