/*
[INPUT]:  YAML configuration file
[OUTPUT]: Parsed poller configuration
[POS]:    Configuration layer - research request setup
[UPDATE]: When adding new configuration options
*/

use std::time::Duration;

use anyhow::{Context, bail};
use fragrance_research_adapter::StartResearchRequest;
use fragrance_research_adapter::http::client::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::poller::{DEFAULT_POLL_INTERVAL, PollerOptions};

/// Top-level configuration for one research run
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PollerConfig {
    /// Base URL of the task proxy
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Milliseconds between status polls
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Fragrance notes to research
    #[serde(default)]
    pub notes: Vec<String>,
    /// Free-text preferences
    #[serde(default)]
    pub preferences: String,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            poll_interval_ms: default_poll_interval_ms(),
            notes: Vec::new(),
            preferences: String::new(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

impl PollerConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {path}"))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config file {path}"))?;
        Ok(config)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn options(&self) -> PollerOptions {
        PollerOptions {
            poll_interval: self.poll_interval(),
        }
    }

    /// Check everything a run needs before touching the network.
    pub fn validate(&self) -> anyhow::Result<StartResearchRequest> {
        Url::parse(&self.api_url).with_context(|| format!("invalid api_url {}", self.api_url))?;
        if self.poll_interval_ms == 0 {
            bail!("poll_interval_ms must be greater than zero");
        }
        let request = StartResearchRequest::new(self.notes.clone(), self.preferences.clone())?;
        Ok(request)
    }
}
