//! Configuration module
//!
//! Handles CLI configuration: API URL, session file and request timeout.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use digesto_client::{DigestoClient, FileSessionStore};

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Digesto API
    pub api_url: String,

    /// Explicit session file; `None` uses the per-user default
    pub session_file: Option<PathBuf>,

    /// Timeout applied to every request
    pub timeout: Duration,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_url.is_empty() {
            anyhow::bail!("api_url cannot be empty");
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            anyhow::bail!("api_url must start with http:// or https://");
        }

        if self.timeout.is_zero() {
            anyhow::bail!("timeout must be greater than 0");
        }

        Ok(())
    }

    pub fn session_store(&self) -> Result<FileSessionStore> {
        match &self.session_file {
            Some(path) => Ok(FileSessionStore::new(path)),
            None => FileSessionStore::default_location().context("Failed to locate session file"),
        }
    }

    /// Anonymous API client honouring the configured timeout
    pub fn client(&self) -> Result<DigestoClient> {
        let http_client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(DigestoClient::with_client(&self.api_url, http_client))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".to_string(),
            session_file: None,
            timeout: Duration::from_secs(30),
        }
    }
}
