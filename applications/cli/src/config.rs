/// CLI configuration
use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file, read when present
pub const DEFAULT_CONFIG_FILE: &str = "harvest.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CliConfig {
    /// Base URL of the identity/document backend
    #[serde(default)]
    pub backend_url: String,

    /// API key appended to account requests
    #[serde(default)]
    pub backend_api_key: Option<String>,

    /// Where the id token is kept between runs
    #[serde(default = "default_session_file")]
    pub session_file: PathBuf,
}

impl CliConfig {
    /// Load configuration from file and environment.
    ///
    /// `path` overrides `harvest.toml`; an explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // HARVEST_BACKEND_URL -> backend_url
        settings = settings.add_source(config::Environment::with_prefix("HARVEST"));

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.backend_url.trim().is_empty() {
            return Err(CliError::Config(
                "Backend URL is required (set HARVEST_BACKEND_URL)".to_string(),
            ));
        }

        if !self.backend_url.starts_with("http://") && !self.backend_url.starts_with("https://") {
            return Err(CliError::Config(format!(
                "Backend URL must start with http:// or https://, got {}",
                self.backend_url
            )));
        }

        Ok(())
    }
}

fn default_session_file() -> PathBuf {
    PathBuf::from(".harvest-session")
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            backend_url: String::new(),
            backend_api_key: None,
            session_file: default_session_file(),
        }
    }
}
