use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Which backing store holds the shared schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StorageBackend {
    #[default]
    Remote, // spreadsheet macro endpoint
    Local,  // JSON document in the platform data dir
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_url: String,
    #[serde(default)]
    pub storage: StorageBackend,
    #[serde(default = "default_agents")]
    pub agents: Vec<String>,
    // remembered identity, so returning users skip the name pick
    #[serde(default)]
    pub selected_agent: Option<String>,
    #[serde(default = "default_font_scale")]
    pub font_scale: f32,
}

fn default_font_scale() -> f32 {
    1.0
}

fn default_agents() -> Vec<String> {
    vec![
        "Dyrine".to_string(),
        "Janrey".to_string(),
        "Jang".to_string(),
        "Marimar".to_string(),
        "Ria".to_string(),
        "Ralph".to_string(),
        "Paul".to_string(),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            storage: StorageBackend::Remote,
            agents: default_agents(),
            selected_agent: None,
            font_scale: 1.0,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents =
                fs::read_to_string(&config_path).context("Failed to read config file")?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        // Ensure directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    /// The local backend needs no endpoint; the remote one does.
    pub fn is_configured(&self) -> bool {
        match self.storage {
            StorageBackend::Local => true,
            StorageBackend::Remote => !self.api_url.trim().is_empty(),
        }
    }

    fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "shiftgrid", "shiftgrid")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    /// Endpoint URL as pasted by the user, minus stray whitespace and
    /// trailing slashes.
    pub fn endpoint_url(&self) -> String {
        self.api_url.trim().trim_end_matches('/').to_string()
    }
}
