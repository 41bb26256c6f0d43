/// Editor configuration
///
/// Read from `config.json` in the user's config directory:
/// - Linux: ~/.config/pose-editor/config.json
/// - macOS: ~/Library/Application Support/pose-editor/config.json
/// - Windows: %APPDATA%\pose-editor\config.json
///
/// Every key is optional. `POSE_EDITOR_SERVER` overrides `server_url`.
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{EditorError, Result};
use crate::submit::Resize;

pub const SERVER_ENV: &str = "POSE_EDITOR_SERVER";
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the processing endpoint
    pub server_url: String,
    /// Where regenerated pose files are saved
    pub download_dir: Option<PathBuf>,
    /// Resize directive preselected in the form
    pub default_resize: Resize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            download_dir: None,
            default_resize: Resize::None,
        }
    }
}

impl Config {
    /// Load the user config, falling back to defaults on any problem
    pub fn load() -> Self {
        let config = match Self::config_path() {
            Some(path) => Self::from_file(&path).unwrap_or_else(|e| {
                warn!("⚠️  Ignoring config at {}: {}", path.display(), e);
                Self::default()
            }),
            None => Self::default(),
        };
        config.with_server_override(std::env::var(SERVER_ENV).ok())
    }

    /// Get the path where the config file is expected
    pub fn config_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("pose-editor");
        path.push("config.json");
        Some(path)
    }

    /// Parse a config file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        info!("📁 Config loaded from {}", path.display());
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| EditorError::Io(format!("invalid config: {}", e)))
    }

    pub fn with_server_override(mut self, server_url: Option<String>) -> Self {
        if let Some(url) = server_url.filter(|u| !u.trim().is_empty()) {
            self.server_url = url.trim().to_string();
        }
        self
    }

    /// Configured download directory, else the platform one, else the working dir
    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
