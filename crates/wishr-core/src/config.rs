use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::WishrError;

/// Which persistence backend holds the wishlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// A single pretty-printed JSON document.
    Json,
    /// An embedded SQLite database.
    Sqlite,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Json => write!(f, "json"),
            StoreBackend::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Top-level wishr configuration, stored at `~/.wishr/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishrConfig {
    /// Persistence backend.
    #[serde(default = "default_backend")]
    pub backend: StoreBackend,

    /// Location of the wishlist document. Defaults to a file in the wishr
    /// home directory named after the backend.
    #[serde(default)]
    pub data_path: Option<PathBuf>,

    /// Links longer than this are shortened when listed.
    #[serde(default = "default_url_display_width")]
    pub url_display_width: usize,
}

fn default_backend() -> StoreBackend {
    StoreBackend::Json
}

fn default_url_display_width() -> usize {
    30
}

impl Default for WishrConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Json,
            data_path: None,
            url_display_width: 30,
        }
    }
}

impl WishrConfig {
    /// Returns the wishr home directory (`$WISHR_HOME` or `~/.wishr/`).
    pub fn home_dir() -> Result<PathBuf, WishrError> {
        if let Some(home) = std::env::var_os("WISHR_HOME") {
            return Ok(PathBuf::from(home));
        }
        let base = dirs::home_dir().ok_or_else(|| WishrError::Config {
            message: "could not determine home directory".into(),
        })?;
        Ok(base.join(".wishr"))
    }

    /// Returns the path to the config file.
    pub fn config_path() -> Result<PathBuf, WishrError> {
        Ok(Self::home_dir()?.join("config.toml"))
    }

    /// Returns the path of the wishlist document for the configured backend.
    pub fn resolved_data_path(&self) -> Result<PathBuf, WishrError> {
        match &self.data_path {
            Some(path) => Ok(path.clone()),
            None => {
                let file = match self.backend {
                    StoreBackend::Json => "wishlist_data.json",
                    StoreBackend::Sqlite => "wishlist.db",
                };
                Ok(Self::home_dir()?.join(file))
            }
        }
    }

    /// Load config from the default location, or return defaults if not found.
    pub fn load() -> Result<Self, WishrError> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, WishrError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| WishrError::Config {
            message: format!("{}: {e}", path.display()),
        })
    }

    /// Save config to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), WishrError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| WishrError::Serialization(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Initialize the wishr home directory with default config.
    pub fn init() -> Result<PathBuf, WishrError> {
        let home = Self::home_dir()?;
        std::fs::create_dir_all(&home)?;

        let config_path = Self::config_path()?;
        if !config_path.exists() {
            Self::default().save_to(&config_path)?;
        }

        Ok(home)
    }
}
