// Client-side crew configuration file

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// File name of the client config inside the crew directory
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Config file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed config at {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Server address and API key captured by the setup wizard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewConfig {
    #[serde(default)]
    pub server_url: String,
    #[serde(default)]
    pub server_api_key: String,
}

impl CrewConfig {
    /// Path of the config file inside `crew_dir`
    pub fn path_in(crew_dir: &Path) -> PathBuf {
        crew_dir.join(CONFIG_FILE_NAME)
    }

    /// Read the config file
    ///
    /// A missing file is not an error: it means the wizard has not run yet.
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = ?path, "No existing config found");
                return Ok(None);
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Write the config file, creating its directory if needed
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// True once both the server URL and API key are set
    pub fn is_complete(&self) -> bool {
        !self.server_url.is_empty() && !self.server_api_key.is_empty()
    }
}
