// TOML config adapter - Optional settings file

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{ReposterError, ReposterResult};

/// Settings file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "reposter.toml";

/// Contents of the settings file. Every field is optional; unset fields fall
/// back to environment variables, flags or built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub search: SearchSection,
    pub clip: ClipSection,
    pub facebook: FacebookSection,
    pub storage: StorageSection,
    pub tools: ToolsSection,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchSection {
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub license: Option<String>,
    pub results_per_term: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClipSection {
    pub min_seconds: Option<u64>,
    pub max_seconds: Option<u64>,
    pub crf: Option<u8>,
    pub preset: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FacebookSection {
    pub page_id: Option<String>,
    pub page_token: Option<String>,
    pub graph_url: Option<String>,
    pub graph_version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageSection {
    pub work_dir: Option<PathBuf>,
    pub state_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsSection {
    pub ytdlp: Option<PathBuf>,
    pub ffmpeg: Option<PathBuf>,
}

impl FileConfig {
    /// Parse settings from TOML text
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load the settings file.
    ///
    /// An explicit path must exist. Without one, `reposter.toml` in the
    /// working directory is used when present, otherwise an empty config.
    pub fn load(explicit: Option<&Path>) -> ReposterResult<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    debug!("No config file found, using environment and defaults");
                    return Ok(Self::default());
                }
                default
            }
        };

        let content = std::fs::read_to_string(&path).map_err(|e| ReposterError::ConfigFile {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml(&content).map_err(|e| ReposterError::ConfigFile {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        info!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }
}
