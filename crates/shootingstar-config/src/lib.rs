//! Configuration file handling for shootingstar.
//!
//! The configuration lives in `config.toml` inside the platform config
//! directory. A missing file is not an error: defaults are used instead.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use shootingstar_core::LaunchConfig;
use thiserror::Error;
use tracing::{debug, warn};

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "SHOOTINGSTAR_CONFIG";

const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors raised while reading or writing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine a configuration directory")]
    NoConfigDir,
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid configuration in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Terminal rendering settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Virtual pixels covered by one terminal column.
    pub cell_width: u32,
    /// Virtual pixels covered by one terminal row.
    pub cell_height: u32,
    /// Target delay between two frames, in ms.
    pub frame_interval_ms: u64,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            // 80x24 cells cover 1280x960 px, room for the longest default trail
            cell_width: 16,
            cell_height: 40,
            frame_interval_ms: 16,
        }
    }
}

/// Full application configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Launch loop settings.
    #[serde(flatten)]
    pub launch: LaunchConfig,
    /// Terminal surface settings.
    pub terminal: TerminalConfig,
}

impl Config {
    /// Resolve the configuration file path.
    ///
    /// `SHOOTINGSTAR_CONFIG` wins over the platform config directory.
    pub fn path() -> Result<PathBuf, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }
        ProjectDirs::from("", "", "shootingstar")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load the configuration from its default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load the configuration from `path`, falling back to defaults when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::parse(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a configuration from TOML text.
    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        let config: Self = toml::from_str(contents)?;
        Ok(config.sanitized())
    }

    /// Save the configuration to its default location.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, contents).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Replace terminal settings that would make rendering impossible.
    ///
    /// Star bounds are left untouched: an inverted range is reported when a
    /// star is generated, never swapped.
    fn sanitized(mut self) -> Self {
        let defaults = TerminalConfig::default();
        if self.terminal.cell_width == 0 {
            warn!("cell_width must be positive, using {}", defaults.cell_width);
            self.terminal.cell_width = defaults.cell_width;
        }
        if self.terminal.cell_height == 0 {
            warn!("cell_height must be positive, using {}", defaults.cell_height);
            self.terminal.cell_height = defaults.cell_height;
        }
        if self.terminal.frame_interval_ms == 0 {
            warn!(
                "frame_interval_ms must be positive, using {}",
                defaults.frame_interval_ms
            );
            self.terminal.frame_interval_ms = defaults.frame_interval_ms;
        }
        self
    }
}
