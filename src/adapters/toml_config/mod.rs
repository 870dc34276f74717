// TOML config adapter - Configuration management using TOML files

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{VloopError, VloopResult};

/// Config file picked up from the working directory when none is named
pub const DEFAULT_CONFIG_FILE: &str = "vloop.toml";

/// Environment variables that override file settings
const ENV_FFMPEG: &str = "VLOOP_FFMPEG";
const ENV_FFPROBE: &str = "VLOOP_FFPROBE";
const ENV_LOG_LEVEL: &str = "VLOOP_LOG_LEVEL";
const ENV_QUALITY: &str = "VLOOP_QUALITY";

/// Highest value the engine accepts for `-qscale:v`
const MAX_QUALITY: u8 = 31;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VloopConfig {
    pub engine: EngineSettings,
    pub logging: LoggingSettings,
}

/// External engine settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSettings {
    /// ffmpeg binary; looked up on PATH when unset
    pub ffmpeg: Option<PathBuf>,
    /// ffprobe binary; looked up on PATH when unset
    pub ffprobe: Option<PathBuf>,
    /// `-qscale:v` used by the plain concat path (0 keeps the best quality)
    pub quality: u8,
    /// Replace existing output files instead of failing
    pub overwrite: bool,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl VloopConfig {
    /// Load configuration following precedence: Env > File > Defaults.
    ///
    /// `explicit` must exist when given. Otherwise `vloop.toml` in the working
    /// directory is used if present. CLI overrides are applied by the caller.
    pub fn load(explicit: Option<&Path>) -> VloopResult<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        };

        config.apply_env_from(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    pub fn from_file(path: &Path) -> VloopResult<Self> {
        info!("Loading configuration from: {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| VloopError::Config {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse TOML text
    pub fn from_toml_str(content: &str) -> VloopResult<Self> {
        toml::from_str(content).map_err(|e| VloopError::Config {
            message: format!("failed to parse TOML config: {}", e),
        })
    }

    /// Apply environment overrides read through `lookup`
    pub fn apply_env_from<F>(&mut self, lookup: F) -> VloopResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut overrides = 0;

        if let Some(value) = lookup(ENV_FFMPEG) {
            self.engine.ffmpeg = Some(PathBuf::from(value));
            overrides += 1;
        }
        if let Some(value) = lookup(ENV_FFPROBE) {
            self.engine.ffprobe = Some(PathBuf::from(value));
            overrides += 1;
        }
        if let Some(value) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = value;
            overrides += 1;
        }
        if let Some(value) = lookup(ENV_QUALITY) {
            self.engine.quality = value.trim().parse().map_err(|_| VloopError::Config {
                message: format!("{} must be an integer, got '{}'", ENV_QUALITY, value),
            })?;
            overrides += 1;
        }

        if overrides > 0 {
            debug!("Applied {} environment variable overrides", overrides);
        }
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> VloopResult<()> {
        self.logging
            .level
            .parse::<tracing::Level>()
            .map_err(|_| VloopError::Config {
                message: format!(
                    "invalid log level '{}'. Valid levels: trace, debug, info, warn, error",
                    self.logging.level
                ),
            })?;

        if self.engine.quality > MAX_QUALITY {
            return Err(VloopError::Config {
                message: format!(
                    "quality must be between 0 and {}, got {}",
                    MAX_QUALITY, self.engine.quality
                ),
            });
        }

        Ok(())
    }
}
