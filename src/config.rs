//! # Configuration Module
//!
//! Optional settings for the engine and the command-line front end, read from
//! a TOML file in the platform-standard configuration directory:
//!
//! - Linux: `~/.config/moodtrail/config.toml`
//! - macOS: `~/Library/Application Support/moodtrail/config.toml`
//! - Windows: `%APPDATA%\moodtrail\config.toml`
//!
//! Every field has a default, and a missing file is not an error.
//!
//! ```toml
//! seed = 42
//! default_emotion = "energetic"
//! journey_length = 8
//! trend_days = 30
//! top_limit = 5
//! ```

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::selection::DEFAULT_EMOTION;

const CONFIG_FILE: &str = "config.toml";

/// Returns the platform-appropriate config file path.
///
/// Unlike a data directory, nothing is created here: the file is optional.
///
/// # Errors
///
/// Fails if the system config directory cannot be determined.
pub fn get_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or_else(|| {
        anyhow::anyhow!(
            "Could not determine system config directory. Pass --config to point at a file explicitly."
        )
    })?;

    Ok(config_dir.join("moodtrail").join(CONFIG_FILE))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fixed seed for reproducible selections. Unset means OS entropy.
    pub seed: Option<u64>,
    /// Emotion assumed for tracks without any emotion scores.
    pub default_emotion: String,
    /// Tracks per journey when `play` is not given `--length`.
    pub journey_length: usize,
    /// Window for emotion trends, in days.
    pub trend_days: u64,
    /// How many artists / correlated emotions to list.
    pub top_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            default_emotion: DEFAULT_EMOTION.to_string(),
            journey_length: 8,
            trend_days: 30,
            top_limit: 5,
        }
    }
}

impl EngineConfig {
    /// Parses a config from TOML text.
    ///
    /// # Errors
    ///
    /// Fails on malformed TOML or mistyped fields.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid moodtrail configuration")
    }

    /// Loads configuration.
    ///
    /// With an explicit `path`, the file must exist and parse. Without one, the
    /// platform default location is tried; a missing or broken default file
    /// falls back to [`EngineConfig::default`] with a logged warning.
    ///
    /// # Errors
    ///
    /// Only when an explicit `path` cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            let config = Self::from_toml(&text)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?;
            info!("Loaded config from {}", path.display());
            return Ok(config);
        }

        let Ok(default_path) = get_config_path() else {
            warn!("No system config directory; using default configuration");
            return Ok(Self::default());
        };
        if !default_path.exists() {
            return Ok(Self::default());
        }

        match fs::read_to_string(&default_path)
            .map_err(anyhow::Error::from)
            .and_then(|text| Self::from_toml(&text))
        {
            Ok(config) => {
                info!("Loaded config from {}", default_path.display());
                Ok(config)
            }
            Err(e) => {
                warn!(
                    "Ignoring {}: {e:#}. Using defaults.",
                    default_path.display()
                );
                Ok(Self::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_path_structure() {
        let path = get_config_path().expect("Should get valid path");

        assert!(path.to_string_lossy().ends_with("config.toml"));
        let parent = path.parent().expect("Should have parent directory");
        assert_eq!(parent.file_name().unwrap(), "moodtrail");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml("seed = 42\ntrend_days = 7\n").unwrap();

        assert_eq!(config.seed, Some(42));
        assert_eq!(config.trend_days, 7);
        assert_eq!(config.default_emotion, "energetic");
        assert_eq!(config.journey_length, 8);
    }

    #[test]
    fn test_mistyped_field_is_rejected() {
        assert!(EngineConfig::from_toml("journey_length = \"long\"").is_err());
    }

    #[test]
    fn test_negative_trend_days_is_rejected() {
        assert!(EngineConfig::from_toml("trend_days = -1").is_err());
        let config = EngineConfig::from_toml("trend_days = 100000000").unwrap();
        assert_eq!(config.trend_days, 100_000_000);
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_emotion = \"calm\"\ntop_limit = 3").unwrap();

        let config = EngineConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.default_emotion, "calm");
        assert_eq!(config.top_limit, 3);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = EngineConfig::load(Some(dir.path().join("absent.toml").as_path()));
        assert!(result.is_err());
    }
}
