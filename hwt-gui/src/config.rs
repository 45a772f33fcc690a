//! Read-only user configuration
//!
//! Plain `key=value` lines in `<config dir>/hwt/config.txt`. Nothing is ever
//! written back; the file is for people who want a different default track,
//! volume or a fixed seed.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use hwt_audio::DEFAULT_VOLUME;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: invalid value for {key}: {value:?}")]
    InvalidValue {
        line: usize,
        key: String,
        value: String,
    },
}

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Track to play when none is given on the command line
    pub audio_path: Option<PathBuf>,
    /// Initial output volume, 0.0 - 1.0
    pub volume: f32,
    /// Show the detector readout on start
    pub debug: bool,
    /// Fixed seed for dust, shake and sparkle jitter
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            audio_path: None,
            volume: DEFAULT_VOLUME,
            debug: false,
            seed: None,
        }
    }
}

impl Config {
    /// Load config from the default location
    ///
    /// Returns default config if the file doesn't exist or can't be parsed.
    pub fn load() -> Self {
        let path = Self::config_path();
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                warn!("Ignoring {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Get the default config file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hwt")
            .join("config.txt")
    }

    /// Parse config from simple key=value format
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();
            let invalid = || ConfigError::InvalidValue {
                line: index + 1,
                key: key.to_string(),
                value: value.to_string(),
            };

            match key {
                "audio_path" => {
                    config.audio_path = (!value.is_empty()).then(|| PathBuf::from(value));
                }
                "volume" => {
                    let volume: f32 = value.parse().map_err(|_| invalid())?;
                    if !volume.is_finite() {
                        return Err(invalid());
                    }
                    config.volume = volume.clamp(0.0, 1.0);
                }
                "debug" => {
                    config.debug = match value {
                        "true" | "on" | "1" => true,
                        "false" | "off" | "0" => false,
                        _ => return Err(invalid()),
                    };
                }
                "seed" => {
                    config.seed = Some(value.parse().map_err(|_| invalid())?);
                }
                _ => {} // Ignore unknown keys
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.volume, DEFAULT_VOLUME);
    }

    #[test]
    fn test_parse_all_keys() {
        let content = "# Boiler room\naudio_path = /music/tank.mp3\nvolume=0.4\ndebug=on\nseed=42\n";
        let config = Config::parse(content).unwrap();
        assert_eq!(config.audio_path, Some(PathBuf::from("/music/tank.mp3")));
        assert_eq!(config.volume, 0.4);
        assert!(config.debug);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_unknown_keys_and_junk_lines_are_ignored() {
        let config = Config::parse("last_scan_folder=/music\nnot a pair\n").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_volume_is_clamped() {
        assert_eq!(Config::parse("volume=3").unwrap().volume, 1.0);
        assert_eq!(Config::parse("volume=-1").unwrap().volume, 0.0);
    }

    #[test]
    fn test_bad_values_report_the_line() {
        match Config::parse("# c\nseed=lots") {
            Err(ConfigError::InvalidValue { line, key, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(key, "seed");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(Config::parse("volume=NaN").is_err());
        assert!(Config::parse("debug=maybe").is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = Config::load_from(Path::new("/definitely/not/here/hwt.txt"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
