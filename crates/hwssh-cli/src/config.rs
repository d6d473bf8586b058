// ABOUTME: Configuration for the hwssh tool
// ABOUTME: Reads ~/.config/hwssh/config.toml; a missing file means defaults

use anyhow::{Context, Result};
use hwssh_core::Curve;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// hwssh configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Curve to derive keys on ("nist256p1" or "ed25519")
    pub curve: Curve,

    /// Key index, for keeping several keys per label
    pub index: u32,
}

impl Config {
    /// Returns the config directory path (~/.config/hwssh)
    ///
    /// Uses `XDG_CONFIG_HOME` if set, otherwise falls back to `~/.config`.
    pub fn config_dir() -> Option<PathBuf> {
        std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|p| p.join("hwssh"))
    }

    /// Returns the path to the config file
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.toml"))
    }

    /// Loads configuration from `path`, or defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Loads configuration from an explicit path or the default location
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from(p),
            None => match Self::default_path() {
                Some(p) => Self::load_from(&p),
                None => Ok(Self::default()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().expect("should create temp dir");
        let config =
            Config::load_from(&temp_dir.path().join("config.toml")).expect("should load");
        assert_eq!(config, Config::default());
        assert_eq!(config.curve, Curve::Nist256p1);
        assert_eq!(config.index, 0);
    }

    #[test]
    fn test_load_full_config() {
        let temp_dir = TempDir::new().expect("should create temp dir");
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "curve = \"ed25519\"\nindex = 3\n").expect("should write file");

        let config = Config::load(Some(&path)).expect("should load");
        assert_eq!(config.curve, Curve::Ed25519);
        assert_eq!(config.index, 3);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let temp_dir = TempDir::new().expect("should create temp dir");
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "index = 7\n").expect("should write file");

        let config = Config::load_from(&path).expect("should load");
        assert_eq!(config.curve, Curve::Nist256p1);
        assert_eq!(config.index, 7);
    }

    #[test]
    fn test_unknown_curve_is_an_error() {
        let temp_dir = TempDir::new().expect("should create temp dir");
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "curve = \"secp256k1\"\n").expect("should write file");

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_config_serializes_curve_names() {
        let config = Config {
            curve: Curve::Ed25519,
            index: 1,
        };
        let content = toml::to_string(&config).expect("should serialize");
        assert!(content.contains("curve = \"ed25519\""));
        let back: Config = toml::from_str(&content).expect("should parse");
        assert_eq!(back, config);
    }

    #[test]
    fn test_default_path_ends_with_config_toml() {
        if let Some(path) = Config::default_path() {
            assert!(path.ends_with("hwssh/config.toml"));
        }
    }
}
