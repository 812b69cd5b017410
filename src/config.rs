use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::locator::ToolLocator;
use crate::process::DEFAULT_TIMEOUT;
use crate::sigrok::DEFAULT_INPUT_FORMAT;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sigrok: SigrokConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SigrokConfig {
    /// Checked after the built-in install locations
    pub extra_locations: Vec<PathBuf>,
    pub timeout_secs: u64,
    pub input_format: String,
}

impl Default for SigrokConfig {
    fn default() -> Self {
        Self {
            extra_locations: Vec::new(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            input_format: DEFAULT_INPUT_FORMAT.to_string(),
        }
    }
}

impl SigrokConfig {
    /// Configured invocation timeout; zero falls back to the default
    pub fn timeout(&self) -> Duration {
        if self.timeout_secs == 0 {
            log::warn!("sigrok.timeout_secs is 0, using {:?}", DEFAULT_TIMEOUT);
            return DEFAULT_TIMEOUT;
        }
        Duration::from_secs(self.timeout_secs)
    }

    /// Default locator with the configured extra locations appended
    pub fn locator(&self) -> ToolLocator {
        ToolLocator::default().extra_candidates(self.extra_locations.iter().cloned())
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        if let Some(config_dir) = dirs::config_dir() {
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::COMMON_LOCATIONS;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.sigrok.extra_locations.is_empty());
        assert_eq!(config.sigrok.timeout(), Duration::from_secs(10));
        assert_eq!(config.sigrok.input_format, "vcd");
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sigrok-dev.yml");
        fs::write(
            &path,
            "sigrok:\n  extra_locations:\n    - /custom/bin/sigrok-cli\n  timeout_secs: 30\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.sigrok.extra_locations, vec![PathBuf::from("/custom/bin/sigrok-cli")]);
        assert_eq!(config.sigrok.timeout_secs, 30);
        // Missing keys fall back to defaults
        assert_eq!(config.sigrok.input_format, "vcd");
    }

    #[test]
    fn test_zero_timeout_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sigrok-dev.yml");
        fs::write(&path, "sigrok:\n  timeout_secs: 0\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.sigrok.timeout_secs, 0);
        assert_eq!(config.sigrok.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_load_empty_mapping() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sigrok-dev.yml");
        fs::write(&path, "{}\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.sigrok.timeout_secs, 10);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_load_invalid_yaml_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.yml");
        fs::write(&path, "sigrok: [unclosed\n").unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_locator_appends_extra_locations() {
        let config = SigrokConfig {
            extra_locations: vec![PathBuf::from("/custom/sigrok-cli")],
            ..Default::default()
        };
        let locator = config.locator();
        let candidates = locator.get_candidates();
        assert_eq!(candidates.len(), COMMON_LOCATIONS.len() + 1);
        assert_eq!(candidates[0], PathBuf::from(COMMON_LOCATIONS[0]));
        assert_eq!(candidates.last(), Some(&PathBuf::from("/custom/sigrok-cli")));
    }
}
