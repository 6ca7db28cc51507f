//! User settings (`~/.config/ecx/config.yaml`)

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable pointing at another settings file
pub const SETTINGS_FILE_ENV: &str = "ECX_CONFIG_PATH";

pub const SETTINGS_FILE_NAME: &str = "config.yaml";

/// Defaults for the CLI, overridden by command line flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Named profile passed to the aws CLI
    #[serde(default)]
    pub aws_profile: Option<String>,

    #[serde(default)]
    pub aws_region: Option<String>,

    /// aws executable, `aws` from PATH when unset
    #[serde(default)]
    pub aws_binary: Option<String>,

    /// Never call aws, answer with canned identifiers
    #[serde(default)]
    pub dummy: bool,
}

impl Settings {
    /// Settings file location: `ECX_CONFIG_PATH`, then `~/.config/ecx/config.yaml`
    pub fn path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(SETTINGS_FILE_ENV) {
            return Ok(PathBuf::from(path));
        }
        Ok(crate::get_config_dir()?.join(SETTINGS_FILE_NAME))
    }

    /// Load the user settings, defaults when no file exists
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if !path.is_file() {
            tracing::debug!("No settings file at {}", path.display());
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let settings: Settings =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::InvalidSettings {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(
            &path,
            "aws_profile: staging\naws_region: eu-west-1\ndummy: true\n",
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.aws_profile.as_deref(), Some("staging"));
        assert_eq!(settings.aws_region.as_deref(), Some("eu-west-1"));
        assert_eq!(settings.aws_binary, None);
        assert!(settings.dummy);
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "\n").unwrap();

        assert_eq!(Settings::load_from(&path).unwrap(), Settings::default());
    }

    #[test]
    fn test_invalid_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "dummy: [not, a, bool]\n").unwrap();

        assert!(matches!(
            Settings::load_from(&path),
            Err(ConfigError::InvalidSettings { .. })
        ));
    }

    #[test]
    #[serial]
    fn test_load_missing_file_gives_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("missing.yaml");

        temp_env::with_var(SETTINGS_FILE_ENV, Some(path.as_os_str()), || {
            assert_eq!(Settings::load().unwrap(), Settings::default());
        });
    }

    #[test]
    #[serial]
    fn test_load_from_env_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("ci.yaml");
        fs::write(&path, "aws_binary: /opt/aws/bin/aws\n").unwrap();

        temp_env::with_var(SETTINGS_FILE_ENV, Some(path.as_os_str()), || {
            let settings = Settings::load().unwrap();
            assert_eq!(settings.aws_binary.as_deref(), Some("/opt/aws/bin/aws"));
        });
    }
}
