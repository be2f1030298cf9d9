//! Configuration file handling for adb-toolbox.
//!
//! Loads configuration from `~/.config/adb-toolbox/config.toml` or a custom path.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::bridge::DEFAULT_EXECUTABLE;

/// Configuration file structure for adb-toolbox.
/// Loaded from ~/.config/adb-toolbox/config.toml (or custom path via --config).
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub bridge: BridgeConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Deserialize)]
pub struct BridgeConfig {
    /// Executable name or path
    #[serde(default = "default_executable")]
    pub executable: String,
    /// Directory searched before PATH
    #[serde(default)]
    pub tools_dir: Option<PathBuf>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            executable: default_executable(),
            tools_dir: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UiConfig {
    /// Wait for Enter before the program exits
    #[serde(default = "default_pause_on_exit")]
    pub pause_on_exit: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            pause_on_exit: default_pause_on_exit(),
        }
    }
}

fn default_executable() -> String {
    DEFAULT_EXECUTABLE.to_string()
}

/// A console opened by double-clicking closes as soon as the program exits.
fn default_pause_on_exit() -> bool {
    cfg!(windows)
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.clone(),
                source: e,
            })?;
            log::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Directories searched for the bridge executable before PATH.
    ///
    /// The configured `tools_dir` wins; otherwise a `tools` directory next to
    /// the running binary is used when present.
    pub fn tool_dirs(&self) -> Vec<PathBuf> {
        if let Some(dir) = &self.bridge.tools_dir {
            return vec![dir.clone()];
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join("tools")))
            .filter(|dir| dir.is_dir())
            .into_iter()
            .collect()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{}': {source}", .path.display())]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("adb-toolbox").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/adb-toolbox/config.toml")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(config.bridge.executable, "adb");
        assert!(config.bridge.tools_dir.is_none());
        assert_eq!(config.ui.pause_on_exit, cfg!(windows));
    }

    #[test]
    fn test_load_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[bridge]\nexecutable = \"/opt/platform-tools/adb\"\ntools_dir = \"/opt/tools\"\n\n[ui]\npause_on_exit = true"
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.bridge.executable, "/opt/platform-tools/adb");
        assert_eq!(config.bridge.tools_dir, Some(PathBuf::from("/opt/tools")));
        assert!(config.ui.pause_on_exit);
        assert_eq!(config.tool_dirs(), vec![PathBuf::from("/opt/tools")]);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ui]\npause_on_exit = false").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.bridge.executable, "adb");
        assert!(!config.ui.pause_on_exit);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[bridge\nexecutable = ").unwrap();

        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_default_path_ends_with_app_dir() {
        let path = default_path();
        assert!(path.ends_with("adb-toolbox/config.toml"));
    }
}
