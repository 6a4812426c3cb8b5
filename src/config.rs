//! Launcher configuration for the terminal client
//!
//! This is client-side plumbing only - where the daemon socket lives and
//! where logs go. The clipboard app's own settings (history limit, hotkey,
//! theme) are host-owned and travel through the bridge instead.
//!
//! Precedence: CLI flags > environment variables > config file
//! (~/.config/clipray/config.toml) > built-in defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

use crate::cli::Cli;

/// Effective launcher configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Unix socket the host daemon listens on
    pub socket_path: PathBuf,

    /// Directory for rotated log files
    pub log_dir: PathBuf,

    /// tracing env-filter expression
    pub log_filter: String,

    /// Run against the in-process demo host instead of a daemon
    pub demo: bool,
}

/// Config file structure (subset that makes sense to persist)
#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    socket_path: Option<PathBuf>,
    log_dir: Option<PathBuf>,
    log_filter: Option<String>,
}

impl Config {
    /// Config file path: ~/.config/clipray/config.toml
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("clipray").join("config.toml"))
    }

    fn default_socket_path() -> PathBuf {
        dirs::runtime_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("clipray.sock")
    }

    fn default_log_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("clipray")
            .join("logs")
    }

    fn load_file_config() -> Result<FileConfig> {
        let Some(path) = Self::config_path() else {
            return Ok(FileConfig::default());
        };
        match std::fs::read_to_string(&path) {
            Ok(contents) => toml::from_str(&contents)
                .with_context(|| format!("parsing config file {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
            Err(e) => Err(e).with_context(|| format!("reading config file {}", path.display())),
        }
    }

    /// Resolve the effective configuration
    pub fn load(cli: &Cli) -> Result<Self> {
        let file = Self::load_file_config()?;

        let socket_path = cli
            .socket
            .clone()
            .or_else(|| std::env::var("CLIPRAY_SOCKET").ok().map(PathBuf::from))
            .or(file.socket_path)
            .unwrap_or_else(Self::default_socket_path);

        let log_dir = cli
            .log_dir
            .clone()
            .or_else(|| std::env::var("CLIPRAY_LOG_DIR").ok().map(PathBuf::from))
            .or(file.log_dir)
            .unwrap_or_else(Self::default_log_dir);

        let log_filter = std::env::var("CLIPRAY_LOG")
            .ok()
            .or(file.log_filter)
            .unwrap_or_else(|| "info".to_string());

        Ok(Self {
            socket_path,
            log_dir,
            log_filter,
            demo: cli.demo,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_config_parses_partial_toml() {
        let file: FileConfig = toml::from_str("socket_path = \"/tmp/other.sock\"").unwrap();
        assert_eq!(file.socket_path, Some(PathBuf::from("/tmp/other.sock")));
        assert!(file.log_dir.is_none());
        assert!(file.log_filter.is_none());
    }

    #[test]
    fn test_cli_flags_win_over_defaults() {
        let cli = Cli {
            socket: Some(PathBuf::from("/run/test.sock")),
            demo: true,
            log_dir: None,
        };
        let config = Config::load(&cli).unwrap();
        assert_eq!(config.socket_path, PathBuf::from("/run/test.sock"));
        assert!(config.demo);
    }

    #[test]
    fn test_defaults_are_usable_paths() {
        assert!(Config::default_socket_path().ends_with("clipray.sock"));
        assert!(Config::default_log_dir().ends_with("logs"));
    }
}
