use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;
use thiserror::Error;

use crate::poller::DEFAULT_POLL_INTERVAL;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

#[derive(Parser, Debug, Default)]
#[command(name = "hookwatch", about = "Terminal monitor for webhook events")]
pub struct Cli {
    /// Events API root; `/events` is appended
    #[arg(long, env = "HOOKWATCH_BASE_URL")]
    pub base_url: Option<String>,

    /// Delay between polls in milliseconds
    #[arg(long, env = "HOOKWATCH_POLL_INTERVAL_MS")]
    pub poll_interval_ms: Option<u64>,

    /// Per-request timeout in seconds (no timeout when unset)
    #[arg(long, env = "HOOKWATCH_REQUEST_TIMEOUT")]
    pub request_timeout: Option<u64>,

    /// Print plain text lines instead of the terminal UI
    #[arg(long)]
    pub plain: bool,

    /// Config file path (defaults to the user config dir)
    #[arg(long, env = "HOOKWATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log file path
    #[arg(long, env = "HOOKWATCH_LOG_FILE")]
    pub log_file: Option<String>,
}

#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub request_timeout: Option<u64>,
    pub log_file: Option<String>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("poll interval must be greater than zero")]
    ZeroInterval,
}

impl ConfigFile {
    pub fn default_path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join("hookwatch").join("config.toml"))
    }

    /// A missing file is not an error; an unreadable or malformed one is.
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        toml::from_str(&content)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }
}

/// Effective settings after merging flags/env over the config file over
/// built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub poll_interval: Duration,
    pub request_timeout: Option<Duration>,
    pub plain: bool,
    pub log_file: Option<String>,
}

impl Settings {
    pub fn resolve(cli: &Cli, file: Option<ConfigFile>) -> Result<Self, ConfigError> {
        let file = file.unwrap_or_default();

        let poll_interval = cli
            .poll_interval_ms
            .or(file.poll_interval_ms)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_POLL_INTERVAL);
        if poll_interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }

        Ok(Self {
            base_url: cli
                .base_url
                .clone()
                .or(file.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            poll_interval,
            request_timeout: cli
                .request_timeout
                .or(file.request_timeout)
                .map(Duration::from_secs),
            plain: cli.plain,
            log_file: cli.log_file.clone().or(file.log_file),
        })
    }

    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let path = cli.config.clone().or_else(ConfigFile::default_path);
        let file = match path {
            Some(path) => ConfigFile::load(&path)?,
            None => None,
        };
        Self::resolve(cli, file)
    }
}
