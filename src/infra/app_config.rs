use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_DATABASE_NAME: &str = "spendbook.sqlite";
const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Explicit store location. Takes precedence over `database_name`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
    /// File name of the store inside the data directory.
    pub database_name: String,
    /// Number of log entries shown by default.
    pub default_page_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

const DB_PATH_VAR: &str = "SPENDBOOK_DB_PATH";
const CONFIG_PATH_VAR: &str = "SPENDBOOK_CONFIG_PATH";
const DATA_HOME_VAR: &str = "SPENDBOOK_DATA_HOME";

impl AppConfig {
    /// Read the config at `path`. A missing or malformed file yields defaults.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => parse_config(&contents),
            Err(err) => {
                log::debug!("No config at {}: {}", path.display(), err);
                Self::default()
            }
        }
    }

    /// Write the config to `path` as TOML, creating missing directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

pub fn load_config() -> AppConfig {
    AppConfig::load_from(&config_path())
}

pub fn save_config(config: &AppConfig) -> Result<()> {
    config.save_to(&config_path())
}

fn parse_config(contents: &str) -> AppConfig {
    match toml::from_str(contents) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("Ignoring malformed config: {}", err);
            AppConfig::default()
        }
    }
}

/// Resolve the store location: `SPENDBOOK_DB_PATH`, then the configured
/// path, then `<data dir>/<database_name>`.
pub fn database_path(config: &AppConfig) -> PathBuf {
    env_path(DB_PATH_VAR).unwrap_or_else(|| resolve_database_path(config, app_data_dir()))
}

fn resolve_database_path(config: &AppConfig, data_dir: PathBuf) -> PathBuf {
    match &config.db_path {
        Some(path) => path.clone(),
        None => data_dir.join(&config.database_name),
    }
}

fn config_path() -> PathBuf {
    env_path(CONFIG_PATH_VAR).unwrap_or_else(|| app_data_dir().join("config.toml"))
}

fn env_path(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Directory holding the config file and, by default, the store.
pub fn app_data_dir() -> PathBuf {
    env_path(DATA_HOME_VAR)
        .or_else(platform_data_dir)
        .unwrap_or_else(|| {
            std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(".spendbook")
        })
}

#[cfg(target_os = "macos")]
fn platform_data_dir() -> Option<PathBuf> {
    home::home_dir().map(|home| {
        home.join("Library")
            .join("Application Support")
            .join("Spendbook")
    })
}

#[cfg(target_os = "windows")]
fn platform_data_dir() -> Option<PathBuf> {
    std::env::var_os("APPDATA").map(|appdata| PathBuf::from(appdata).join("Spendbook"))
}

#[cfg(target_os = "linux")]
fn platform_data_dir() -> Option<PathBuf> {
    std::env::var_os("XDG_DATA_HOME")
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|home| home.join(".local").join("share")))
        .map(|base| base.join("spendbook"))
}

#[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
fn platform_data_dir() -> Option<PathBuf> {
    None
}
