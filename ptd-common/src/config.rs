//! Configuration loading and data folder resolution

use std::path::PathBuf;

use crate::error::{Error, Result};

/// Default bind address for the hub service.
pub const DEFAULT_BIND: &str = "127.0.0.1:5770";

/// Resolved hub configuration.
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Folder holding the SQLite database.
    pub data_dir: PathBuf,
    /// Listen address, `host:port`.
    pub bind: String,
}

impl HubConfig {
    /// Resolve configuration following the priority order:
    /// 1. Command-line argument (highest priority)
    /// 2. Environment variable (`PTD_DATA_DIR` / `PTD_BIND`)
    /// 3. TOML config file (`data_dir` / `bind` keys)
    /// 4. Compiled default (fallback)
    pub fn resolve(cli_data_dir: Option<&str>, cli_bind: Option<&str>) -> Self {
        HubConfig {
            data_dir: resolve_data_dir(cli_data_dir),
            bind: resolve_bind(cli_bind),
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("ptd.db")
    }
}

fn resolve_data_dir(cli_arg: Option<&str>) -> PathBuf {
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }
    if let Ok(path) = std::env::var("PTD_DATA_DIR") {
        return PathBuf::from(path);
    }
    if let Some(value) = config_file_value("data_dir") {
        return PathBuf::from(value);
    }
    default_data_dir()
}

fn resolve_bind(cli_arg: Option<&str>) -> String {
    if let Some(bind) = cli_arg {
        return bind.to_string();
    }
    if let Ok(bind) = std::env::var("PTD_BIND") {
        return bind;
    }
    if let Some(value) = config_file_value("bind") {
        return value;
    }
    DEFAULT_BIND.to_string()
}

/// Read one string key from the config file, if the file exists and parses.
fn config_file_value(key: &str) -> Option<String> {
    let config_path = load_config_file().ok()?;
    let toml_content = std::fs::read_to_string(&config_path).ok()?;
    let config = toml::from_str::<toml::Value>(&toml_content).ok()?;
    config.get(key).and_then(|v| v.as_str()).map(String::from)
}

/// Get default configuration file path for the platform
fn load_config_file() -> Result<PathBuf> {
    if cfg!(target_os = "linux") {
        // Try ~/.config/ptd/config.toml first, then /etc/ptd/config.toml
        let user_config = dirs::config_dir().map(|d| d.join("ptd").join("config.toml"));
        if let Some(path) = user_config {
            if path.exists() {
                return Ok(path);
            }
        }
        let system_config = PathBuf::from("/etc/ptd/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
        return Err(Error::Config("No config file found".to_string()));
    }

    let config_path = dirs::config_dir()
        .map(|d| d.join("ptd").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

    if config_path.exists() {
        Ok(config_path)
    } else {
        Err(Error::Config(format!(
            "Config file not found: {:?}",
            config_path
        )))
    }
}

/// OS-dependent default data folder
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("ptd"))
        .unwrap_or_else(|| PathBuf::from("./ptd_data"))
}
