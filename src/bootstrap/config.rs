//! # Configuration Loader / 配置加载器
//!
//! Reads the TOML file into the [`AppConfig`] DTO. No validation and no
//! defaults here; defaults are applied at wiring time.

use std::path::{Path, PathBuf};

use anyhow::Context;
use elog_core::config::AppConfig;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "ELOG_CONFIG";

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// # Errors / 错误
///
/// Returns error if the file cannot be read or is not valid TOML.
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

/// Like [`load_config`], but a missing file yields [`AppConfig::empty`].
pub fn load_config_or_default(config_path: Option<&Path>) -> anyhow::Result<AppConfig> {
    match config_path {
        Some(path) if path.exists() => load_config(path),
        Some(path) => {
            tracing::info!(path = %path.display(), "Config file not found, using defaults");
            Ok(AppConfig::empty())
        }
        None => Ok(AppConfig::empty()),
    }
}

/// Config path from the command line, then `ELOG_CONFIG`, then
/// `<config dir>/elog/config.toml`.
pub fn resolve_config_path(cli_path: Option<PathBuf>) -> Option<PathBuf> {
    cli_path
        .or_else(|| {
            std::env::var(CONFIG_ENV)
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        })
        .or_else(|| dirs::config_dir().map(|dir| dir.join("elog").join("config.toml")))
}
