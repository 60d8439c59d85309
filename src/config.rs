use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::error::EtlError;

pub const DEFAULT_CONFIG_FILE: &str = "pokeapi-etl.json";
pub const BASE_URL_ENV: &str = "POKEAPI_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_COUNT: u32 = 150;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub data_dir: Option<Utf8PathBuf>,
    #[serde(default)]
    pub reports_dir: Option<Utf8PathBuf>,
    #[serde(default)]
    pub log_file: Option<Utf8PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub count: u32,
    pub timeout: Duration,
    pub data_dir: Utf8PathBuf,
    pub reports_dir: Utf8PathBuf,
    pub log_file: Utf8PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            count: DEFAULT_COUNT,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            data_dir: Utf8PathBuf::from("data"),
            reports_dir: Utf8PathBuf::from("reports"),
            log_file: Utf8PathBuf::from("logs").join("etl.log"),
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads the config file (explicit path, or `pokeapi-etl.json` when it
    /// exists) and applies the `POKEAPI_BASE_URL` environment override.
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, EtlError> {
        let config = Self::load(path)?;
        let env_base_url = std::env::var(BASE_URL_ENV).ok();
        Self::resolve_config(config, env_base_url)
    }

    pub fn load(path: Option<&str>) -> Result<Config, EtlError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        if path.is_none() && !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| EtlError::ConfigRead(config_path.clone()))?;
        serde_json::from_str(&content).map_err(|err| EtlError::ConfigParse(err.to_string()))
    }

    pub fn resolve_config(
        config: Config,
        env_base_url: Option<String>,
    ) -> Result<ResolvedConfig, EtlError> {
        let defaults = ResolvedConfig::default();

        let base_url = env_base_url
            .filter(|value| !value.trim().is_empty())
            .or(config.base_url)
            .unwrap_or(defaults.base_url);
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(EtlError::InvalidConfig(format!(
                "base_url must be an http(s) URL, got {base_url:?}"
            )));
        }

        let timeout_secs = config.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(EtlError::InvalidConfig(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(ResolvedConfig {
            base_url,
            count: config.count.unwrap_or(defaults.count),
            timeout: Duration::from_secs(timeout_secs),
            data_dir: config.data_dir.unwrap_or(defaults.data_dir),
            reports_dir: config.reports_dir.unwrap_or(defaults.reports_dir),
            log_file: config.log_file.unwrap_or(defaults.log_file),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let resolved = ConfigLoader::resolve_config(Config::default(), None).unwrap();
        assert_eq!(resolved, ResolvedConfig::default());
        assert_eq!(resolved.count, 150);
        assert_eq!(resolved.timeout, Duration::from_secs(10));
    }

    #[test]
    fn env_overrides_file_base_url() {
        let config = Config {
            base_url: Some("https://file.example/api".to_string()),
            ..Config::default()
        };
        let resolved =
            ConfigLoader::resolve_config(config, Some("https://env.example/api/".to_string()))
                .unwrap();
        assert_eq!(resolved.base_url, "https://env.example/api");
    }

    #[test]
    fn blank_env_is_ignored() {
        let config = Config {
            base_url: Some("https://file.example/api".to_string()),
            ..Config::default()
        };
        let resolved = ConfigLoader::resolve_config(config, Some("  ".to_string())).unwrap();
        assert_eq!(resolved.base_url, "https://file.example/api");
    }
}
