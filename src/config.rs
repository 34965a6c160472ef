//! Centralized configuration management for cadastro

use std::path::PathBuf;
use std::time::Duration;
use anyhow::{Result, Context};

use crate::reference::types::{IbgeApi, ViaCepApi};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Reference service endpoints
    pub endpoints: Endpoints,
    /// HTTP client configuration
    pub http: HttpConfig,
    /// Log file written while the TUI owns the terminal
    pub log_file: PathBuf,
    /// How long the UI loop waits for a key before checking lookup results (milliseconds)
    pub tick_rate_ms: u64,
}

/// Base URLs of the external reference services
#[derive(Debug, Clone)]
pub struct Endpoints {
    /// IBGE localities API (states and municipalities)
    pub ibge_base_url: String,
    /// ViaCEP postal-code API
    pub viacep_base_url: String,
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            ibge_base_url: IbgeApi::BASE_URL.to_string(),
            viacep_base_url: ViaCepApi::BASE_URL.to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            user_agent: "cadastro/0.1.0".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            http: HttpConfig::default(),
            log_file: PathBuf::from("cadastro.log"),
            tick_rate_ms: 100,
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        Self::from_source(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_source<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let endpoints = Endpoints {
            ibge_base_url: get("CADASTRO_IBGE_BASE_URL")
                .unwrap_or(defaults.endpoints.ibge_base_url),
            viacep_base_url: get("CADASTRO_VIACEP_BASE_URL")
                .unwrap_or(defaults.endpoints.viacep_base_url),
        };

        let http = HttpConfig {
            timeout_seconds: parse_env_var(&get, "CADASTRO_HTTP_TIMEOUT_SECONDS")?
                .unwrap_or(defaults.http.timeout_seconds),
            user_agent: get("CADASTRO_USER_AGENT").unwrap_or(defaults.http.user_agent),
        };

        let log_file = get("CADASTRO_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.log_file);

        let tick_rate_ms =
            parse_env_var(&get, "CADASTRO_TICK_RATE_MS")?.unwrap_or(defaults.tick_rate_ms);

        Ok(Config {
            endpoints,
            http,
            log_file,
            tick_rate_ms,
        })
    }

    /// Get HTTP timeout as Duration
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }

    /// Get UI poll interval as Duration
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("IBGE", &self.endpoints.ibge_base_url),
            ("ViaCEP", &self.endpoints.viacep_base_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(anyhow::anyhow!(
                    "{} base URL must start with http:// or https://, got '{}'",
                    name,
                    url
                ));
            }
        }

        if self.http.timeout_seconds == 0 {
            return Err(anyhow::anyhow!("HTTP timeout must be greater than zero"));
        }

        // Check if parent directory of the log file exists
        if let Some(parent) = self.log_file.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(anyhow::anyhow!(
                    "Log file parent directory does not exist: {}",
                    parent.display()
                ));
            }
        }

        Ok(())
    }
}

/// Helper function to parse an environment variable as a specific type
fn parse_env_var<T, F>(get: &F, var_name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match get(var_name) {
        Some(val) => val.parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn source(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_source(source(&[])).unwrap();
        assert_eq!(
            config.endpoints.ibge_base_url,
            "https://servicodados.ibge.gov.br/api/v1/localidades"
        );
        assert_eq!(config.endpoints.viacep_base_url, "https://viacep.com.br/ws");
        assert_eq!(config.http.timeout_seconds, 10);
        assert_eq!(config.tick_rate(), Duration::from_millis(100));
        assert_eq!(config.log_file, PathBuf::from("cadastro.log"));
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_source(source(&[
            ("CADASTRO_VIACEP_BASE_URL", "http://127.0.0.1:9000/ws"),
            ("CADASTRO_HTTP_TIMEOUT_SECONDS", "3"),
            ("CADASTRO_USER_AGENT", "tests"),
        ]))
        .unwrap();
        assert_eq!(config.endpoints.viacep_base_url, "http://127.0.0.1:9000/ws");
        assert_eq!(config.http_timeout(), Duration::from_secs(3));
        assert_eq!(config.http.user_agent, "tests");
    }

    #[test]
    fn test_config_rejects_unparsable_number() {
        let err = Config::from_source(source(&[("CADASTRO_TICK_RATE_MS", "fast")])).unwrap_err();
        assert!(err.to_string().contains("CADASTRO_TICK_RATE_MS"));
    }

    #[test]
    fn test_config_validation() {
        let config = Config::default();
        // Should not fail for default paths
        config.validate().unwrap();

        let mut bad_url = Config::default();
        bad_url.endpoints.ibge_base_url = "servicodados.ibge.gov.br".to_string();
        assert!(bad_url.validate().is_err());

        let mut zero_timeout = Config::default();
        zero_timeout.http.timeout_seconds = 0;
        assert!(zero_timeout.validate().is_err());
    }

    #[test]
    fn test_config_validation_checks_log_directory() {
        let temp_dir = tempfile::TempDir::new().unwrap();

        let mut config = Config::default();
        config.log_file = temp_dir.path().join("cadastro.log");
        config.validate().unwrap();

        config.log_file = temp_dir.path().join("missing").join("cadastro.log");
        assert!(config.validate().is_err());
    }
}
