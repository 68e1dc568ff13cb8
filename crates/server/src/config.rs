//! Server configuration

use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

/// Server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub upstream_base_url: String,
    pub upstream_timeout: Duration,
    pub forward_observations: bool,
    pub cors_origins: Vec<String>,
    pub rate_limit_rps: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_address = match lookup("BIND_ADDRESS") {
            Some(addr) => addr,
            None => {
                let port: u16 = parse(&lookup, "PORT", 3000)?;
                format!("0.0.0.0:{}", port)
            }
        };

        let timeout_ms: u64 = parse(&lookup, "UPSTREAM_TIMEOUT_MS", 5000)?;
        let rate_limit_rps: u32 = parse(&lookup, "RATE_LIMIT_RPS", 100)?;
        if rate_limit_rps == 0 {
            return Err(ConfigError::InvalidValue {
                name: "RATE_LIMIT_RPS",
                value: "0".into(),
            });
        }

        Ok(Self {
            bind_address,
            upstream_base_url: lookup("FHIR_UPSTREAM_URL")
                .unwrap_or_else(|| "http://localhost:8080/fhir".into())
                .trim_end_matches('/')
                .to_string(),
            upstream_timeout: Duration::from_millis(timeout_ms),
            forward_observations: parse(&lookup, "FORWARD_OBSERVATIONS", false)?,
            cors_origins: lookup("CORS_ORIGINS")
                .unwrap_or_else(|| "*".into())
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            rate_limit_rps,
        })
    }
}

fn parse<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.bind_address, "0.0.0.0:3000");
        assert_eq!(config.upstream_base_url, "http://localhost:8080/fhir");
        assert_eq!(config.upstream_timeout, Duration::from_secs(5));
        assert!(!config.forward_observations);
        assert_eq!(config.cors_origins, vec!["*"]);
        assert_eq!(config.rate_limit_rps, 100);
    }

    #[test]
    fn port_and_overrides() {
        let config = load(&[
            ("PORT", "8000"),
            ("FHIR_UPSTREAM_URL", "http://hapi:8080/fhir/"),
            ("UPSTREAM_TIMEOUT_MS", "250"),
            ("FORWARD_OBSERVATIONS", "true"),
            ("CORS_ORIGINS", "http://a.test, http://b.test"),
        ])
        .unwrap();

        assert_eq!(config.bind_address, "0.0.0.0:8000");
        assert_eq!(config.upstream_base_url, "http://hapi:8080/fhir");
        assert_eq!(config.upstream_timeout, Duration::from_millis(250));
        assert!(config.forward_observations);
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn bind_address_wins_over_port() {
        let config = load(&[("BIND_ADDRESS", "127.0.0.1:9000"), ("PORT", "8000")]).unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:9000");
    }

    #[test]
    fn invalid_values() {
        assert_eq!(
            load(&[("PORT", "eighty")]).unwrap_err(),
            ConfigError::InvalidValue {
                name: "PORT",
                value: "eighty".into()
            }
        );
        assert!(load(&[("FORWARD_OBSERVATIONS", "yes")]).is_err());
        assert!(load(&[("RATE_LIMIT_RPS", "0")]).is_err());
    }
}
