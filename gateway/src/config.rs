use std::time::Duration;

use ghibli_core::DEFAULT_BASE_URL;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a valid {expected}, got {value:?}")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Gateway configuration loaded from environment variables.
///
/// | Env Var                 | Default                        |
/// |-------------------------|--------------------------------|
/// | `HOST`                  | `127.0.0.1`                    |
/// | `PORT`                  | `4000`                         |
/// | `GHIBLI_API_BASE_URL`   | `https://ghibliapi.vercel.app` |
/// | `UPSTREAM_TIMEOUT_SECS` | `10` (must be > 0)             |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub upstream_base_url: String,
    pub upstream_timeout: Duration,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Missing keys take their defaults.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = var("HOST").unwrap_or_else(|| "127.0.0.1".into());

        let port = match var("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                expected: "u16",
                value: raw,
            })?,
            None => 4000,
        };

        let upstream_base_url = var("GHIBLI_API_BASE_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());

        let timeout_secs = match var("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "UPSTREAM_TIMEOUT_SECS",
                        expected: "positive integer",
                        value: raw,
                    })
                }
            },
            None => 10,
        };

        Ok(Self {
            host,
            port,
            upstream_base_url,
            upstream_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from(pairs: &[(&str, &str)]) -> Result<GatewayConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        GatewayConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = from(&[]).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 4000);
        assert_eq!(config.upstream_base_url, "https://ghibliapi.vercel.app");
        assert_eq!(config.upstream_timeout, Duration::from_secs(10));
        assert_eq!(config.bind_addr(), "127.0.0.1:4000");
    }

    #[test]
    fn overrides_are_applied() {
        let config = from(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "8080"),
            ("GHIBLI_API_BASE_URL", "http://localhost:3000"),
            ("UPSTREAM_TIMEOUT_SECS", " 3 "),
        ])
        .unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.upstream_base_url, "http://localhost:3000");
        assert_eq!(config.upstream_timeout, Duration::from_secs(3));
    }

    #[test]
    fn blank_base_url_falls_back() {
        let config = from(&[("GHIBLI_API_BASE_URL", "  ")]).unwrap();
        assert_eq!(config.upstream_base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = from(&[("PORT", "eighty")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "PORT",
                expected: "u16",
                value: "eighty".to_string(),
            }
        );
        assert_eq!(err.to_string(), "PORT must be a valid u16, got \"eighty\"");
    }

    #[test]
    fn bad_timeout_is_rejected() {
        assert!(from(&[("UPSTREAM_TIMEOUT_SECS", "-1")]).is_err());
        assert!(from(&[("UPSTREAM_TIMEOUT_SECS", "soon")]).is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = from(&[("UPSTREAM_TIMEOUT_SECS", "0")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "UPSTREAM_TIMEOUT_SECS",
                expected: "positive integer",
                value: "0".to_string(),
            }
        );
    }
}
