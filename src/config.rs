//! Runtime configuration read from environment variables.

use std::time::Duration;

use crate::error::ConfigError;
use crate::payment::RiseId;

pub const PRODUCTION_API_BASE: &str = "https://b2b-api.riseworks.io/v1";
pub const STAGING_API_BASE: &str = "https://staging-b2b-api.riseworks.io/v1";
pub const DEFAULT_FRAME_URL: &str = "http://localhost:1248";

const DEFAULT_FRAME_TIMEOUT_SECS: u64 = 300;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Local signing agent endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerConfig {
    pub url: String,
    /// Covers the time an operator takes to approve a request in the wallet.
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Organization paying out (`ENTITY_RISE_ID`).
    pub entity: RiseId,
    pub api_base: String,
    /// Applied to every payments API request.
    pub http_timeout: Duration,
    pub signer: SignerConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let entity = lookup("ENTITY_RISE_ID")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("ENTITY_RISE_ID"))?;

        let api_base = lookup("RISE_API_BASE").unwrap_or_else(|| STAGING_API_BASE.to_string());
        let frame_url = lookup("FRAME_URL").unwrap_or_else(|| DEFAULT_FRAME_URL.to_string());

        Ok(Self {
            entity: RiseId::new(entity.trim()),
            api_base: api_base.trim_end_matches('/').to_string(),
            http_timeout: secs(&lookup, "RISE_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?,
            signer: SignerConfig {
                url: frame_url,
                timeout: secs(&lookup, "FRAME_TIMEOUT_SECS", DEFAULT_FRAME_TIMEOUT_SECS)?,
            },
        })
    }
}

fn secs<F>(lookup: &F, name: &'static str, default: u64) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(Duration::from_secs(default)),
        Some(value) => match value.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
            _ => Err(ConfigError::Invalid { name, value }),
        },
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
    fn test_defaults() {
        let config = load(&[("ENTITY_RISE_ID", "0xabc")]).unwrap();
        assert_eq!(config.entity.as_str(), "0xabc");
        assert_eq!(config.api_base, STAGING_API_BASE);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(config.signer.url, DEFAULT_FRAME_URL);
        assert_eq!(config.signer.timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_missing_entity() {
        assert!(matches!(load(&[]), Err(ConfigError::Missing("ENTITY_RISE_ID"))));
        assert!(matches!(
            load(&[("ENTITY_RISE_ID", "  ")]),
            Err(ConfigError::Missing("ENTITY_RISE_ID"))
        ));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("ENTITY_RISE_ID", "0xabc"),
            ("RISE_API_BASE", "https://b2b-api.riseworks.io/v1/"),
            ("FRAME_URL", "http://127.0.0.1:9999"),
            ("FRAME_TIMEOUT_SECS", "5"),
            ("RISE_HTTP_TIMEOUT_SECS", "7"),
        ])
        .unwrap();
        assert_eq!(config.api_base, PRODUCTION_API_BASE);
        assert_eq!(config.signer.url, "http://127.0.0.1:9999");
        assert_eq!(config.signer.timeout, Duration::from_secs(5));
        assert_eq!(config.http_timeout, Duration::from_secs(7));
    }

    #[test]
    fn test_invalid_timeout() {
        for bad in ["soon", "0", "-1"] {
            let result = load(&[("ENTITY_RISE_ID", "0xabc"), ("FRAME_TIMEOUT_SECS", bad)]);
            assert!(matches!(
                result,
                Err(ConfigError::Invalid { name: "FRAME_TIMEOUT_SECS", .. })
            ));
        }
    }
}
