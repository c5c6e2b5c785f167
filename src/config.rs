use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunables for [`ShuffleService`](crate::service::ShuffleService).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Maximum number of shuffle records held in the lookup cache.
    pub cache_capacity: u64,
    pub cache_ttl_secs: u64,
    /// Shuffles allowed per user per rate window.
    pub rate_limit: u32,
    pub rate_window_secs: u64,
    /// Recent shuffles considered when ranking most common cards.
    pub history_len: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            cache_capacity: 1000,
            cache_ttl_secs: 600,
            rate_limit: 30,
            rate_window_secs: 60,
            history_len: 20,
        }
    }
}

impl ServiceConfig {
    /// Defaults overridden by `SHUFFLE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ServiceConfig::default();
        Ok(ServiceConfig {
            cache_capacity: parse_var(&lookup, "SHUFFLE_CACHE_CAPACITY", defaults.cache_capacity)?,
            cache_ttl_secs: parse_var(&lookup, "SHUFFLE_CACHE_TTL_SECS", defaults.cache_ttl_secs)?,
            rate_limit: parse_var(&lookup, "SHUFFLE_RATE_LIMIT", defaults.rate_limit)?,
            rate_window_secs: parse_var(&lookup, "SHUFFLE_RATE_WINDOW_SECS", defaults.rate_window_secs)?,
            history_len: parse_var(&lookup, "SHUFFLE_HISTORY_LEN", defaults.history_len)?,
        })
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn rate_window(&self) -> Duration {
        Duration::from_secs(self.rate_window_secs)
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidVar { var, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = ServiceConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(cfg, ServiceConfig::default());
        assert_eq!(cfg.rate_window(), Duration::from_secs(60));
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = ServiceConfig::from_lookup(lookup_from(&[
            ("SHUFFLE_RATE_LIMIT", "5"),
            ("SHUFFLE_CACHE_TTL_SECS", " 30 "),
        ]))
        .unwrap();
        assert_eq!(cfg.rate_limit, 5);
        assert_eq!(cfg.cache_ttl(), Duration::from_secs(30));
        assert_eq!(cfg.history_len, 20);
    }

    #[test]
    fn garbage_is_rejected() {
        let err = ServiceConfig::from_lookup(lookup_from(&[("SHUFFLE_HISTORY_LEN", "lots")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidVar { var: "SHUFFLE_HISTORY_LEN", value: "lots".into() }
        );
    }

    #[test]
    fn partial_json_uses_defaults() {
        let cfg: ServiceConfig = serde_json::from_str(r#"{"rate_limit": 3}"#).unwrap();
        assert_eq!(cfg.rate_limit, 3);
        assert_eq!(cfg.cache_capacity, 1000);
    }
}
