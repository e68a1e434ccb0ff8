//! Pool configuration structures.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{timeout_from_secs, PoolError};

const DEFAULT_TARGET_SIZE: usize = 5;
const DEFAULT_TIMEOUT_SECS: f64 = 30.0;
const DEFAULT_MAX_OVERFLOW: i64 = 10;

/// Resource pool configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Baseline pool size; also the number of idle resources kept around.
    pub target_size: usize,
    /// Seconds a checkout waits once overflow capacity is saturated.
    pub timeout_secs: f64,
    /// Resources allowed beyond `target_size`; `-1` means unlimited.
    pub max_overflow: i64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            target_size: DEFAULT_TARGET_SIZE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_overflow: DEFAULT_MAX_OVERFLOW,
        }
    }
}

impl PoolConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the baseline pool size.
    #[must_use]
    pub const fn with_target_size(mut self, target_size: usize) -> Self {
        self.target_size = target_size;
        self
    }

    /// Set the checkout timeout in seconds.
    #[must_use]
    pub const fn with_timeout_secs(mut self, timeout_secs: f64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set the overflow limit (`-1` for unlimited).
    #[must_use]
    pub const fn with_max_overflow(mut self, max_overflow: i64) -> Self {
        self.max_overflow = max_overflow;
        self
    }

    /// Checkout timeout as a [`Duration`].
    ///
    /// # Errors
    ///
    /// [`PoolError::InvalidArgument`] for negative or non-finite seconds.
    pub fn timeout(&self) -> Result<Duration, PoolError> {
        timeout_from_secs(self.timeout_secs)
    }

    /// Validate pool configuration values.
    ///
    /// # Errors
    ///
    /// [`PoolError::InvalidConfig`] for `max_overflow < -1`,
    /// [`PoolError::InvalidArgument`] for a bad timeout.
    pub fn validate(&self) -> Result<(), PoolError> {
        if self.max_overflow < -1 {
            return Err(PoolError::InvalidConfig(format!(
                "max_overflow must be -1 (unlimited) or non-negative, got {}",
                self.max_overflow
            )));
        }
        self.timeout()?;
        Ok(())
    }

    /// Parse pool configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// [`PoolError::InvalidConfig`] on parse failure, otherwise see
    /// [`validate`](Self::validate).
    pub fn from_json_str(input: &str) -> Result<Self, PoolError> {
        let cfg: Self = serde_json::from_str(input)
            .map_err(|e| PoolError::InvalidConfig(format!("parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load configuration from `<PREFIX>_TARGET_SIZE`, `<PREFIX>_TIMEOUT_SECS`
    /// and `<PREFIX>_MAX_OVERFLOW`, reading a `.env` file first if present.
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// [`PoolError::InvalidConfig`] when a variable does not parse, otherwise
    /// see [`validate`](Self::validate).
    pub fn from_env(prefix: &str) -> Result<Self, PoolError> {
        // A missing .env file is not an error.
        let _ = dotenvy::dotenv();
        Self::from_lookup(prefix, |key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<L>(prefix: &str, lookup: L) -> Result<Self, PoolError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(v) = parse_var(&lookup, prefix, "TARGET_SIZE")? {
            cfg.target_size = v;
        }
        if let Some(v) = parse_var(&lookup, prefix, "TIMEOUT_SECS")? {
            cfg.timeout_secs = v;
        }
        if let Some(v) = parse_var(&lookup, prefix, "MAX_OVERFLOW")? {
            cfg.max_overflow = v;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn parse_var<L, T>(lookup: &L, prefix: &str, name: &str) -> Result<Option<T>, PoolError>
where
    L: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let key = format!("{prefix}_{name}");
    lookup(&key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| PoolError::InvalidConfig(format!("{key}={raw:?}: {e}")))
        })
        .transpose()
}

/// Configuration for a set of named pools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolsConfig {
    /// Map of pool name to configuration.
    pub pools: HashMap<String, PoolConfig>,
}

impl PoolsConfig {
    /// Validate all pools and ensure at least one pool exists.
    ///
    /// # Errors
    ///
    /// [`PoolError::InvalidConfig`] naming the offending pool.
    pub fn validate(&self) -> Result<(), PoolError> {
        if self.pools.is_empty() {
            return Err(PoolError::InvalidConfig("at least one pool must be defined".into()));
        }
        for (name, pool) in &self.pools {
            pool.validate()
                .map_err(|e| PoolError::InvalidConfig(format!("pool `{name}` invalid: {e}")))?;
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// See [`validate`](Self::validate).
    pub fn from_json_str(input: &str) -> Result<Self, PoolError> {
        let cfg: Self = serde_json::from_str(input)
            .map_err(|e| PoolError::InvalidConfig(format!("parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_overrides_defaults() {
        let cfg = PoolConfig::from_lookup(
            "DB_POOL",
            env(&[("DB_POOL_TARGET_SIZE", "8"), ("DB_POOL_MAX_OVERFLOW", "-1")]),
        )
        .unwrap();
        assert_eq!(cfg.target_size, 8);
        assert_eq!(cfg.max_overflow, -1);
        assert!((cfg.timeout_secs - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let err = PoolConfig::from_lookup("P", env(&[("P_TARGET_SIZE", "five")])).unwrap_err();
        assert!(matches!(err, PoolError::InvalidConfig(msg) if msg.contains("P_TARGET_SIZE")));
    }

    #[test]
    fn test_from_lookup_rejects_negative_timeout() {
        let err = PoolConfig::from_lookup("P", env(&[("P_TIMEOUT_SECS", "-3")])).unwrap_err();
        assert!(matches!(err, PoolError::InvalidArgument(_)));
    }
}
