use super::consts::{LOCK_BACKOFF, LOCK_TIMEOUT, MAX_LOCK_BACKOFF, MAX_READ_ATTEMPTS};
use crate::codec::CodecConfig;
use crate::error::ConfigError;
use crate::lock::LockPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Store settings, usually loaded once from a TOML file at startup
///
/// ```toml
/// max_read_attempts = 5
/// sync = false
///
/// [lock]
/// initial_delay_ms = 1
/// max_delay_ms = 50
/// timeout_ms = 30000   # 0 waits forever
///
/// [codec]
/// pretty = false
/// echo = false
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Retries after the first read attempt
    pub max_read_attempts: u32,
    /// Where staging files go; the destination's directory when unset
    pub staging_dir: Option<PathBuf>,
    /// fsync the destination before releasing the write lock
    pub sync: bool,
    pub lock: LockConfig,
    pub codec: CodecConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_read_attempts: MAX_READ_ATTEMPTS,
            staging_dir: None,
            sync: false,
            lock: LockConfig::default(),
            codec: CodecConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LockConfig {
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub timeout_ms: u64,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: LOCK_BACKOFF.as_millis() as u64,
            max_delay_ms: MAX_LOCK_BACKOFF.as_millis() as u64,
            timeout_ms: LOCK_TIMEOUT.as_millis() as u64,
        }
    }
}

impl LockConfig {
    /// Runtime retry schedule described by this section
    pub fn policy(&self) -> LockPolicy {
        LockPolicy {
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
            timeout: match self.timeout_ms {
                0 => None,
                ms => Some(Duration::from_millis(ms)),
            },
        }
    }
}

impl StoreConfig {
    /// Reads and validates a TOML config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lock.initial_delay_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "lock.initial_delay_ms",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.lock.max_delay_ms < self.lock.initial_delay_ms {
            return Err(ConfigError::InvalidValue {
                field: "lock.max_delay_ms",
                reason: format!(
                    "must be at least lock.initial_delay_ms ({})",
                    self.lock.initial_delay_ms
                ),
            });
        }
        if let Some(dir) = &self.staging_dir {
            if dir.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "staging_dir",
                    reason: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = StoreConfig::default();
        assert_eq!(config.max_read_attempts, 5);
        assert_eq!(config.lock.policy(), LockPolicy::default());
        assert!(config.staging_dir.is_none());
        assert!(!config.sync);
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = StoreConfig::from_toml_str("").unwrap();
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = StoreConfig::from_toml_str(
            r#"
max_read_attempts = 2

[lock]
timeout_ms = 0

[codec]
pretty = true
"#,
        )
        .unwrap();

        assert_eq!(config.max_read_attempts, 2);
        assert_eq!(config.lock.policy().timeout, None);
        assert_eq!(config.lock.initial_delay_ms, 1);
        assert!(config.codec.pretty);
        assert!(!config.codec.echo);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = StoreConfig::from_toml_str("max_attempts = 3");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_inverted_backoff_rejected() {
        let result = StoreConfig::from_toml_str(
            r#"
[lock]
initial_delay_ms = 100
max_delay_ms = 10
"#,
        );
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                field: "lock.max_delay_ms",
                ..
            })
        ));
    }

    #[test]
    fn test_zero_backoff_rejected() {
        let result = StoreConfig::from_toml_str(
            r#"
[lock]
initial_delay_ms = 0
max_delay_ms = 0
timeout_ms = 0
"#,
        );
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                field: "lock.initial_delay_ms",
                ..
            })
        ));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = StoreConfig {
            staging_dir: Some(PathBuf::from("/var/tmp/staging")),
            sync: true,
            ..StoreConfig::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(StoreConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_from_missing_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let result = StoreConfig::from_file(temp.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
