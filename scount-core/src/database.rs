use std::fmt;
use std::time::Duration;

use crate::config::{ConfigError, ConfigProperties, ScountConfig};

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the PostgreSQL pool, under `scount.database`.
///
/// ```yaml
/// scount:
///   database:
///     url: ${DATABASE_URL}
///     max_connections: 10
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
        }
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

impl ConfigProperties for DatabaseConfig {
    fn prefix() -> &'static str {
        "scount.database"
    }

    fn from_config(config: &ScountConfig) -> Result<Self, ConfigError> {
        let url_key = Self::key("url");
        let url: String = config.get(&url_key)?;
        if url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: url_key,
                message: "must not be empty".into(),
            });
        }

        let pool_key = Self::key("max_connections");
        let max_connections = config
            .get_opt(&pool_key)?
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);
        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: pool_key,
                message: "must be at least 1".into(),
            });
        }

        Ok(Self {
            url,
            max_connections,
            acquire_timeout_secs: config
                .get_opt(&Self::key("acquire_timeout_secs"))?
                .unwrap_or(DEFAULT_ACQUIRE_TIMEOUT_SECS),
        })
    }
}

// The URL usually embeds credentials.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .finish()
    }
}
