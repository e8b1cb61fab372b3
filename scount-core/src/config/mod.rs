mod loader;
pub mod secrets;
pub mod typed;
pub mod value;

use std::collections::HashMap;
use std::path::Path;

pub use secrets::{DefaultSecretResolver, SecretResolver};
pub use typed::ConfigProperties;
pub use value::{ConfigValue, FromConfigValue};

/// Environment variable selecting the active profile.
pub const PROFILE_ENV: &str = "SCOUNT_PROFILE";

/// Only environment variables with this prefix overlay config keys.
pub const ENV_PREFIX: &str = "SCOUNT_";

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config key not found: {0}")]
    NotFound(String),

    #[error("config type mismatch for '{key}': expected {expected}")]
    TypeMismatch { key: String, expected: &'static str },

    /// An I/O or YAML parsing error while loading config sources.
    #[error("config load error: {0}")]
    Load(String),

    /// A value was present and well-typed but not acceptable.
    #[error("invalid config value for '{key}': {message}")]
    Invalid { key: String, message: String },
}

/// Application configuration loaded from YAML files, `.env` files, and
/// environment variables.
///
/// Resolution order (lowest to highest priority):
/// 1. `application.yaml` (base)
/// 2. `application-{profile}.yaml` (profile override)
/// 3. `.env` then `.env.{profile}` (loaded into the process environment,
///    never overwriting variables that are already set)
/// 4. `SCOUNT_*` environment variables: `scount.database.url` is overridden
///    by `SCOUNT_DATABASE_URL`
///
/// `${VAR}`, `${env:VAR}` and `${file:path}` placeholders in YAML strings are
/// resolved after loading.
///
/// Profile is determined by: `SCOUNT_PROFILE` env var > argument > `"dev"`.
#[derive(Debug, Clone)]
pub struct ScountConfig {
    values: HashMap<String, ConfigValue>,
    /// Environment overrides keyed by variable name, e.g. `SCOUNT_DATABASE_URL`.
    env: HashMap<String, ConfigValue>,
    profile: String,
}

impl ScountConfig {
    /// Load from the current working directory.
    pub fn load(profile: &str) -> Result<Self, ConfigError> {
        Self::load_from(Path::new("."), profile, &DefaultSecretResolver)
    }

    /// Load `application*.yaml` and `.env*` from `dir` with a custom secret
    /// resolver.
    pub fn load_from(
        dir: &Path,
        profile: &str,
        resolver: &dyn SecretResolver,
    ) -> Result<Self, ConfigError> {
        let active_profile = std::env::var(PROFILE_ENV).unwrap_or_else(|_| {
            if profile.is_empty() {
                "dev".to_string()
            } else {
                profile.to_string()
            }
        });

        let mut values = HashMap::new();
        loader::load_yaml_file(&dir.join("application.yaml"), &mut values)?;
        loader::load_yaml_file(
            &dir.join(format!("application-{active_profile}.yaml")),
            &mut values,
        )?;

        // A missing .env file is the common case.
        let _ = dotenvy::from_path(dir.join(".env"));
        let _ = dotenvy::from_path(dir.join(format!(".env.{active_profile}")));

        resolve_string_values(&mut values, resolver)?;

        let env = std::env::vars()
            .filter(|(key, _)| key.starts_with(ENV_PREFIX) && key != PROFILE_ENV)
            .map(|(key, val)| (key, ConfigValue::String(val)))
            .collect();

        tracing::debug!(profile = %active_profile, dir = %dir.display(), "configuration loaded");
        Ok(ScountConfig {
            values,
            env,
            profile: active_profile,
        })
    }

    /// Create a config from a YAML string. Environment variables are ignored.
    pub fn from_yaml_str(yaml: &str, profile: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        loader::load_yaml_str(yaml, &mut values)?;
        Ok(ScountConfig {
            values,
            env: HashMap::new(),
            profile: profile.to_string(),
        })
    }

    pub fn empty() -> Self {
        ScountConfig {
            values: HashMap::new(),
            env: HashMap::new(),
            profile: "test".to_string(),
        }
    }

    /// Set a value programmatically. Takes precedence over every source.
    pub fn set(&mut self, key: &str, value: ConfigValue) {
        self.env.remove(&env_key(key));
        self.values.insert(key.to_string(), value);
    }

    /// Get a typed value for the given dot-separated key.
    ///
    /// # Errors
    ///
    /// `ConfigError::NotFound` if the key does not exist, or
    /// `ConfigError::TypeMismatch` if the value cannot be converted.
    pub fn get<V: FromConfigValue>(&self, key: &str) -> Result<V, ConfigError> {
        self.get_opt(key)?
            .ok_or_else(|| ConfigError::NotFound(key.to_string()))
    }

    /// `Ok(None)` when missing; a present but ill-typed value is still an error.
    pub fn get_opt<V: FromConfigValue>(&self, key: &str) -> Result<Option<V>, ConfigError> {
        match self.lookup(key) {
            Some(value) => V::from_config_value(value, key).map(Some),
            None => Ok(None),
        }
    }

    /// Get a typed value, returning a default if the key is missing or
    /// ill-typed.
    pub fn get_or<V: FromConfigValue>(&self, key: &str, default: V) -> V {
        self.get(key).unwrap_or(default)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// Build a typed section, e.g. `config.section::<DatabaseConfig>()`.
    pub fn section<C: ConfigProperties>(&self) -> Result<C, ConfigError> {
        C::from_config(self)
    }

    fn lookup(&self, key: &str) -> Option<&ConfigValue> {
        self.env
            .get(&env_key(key))
            .or_else(|| self.values.get(key))
    }
}

/// `scount.database.max_connections` -> `SCOUNT_DATABASE_MAX_CONNECTIONS`
pub fn env_key(key: &str) -> String {
    key.replace('.', "_").to_uppercase()
}

fn resolve_string_values(
    values: &mut HashMap<String, ConfigValue>,
    resolver: &dyn SecretResolver,
) -> Result<(), ConfigError> {
    for value in values.values_mut() {
        if let ConfigValue::String(s) = value {
            if s.contains("${") {
                *s = secrets::resolve_placeholders(s, resolver)?;
            }
        }
    }
    Ok(())
}
