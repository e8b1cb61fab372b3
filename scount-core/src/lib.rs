//! Ambient runtime pieces shared by the scount crates: layered YAML + env
//! configuration, typed config sections and tracing setup.

pub mod config;
pub mod database;
pub mod logging;

pub use config::{ConfigError, ConfigProperties, ConfigValue, FromConfigValue, ScountConfig};
pub use database::DatabaseConfig;
pub use logging::{init_tracing, init_tracing_with};
