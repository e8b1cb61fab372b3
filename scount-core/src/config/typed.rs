use super::{ConfigError, ScountConfig};

/// A strongly-typed configuration section read from keys under
/// [`ConfigProperties::prefix`].
///
/// ```ignore
/// impl ConfigProperties for DatabaseConfig {
///     fn prefix() -> &'static str { "scount.database" }
///     fn from_config(config: &ScountConfig) -> Result<Self, ConfigError> {
///         Ok(Self { url: config.get(&Self::key("url"))?, .. })
///     }
/// }
/// ```
pub trait ConfigProperties: Sized {
    fn prefix() -> &'static str;

    fn from_config(config: &ScountConfig) -> Result<Self, ConfigError>;

    /// Absolute key of a property in this section.
    fn key(property: &str) -> String {
        format!("{}.{property}", Self::prefix())
    }
}
