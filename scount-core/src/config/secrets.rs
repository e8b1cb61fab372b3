use super::ConfigError;

/// Backend that turns a placeholder reference (the text inside `${...}`)
/// into its value.
pub trait SecretResolver: Send + Sync {
    fn resolve(&self, reference: &str) -> Result<String, ConfigError>;
}

/// Resolves environment variables and secret files:
/// - `${VAR_NAME}` and `${env:VAR_NAME}` read the environment
/// - `${file:/run/secrets/db_password}` reads a file, trimmed
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultSecretResolver;

impl SecretResolver for DefaultSecretResolver {
    fn resolve(&self, reference: &str) -> Result<String, ConfigError> {
        let reference = reference.trim();
        if let Some(path) = reference.strip_prefix("file:") {
            let path = path.trim();
            return std::fs::read_to_string(path)
                .map(|s| s.trim().to_string())
                .map_err(|e| ConfigError::Load(format!("secret file '{path}': {e}")));
        }
        let var = reference.strip_prefix("env:").unwrap_or(reference).trim();
        std::env::var(var).map_err(|_| ConfigError::NotFound(format!("env:{var}")))
    }
}

/// Substitute every `${...}` in `value`. Resolved text is not rescanned.
pub fn resolve_placeholders(
    value: &str,
    resolver: &dyn SecretResolver,
) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find("${") {
        let len = rest[start..]
            .find('}')
            .ok_or_else(|| ConfigError::Load(format!("unclosed placeholder in: {value}")))?;
        out.push_str(&rest[..start]);
        out.push_str(&resolver.resolve(&rest[start + 2..start + len])?);
        rest = &rest[start + len + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    impl SecretResolver for Fixed {
        fn resolve(&self, reference: &str) -> Result<String, ConfigError> {
            match reference {
                "HOST" => Ok("db.internal".into()),
                "LOOP" => Ok("${LOOP}".into()),
                other => Err(ConfigError::NotFound(other.into())),
            }
        }
    }

    #[test]
    fn substitutes_inside_text() {
        let url = resolve_placeholders("postgres://${HOST}:5432/scount", &Fixed).unwrap();
        assert_eq!(url, "postgres://db.internal:5432/scount");
    }

    #[test]
    fn resolved_text_is_not_rescanned() {
        assert_eq!(resolve_placeholders("${LOOP}", &Fixed).unwrap(), "${LOOP}");
    }

    #[test]
    fn unknown_reference_fails() {
        assert!(matches!(
            resolve_placeholders("${NOPE}", &Fixed),
            Err(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn unclosed_placeholder_fails() {
        assert!(matches!(
            resolve_placeholders("${HOST", &Fixed),
            Err(ConfigError::Load(_))
        ));
    }

    #[test]
    fn plain_value_passes_through() {
        assert_eq!(resolve_placeholders("plain", &Fixed).unwrap(), "plain");
    }

    #[test]
    fn reads_secret_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db_password");
        std::fs::write(&path, "hunter2\n").unwrap();
        let reference = format!("${{file:{}}}", path.display());
        let resolved = resolve_placeholders(&reference, &DefaultSecretResolver).unwrap();
        assert_eq!(resolved, "hunter2");
    }
}
