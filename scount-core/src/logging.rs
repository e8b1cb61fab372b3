use tracing_subscriber::EnvFilter;

/// Directives used when `RUST_LOG` is unset. Statement-level sqlx logging is
/// noisy at `info`.
pub const DEFAULT_FILTER: &str = "info,sqlx=warn";

/// Install a global `fmt` subscriber filtered by `RUST_LOG`, falling back to
/// [`DEFAULT_FILTER`].
///
/// Call this once, at the very start of `main`, before any tracing macro.
/// Library code in this workspace only emits events and never calls this.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .init();
}

/// Like [`init_tracing`] with explicit directives, e.g. `"debug,sqlx=info"`.
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing_with(
    directives: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(directives)?)
        .try_init()
}
