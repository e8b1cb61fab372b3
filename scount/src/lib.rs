//! scount: data access for a multi-tenant bookkeeping service.
//!
//! This facade crate re-exports the scount sub-crates through a single
//! dependency. Import everything you need with:
//!
//! ```ignore
//! use scount::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     scount::init_tracing();
//!     let config = ScountConfig::load("dev")?;
//!     let store = scount::bootstrap(&config).await?;
//!     let me = store.users.find_by_email("a@x.com").await?;
//!     Ok(())
//! }
//! ```
//!
//! # Feature flags
//!
//! | Feature    | Default | Crate              |
//! |------------|---------|--------------------|
//! | `postgres` | **yes** | `scount-data-sqlx` |

pub use scount_core;
pub use scount_data;

#[cfg(feature = "postgres")]
pub use scount_data_sqlx;

pub use scount_core::{init_tracing, init_tracing_with, DatabaseConfig, ScountConfig};
pub use scount_data::{DataError, ErrorKind};

/// Startup failure. `main` is expected to report it and exit.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("configuration: {0}")]
    Config(#[from] scount_core::ConfigError),

    #[error("database: {0}")]
    Database(#[from] DataError),
}

/// Read `scount.database`, open the pool and build the store.
#[cfg(feature = "postgres")]
pub async fn bootstrap(
    config: &ScountConfig,
) -> Result<scount_data_sqlx::PgStore, BootstrapError> {
    let database = config.section::<DatabaseConfig>()?;
    tracing::info!(profile = config.profile(), "opening scount store");
    Ok(scount_data_sqlx::open(&database).await?)
}

pub mod prelude {
    //! Re-exports of the most commonly used types.
    pub use scount_core::{ConfigProperties, DatabaseConfig, ScountConfig};
    pub use scount_data::prelude::*;

    #[cfg(feature = "postgres")]
    pub use scount_data_sqlx::PgStore;

    pub use crate::BootstrapError;
}
