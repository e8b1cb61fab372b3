//! # scount-data-sqlx: PostgreSQL backend for the scount data layer
//!
//! Implements the [`Collection`](scount_data::Collection) traits of
//! `scount-data` over an `sqlx::PgPool`.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`PgUsers`], [`PgScounts`], [`PgMembers`] | One collection per entity |
//! | [`PgStore`] | The three collections over one shared pool |
//! | [`PgTable`] | Generic table access the collections delegate to |
//! | [`Tx`], [`transaction`] | Transaction wrapper and scoped helper |
//! | [`SqlxErrorExt`] | `sqlx::Error` → `DataError` classification (`.into_data_error()`) |
//!
//! # Quick start
//!
//! ```ignore
//! use scount_core::{DatabaseConfig, ScountConfig};
//! use scount_data::prelude::*;
//!
//! let config = ScountConfig::load("dev")?;
//! let store = scount_data_sqlx::open(&config.section::<DatabaseConfig>()?).await?;
//!
//! let mut scounts = store
//!     .scounts
//!     .find(&ScountFilter { uid: uid.clone(), ..Default::default() }, &Projector::new())?;
//! let page = scounts.try_collect().await?;
//! println!("{} of {}", page.len(), scounts.total());
//! ```
//!
//! # Error bridging
//!
//! Database errors are classified by SQLSTATE class (`22` invalid data,
//! `23` conflict, `42` syntax/privilege, `57014` cancelled). Anything else
//! surfaces as an unclassified `DataError::Database` and is logged at `warn`.
//! The driver error always stays reachable through `source()`.
//!
//! # Schema
//!
//! The expected tables are in `schema.sql` at the crate root.

pub mod error;
pub mod members;
pub mod pool;
pub mod row;
pub mod scounts;
pub mod store;
pub mod table;
pub mod tx;
pub mod users;

pub use error::{classify_sqlstate, SqlxErrorExt};
pub use members::PgMembers;
pub use pool::create_pool;
pub use row::PgEntity;
pub use scounts::PgScounts;
pub use store::{from_pool, open, PgStore};
pub use table::PgTable;
pub use tx::{transaction, Tx};
pub use users::PgUsers;

/// Re-exports of the most commonly used types from both `scount-data` and this crate.
pub mod prelude {
    pub use crate::{PgMembers, PgScounts, PgStore, PgUsers, SqlxErrorExt, Tx};
    pub use scount_data::prelude::*;
}
