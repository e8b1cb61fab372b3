use scount_core::DatabaseConfig;
use scount_data::{DataError, Store};
use sqlx::PgPool;

use crate::members::PgMembers;
use crate::pool::create_pool;
use crate::scounts::PgScounts;
use crate::users::PgUsers;

/// The PostgreSQL-backed store. All three collections share one pool.
pub type PgStore = Store<PgUsers, PgScounts, PgMembers>;

/// Build the store over an existing pool.
pub fn from_pool(pool: PgPool) -> PgStore {
    Store::new(
        PgUsers::new(pool.clone()),
        PgScounts::new(pool.clone()),
        PgMembers::new(pool),
    )
}

/// Connect with `config` and build the store.
pub async fn open(config: &DatabaseConfig) -> Result<PgStore, DataError> {
    Ok(from_pool(create_pool(config).await?))
}
