use std::fmt;
use std::marker::PhantomData;

use futures_util::TryStreamExt;
use scount_data::{DataError, Entity, Identity, Iterable, Projector, QueryBuilder};
use sqlx::{PgPool, Row};
use tracing::Instrument;

use crate::error::SqlxErrorExt;
use crate::row::{bind_all, PgEntity};
use crate::tx::{transaction, Tx};

/// Generic PostgreSQL table access for one entity type.
///
/// Holds a clone of the shared pool; the per-entity collections delegate to
/// it and add their own operations on top.
pub struct PgTable<E> {
    pool: PgPool,
    _marker: PhantomData<fn() -> E>,
}

impl<E> PgTable<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }

    /// Get the underlying pool reference.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl<E> Clone for PgTable<E> {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

impl<E: Entity> fmt::Debug for PgTable<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgTable")
            .field("table", &E::table_name())
            .finish_non_exhaustive()
    }
}

impl<E: PgEntity> PgTable<E> {
    /// Insert every item in one transaction; the first failure aborts all.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(table = E::table_name(), count = items.len())
    )]
    pub async fn insert(&self, items: Vec<E>) -> Result<(), DataError> {
        if items.is_empty() {
            return Err(DataError::not_found());
        }
        let sql = QueryBuilder::for_entity::<E>().build_insert();
        transaction(&self.pool, move |conn| {
            Box::pin(async move {
                for item in &items {
                    bind_all(sqlx::query(&sql), item.values())
                        .execute(&mut *conn)
                        .await
                        .map_err(SqlxErrorExt::into_data_error)?;
                    for stmt in item.after_insert() {
                        bind_all(sqlx::query(&stmt.sql), stmt.args)
                            .execute(&mut *conn)
                            .await
                            .map_err(SqlxErrorExt::into_data_error)?;
                    }
                }
                Ok(())
            })
        })
        .await
    }

    #[tracing::instrument(level = "debug", skip_all, fields(table = E::table_name()))]
    pub async fn find_one(&self, id: &E::Id) -> Result<E, DataError> {
        if id.is_unset() {
            return Err(DataError::nil_argument("id"));
        }
        let sql = QueryBuilder::for_entity::<E>().build_find_one();
        let row = bind_all(sqlx::query(&sql), id.key_args())
            .fetch_one(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_data_error)?;
        E::from_row(&row).map_err(SqlxErrorExt::into_data_error)
    }

    /// Point lookup on a unique column other than the key.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(table = E::table_name(), column = column)
    )]
    pub async fn find_by(&self, column: &'static str, value: &str) -> Result<E, DataError> {
        if value.is_empty() {
            return Err(DataError::nil_argument(column));
        }
        let sql = QueryBuilder::for_entity::<E>().build_find_by(column);
        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_one(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_data_error)?;
        E::from_row(&row).map_err(SqlxErrorExt::into_data_error)
    }

    /// Build count and page statements now; run both inside one read-only
    /// snapshot when the returned iterable is consumed, streaming rows.
    pub fn find(
        &self,
        filter: &E::Filter,
        projector: &Projector,
    ) -> Result<Iterable<E>, DataError> {
        let (count, find) = QueryBuilder::for_entity::<E>()
            .filter(filter)
            .project(projector)
            .build_count_and_find()?;
        let pool = self.pool.clone();
        let span = tracing::debug_span!("find", table = E::table_name());

        Ok(Iterable::new(move |yielder| {
            Box::pin(
                async move {
                    let mut tx = Tx::begin_snapshot(&pool).await?;
                    let total: i64 = bind_all(sqlx::query(&count.sql), count.args)
                        .fetch_one(tx.as_mut())
                        .await
                        .and_then(|row| row.try_get(0))
                        .map_err(SqlxErrorExt::into_data_error)?;

                    let mut yielded: u64 = 0;
                    {
                        let mut rows =
                            bind_all(sqlx::query(&find.sql), find.args).fetch(tx.as_mut());
                        while let Some(row) = rows
                            .try_next()
                            .await
                            .map_err(SqlxErrorExt::into_data_error)?
                        {
                            let item = E::from_row(&row).map_err(SqlxErrorExt::into_data_error)?;
                            if !yielder.send(item).await {
                                tracing::debug!("consumer stopped early");
                                break;
                            }
                            yielded += 1;
                        }
                    }
                    tx.commit().await?;

                    tracing::debug!(total, yielded, "find complete");
                    Ok(u64::try_from(total).unwrap_or_default())
                }
                .instrument(span),
            )
        }))
    }

    /// Apply `updater` to the record. With nothing to set only existence is
    /// checked.
    #[tracing::instrument(level = "debug", skip_all, fields(table = E::table_name()))]
    pub async fn update_one(&self, id: &E::Id, updater: &E::Updater) -> Result<(), DataError> {
        if id.is_unset() {
            return Err(DataError::nil_argument("id"));
        }
        let Some(stmt) = QueryBuilder::for_entity::<E>().build_update(id, updater) else {
            tracing::debug!("empty updater, checking existence only");
            return if self.exists(id).await? {
                Ok(())
            } else {
                Err(DataError::not_found())
            };
        };
        let done = bind_all(sqlx::query(&stmt.sql), stmt.args)
            .execute(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_data_error)?;
        expect_affected(done.rows_affected())
    }

    #[tracing::instrument(level = "debug", skip_all, fields(table = E::table_name()))]
    pub async fn delete_one(&self, id: &E::Id) -> Result<(), DataError> {
        if id.is_unset() {
            return Err(DataError::nil_argument("id"));
        }
        let sql = QueryBuilder::for_entity::<E>().build_delete();
        let done = bind_all(sqlx::query(&sql), id.key_args())
            .execute(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_data_error)?;
        expect_affected(done.rows_affected())
    }

    pub async fn exists(&self, id: &E::Id) -> Result<bool, DataError> {
        let sql = QueryBuilder::for_entity::<E>().build_exists();
        bind_all(sqlx::query(&sql), id.key_args())
            .fetch_one(&self.pool)
            .await
            .and_then(|row| row.try_get(0))
            .map_err(SqlxErrorExt::into_data_error)
    }
}

/// A mutation that touched no row means the target does not exist.
pub(crate) fn expect_affected(rows: u64) -> Result<(), DataError> {
    if rows == 0 {
        Err(DataError::not_found())
    } else {
        Ok(())
    }
}
