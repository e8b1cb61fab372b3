//! Transaction wrapper and the scoped `transaction` helper.

use std::ops::{Deref, DerefMut};

use futures_util::future::BoxFuture;
use scount_data::DataError;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};

use crate::error::SqlxErrorExt;

/// A wrapper around an owned SQLx [`Transaction`].
///
/// Dropping a `Tx` without calling [`Tx::commit`] rolls it back.
pub struct Tx(Transaction<'static, Postgres>);

impl Deref for Tx {
    type Target = Transaction<'static, Postgres>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Tx {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Tx {
    pub async fn begin(pool: &PgPool) -> Result<Self, DataError> {
        pool.begin()
            .await
            .map(Tx)
            .map_err(SqlxErrorExt::into_data_error)
    }

    /// Begin a read-only transaction whose statements all see one snapshot.
    pub async fn begin_snapshot(pool: &PgPool) -> Result<Self, DataError> {
        let mut tx = Self::begin(pool).await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(tx.as_mut())
            .await
            .map_err(SqlxErrorExt::into_data_error)?;
        Ok(tx)
    }

    /// Unwraps the `Tx` into the inner `Transaction`.
    pub fn into_inner(self) -> Transaction<'static, Postgres> {
        self.0
    }

    /// Returns a mutable reference to the underlying connection.
    pub fn as_mut(&mut self) -> &mut PgConnection {
        &mut *self.0
    }

    pub async fn commit(self) -> Result<(), DataError> {
        self.0
            .commit()
            .await
            .map_err(SqlxErrorExt::into_data_error)
    }

    pub async fn rollback(self) -> Result<(), DataError> {
        self.0
            .rollback()
            .await
            .map_err(SqlxErrorExt::into_data_error)
    }
}

/// Run `work` inside a transaction.
///
/// Commits when `work` succeeds. When it fails the transaction is rolled back
/// and the work's error is returned unchanged; a failing rollback is only
/// logged. If the returned future is dropped midway, dropping the
/// transaction rolls it back.
///
/// ```ignore
/// transaction(&pool, move |conn| Box::pin(async move {
///     sqlx::query("INSERT ...").execute(&mut *conn).await.map_err(SqlxErrorExt::into_data_error)?;
///     Ok(())
/// })).await?;
/// ```
pub async fn transaction<T, F>(pool: &PgPool, work: F) -> Result<T, DataError>
where
    T: Send,
    F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, Result<T, DataError>> + Send,
{
    let mut tx = Tx::begin(pool).await?;
    match work(tx.as_mut()).await {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback) = tx.rollback().await {
                tracing::warn!(error = %rollback, "transaction rollback failed");
            }
            Err(err)
        }
    }
}
