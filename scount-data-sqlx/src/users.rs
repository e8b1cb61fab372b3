use scount_data::model::{PasswordUpdater, User, UserFilter, UserId, UserUpdater};
use scount_data::{Collection, DataError, Iterable, Projector, Users};
use sqlx::PgPool;

use crate::error::SqlxErrorExt;
use crate::table::{expect_affected, PgTable};

const UPDATE_PASSWORD: &str = "UPDATE users SET password = $3 WHERE uid = $1 AND password = $2";

#[derive(Debug, Clone)]
pub struct PgUsers {
    table: PgTable<User>,
}

impl PgUsers {
    pub fn new(pool: PgPool) -> Self {
        Self {
            table: PgTable::new(pool),
        }
    }
}

impl Collection<User, UserFilter, UserUpdater, UserId> for PgUsers {
    async fn insert(&self, items: Vec<User>) -> Result<(), DataError> {
        self.table.insert(items).await
    }

    async fn find_one(&self, id: &UserId) -> Result<User, DataError> {
        self.table.find_one(id).await
    }

    fn find(
        &self,
        filter: &UserFilter,
        projector: &Projector,
    ) -> Result<Iterable<User>, DataError> {
        self.table.find(filter, projector)
    }

    async fn update_one(&self, id: &UserId, updater: &UserUpdater) -> Result<(), DataError> {
        self.table.update_one(id, updater).await
    }

    async fn delete_one(&self, id: &UserId) -> Result<(), DataError> {
        self.table.delete_one(id).await
    }
}

impl Users for PgUsers {
    async fn find_by_email(&self, email: &str) -> Result<User, DataError> {
        self.table.find_by("email", email).await
    }

    #[tracing::instrument(level = "debug", skip_all, fields(table = "users"))]
    async fn update_password(&self, updater: &PasswordUpdater) -> Result<(), DataError> {
        if updater.uid.is_empty() {
            return Err(DataError::nil_argument("uid"));
        }
        if updater.new.is_empty() {
            return Err(DataError::nil_argument("new password"));
        }
        let done = sqlx::query(UPDATE_PASSWORD)
            .bind(updater.uid.as_str())
            .bind(updater.old.as_slice())
            .bind(updater.new.as_slice())
            .execute(self.table.pool())
            .await
            .map_err(SqlxErrorExt::into_data_error)?;
        expect_affected(done.rows_affected())
    }
}
