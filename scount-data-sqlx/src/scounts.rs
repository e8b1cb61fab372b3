use scount_data::model::{Scount, ScountFilter, ScountId, ScountUpdater};
use scount_data::{Collection, DataError, Iterable, Projector};
use sqlx::PgPool;

use crate::table::PgTable;

/// Scounts collection. Inserting a scount also records its owner as a
/// member, in the same transaction.
#[derive(Debug, Clone)]
pub struct PgScounts {
    table: PgTable<Scount>,
}

impl PgScounts {
    pub fn new(pool: PgPool) -> Self {
        Self {
            table: PgTable::new(pool),
        }
    }
}

impl Collection<Scount, ScountFilter, ScountUpdater, ScountId> for PgScounts {
    async fn insert(&self, items: Vec<Scount>) -> Result<(), DataError> {
        self.table.insert(items).await
    }

    async fn find_one(&self, id: &ScountId) -> Result<Scount, DataError> {
        self.table.find_one(id).await
    }

    fn find(
        &self,
        filter: &ScountFilter,
        projector: &Projector,
    ) -> Result<Iterable<Scount>, DataError> {
        self.table.find(filter, projector)
    }

    async fn update_one(&self, id: &ScountId, updater: &ScountUpdater) -> Result<(), DataError> {
        self.table.update_one(id, updater).await
    }

    async fn delete_one(&self, id: &ScountId) -> Result<(), DataError> {
        self.table.delete_one(id).await
    }
}
