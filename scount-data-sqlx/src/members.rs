use scount_data::model::{Member, MemberFilter, MemberId, MemberUpdater};
use scount_data::{Collection, DataError, ErrorKind, Iterable, Projector};
use sqlx::PgPool;

use crate::table::PgTable;

#[derive(Debug, Clone)]
pub struct PgMembers {
    table: PgTable<Member>,
}

impl PgMembers {
    pub fn new(pool: PgPool) -> Self {
        Self {
            table: PgTable::new(pool),
        }
    }
}

impl Collection<Member, MemberFilter, MemberUpdater, MemberId> for PgMembers {
    async fn insert(&self, items: Vec<Member>) -> Result<(), DataError> {
        self.table.insert(items).await
    }

    async fn find_one(&self, id: &MemberId) -> Result<Member, DataError> {
        self.table.find_one(id).await
    }

    fn find(
        &self,
        filter: &MemberFilter,
        projector: &Projector,
    ) -> Result<Iterable<Member>, DataError> {
        self.table.find(filter, projector)
    }

    /// A membership has no attributes besides its key, so there is nothing
    /// to update whatever the arguments.
    async fn update_one(&self, _id: &MemberId, _updater: &MemberUpdater) -> Result<(), DataError> {
        Err(ErrorKind::Unsupported.into())
    }

    async fn delete_one(&self, id: &MemberId) -> Result<(), DataError> {
        self.table.delete_one(id).await
    }
}
