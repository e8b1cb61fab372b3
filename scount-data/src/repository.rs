use std::future::Future;

use crate::error::DataError;
use crate::iterable::Iterable;
use crate::model::{
    Member, MemberFilter, MemberId, MemberUpdater, PasswordUpdater, Scount, ScountFilter,
    ScountId, ScountUpdater, User, UserFilter, UserId, UserUpdater,
};
use crate::page::Projector;

/// Generic async collection over one entity type.
///
/// Uses RPITIT (return-position `impl Trait` in traits), no `async-trait`
/// needed. Every id-taking operation rejects an unset id with `NilArgument`
/// before touching the backend.
pub trait Collection<Item, Filter, Updater, Id>: Send + Sync
where
    Item: Send + 'static,
    Filter: Send + Sync,
    Updater: Send + Sync,
    Id: Send + Sync,
{
    /// Insert all items atomically. An empty batch is `NotFound`.
    fn insert(&self, items: Vec<Item>) -> impl Future<Output = Result<(), DataError>> + Send;

    fn find_one(&self, id: &Id) -> impl Future<Output = Result<Item, DataError>> + Send;

    /// Validate the projection and prepare a lazy reader. No I/O happens
    /// until the returned [`Iterable`] is consumed.
    fn find(&self, filter: &Filter, projector: &Projector) -> Result<Iterable<Item>, DataError>;

    /// Apply the non-empty fields of `updater`. With nothing to set this only
    /// checks that the record exists.
    fn update_one(
        &self,
        id: &Id,
        updater: &Updater,
    ) -> impl Future<Output = Result<(), DataError>> + Send;

    fn delete_one(&self, id: &Id) -> impl Future<Output = Result<(), DataError>> + Send;
}

pub trait Users: Collection<User, UserFilter, UserUpdater, UserId> {
    fn find_by_email(&self, email: &str) -> impl Future<Output = Result<User, DataError>> + Send;

    /// Swap the stored hash from `old` to `new`. `NotFound` if the user is
    /// missing or the stored hash no longer equals `old`.
    fn update_password(
        &self,
        updater: &PasswordUpdater,
    ) -> impl Future<Output = Result<(), DataError>> + Send;
}

pub trait Scounts: Collection<Scount, ScountFilter, ScountUpdater, ScountId> {}

impl<T> Scounts for T where T: Collection<Scount, ScountFilter, ScountUpdater, ScountId> {}

pub trait Members: Collection<Member, MemberFilter, MemberUpdater, MemberId> {}

impl<T> Members for T where T: Collection<Member, MemberFilter, MemberUpdater, MemberId> {}
