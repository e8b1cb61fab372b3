//! Record types and their id, filter and updater companions.

mod member;
mod scount;
mod user;

pub use member::{Member, MemberFilter, MemberId, MemberUpdater};
pub use scount::{Scount, ScountFilter, ScountId, ScountUpdater};
pub use user::{PasswordUpdater, User, UserFilter, UserId, UserUpdater};
