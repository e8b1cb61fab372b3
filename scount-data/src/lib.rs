pub mod cancel;
pub mod entity;
pub mod error;
pub mod iterable;
pub mod model;
pub mod page;
pub mod query;
pub mod repository;
pub mod store;

pub use entity::{Entity, Identity, SparseFilter, SparseUpdater};
pub use error::{DataError, ErrorKind};
pub use iterable::{Iterable, Yielder};
pub use page::{Column, Page, Paging, Projector, Sorter};
pub use query::{Arg, QueryBuilder, Statement};
pub use repository::{Collection, Members, Scounts, Users};
pub use store::Store;

pub mod prelude {
    //! Re-exports of the most commonly used data types.
    pub use crate::model::*;
    pub use crate::{
        Collection, DataError, Entity, ErrorKind, Iterable, Members, Page, Paging, Projector,
        Scounts, Sorter, Store, Users,
    };
}
