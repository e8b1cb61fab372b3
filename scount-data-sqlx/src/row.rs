use scount_data::model::{Member, Scount, User};
use scount_data::{Arg, Entity, Identity, QueryBuilder, Statement};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{Postgres, Row};

/// An entity that can be read from and written to a PostgreSQL row.
pub trait PgEntity: Entity {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error>
    where
        Self: Sized;

    /// Extra statements executed right after inserting this record, inside
    /// the same transaction.
    fn after_insert(&self) -> Vec<Statement> {
        Vec::new()
    }
}

impl PgEntity for User {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(User {
            uid: row.try_get("uid")?,
            email: row.try_get("email")?,
            username: row.try_get("username")?,
            password: row.try_get("password")?,
        })
    }
}

impl PgEntity for Scount {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Scount {
            sid: row.try_get("sid")?,
            owner: row.try_get("owner")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
        })
    }

    /// The owner is always a member of their scount.
    fn after_insert(&self) -> Vec<Statement> {
        let owner = Member::new(self.sid.as_str(), self.owner.as_str());
        vec![Statement {
            sql: QueryBuilder::for_entity::<Member>().build_insert(),
            args: owner.key_args(),
        }]
    }
}

impl PgEntity for Member {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Member {
            sid: row.try_get("sid")?,
            uid: row.try_get("uid")?,
        })
    }
}

/// Bind positional values in order.
pub(crate) fn bind_all<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    args: Vec<Arg>,
) -> Query<'q, Postgres, PgArguments> {
    for arg in args {
        query = match arg {
            Arg::Bool(v) => query.bind(v),
            Arg::Text(v) => query.bind(v),
            Arg::Bytes(v) => query.bind(v),
            Arg::BigInt(v) => query.bind(v),
        };
    }
    query
}
