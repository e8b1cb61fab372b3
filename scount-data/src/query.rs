//! SQL text generation for collections.
//!
//! Identifiers come only from an entity's static metadata or, for ORDER BY,
//! from its sort allow-list after validation. Every value travels as a bind
//! parameter (`$1, $2, ...`).
//!
//! Filters use the "flag OR equality" shape: each filter field contributes
//! two parameters, `($n OR column = $n+1)`, where `$n` is true when the field
//! is empty. The statement text is therefore the same for every combination
//! of populated fields.
//!
//! ```ignore
//! let builder = QueryBuilder::for_entity::<User>()
//!     .filter(&UserFilter { email: "a@x.com".into(), ..Default::default() })
//!     .project(&Projector::new().order_by(Sorter::desc("email")));
//! let (count, find) = builder.build_count_and_find()?;
//! ```

use crate::entity::{Entity, Identity, SparseFilter, SparseUpdater};
use crate::error::DataError;
use crate::page::{Paging, Projector, Sorter};

/// A bind parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Bool(bool),
    Text(String),
    Bytes(Vec<u8>),
    BigInt(i64),
}

impl From<bool> for Arg {
    fn from(v: bool) -> Self {
        Arg::Bool(v)
    }
}

impl From<&str> for Arg {
    fn from(v: &str) -> Self {
        Arg::Text(v.to_string())
    }
}

impl From<String> for Arg {
    fn from(v: String) -> Self {
        Arg::Text(v)
    }
}

impl From<&[u8]> for Arg {
    fn from(v: &[u8]) -> Self {
        Arg::Bytes(v.to_vec())
    }
}

impl From<i64> for Arg {
    fn from(v: i64) -> Self {
        Arg::BigInt(v)
    }
}

/// How a filter field is matched against the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    /// `column = $n`
    Eq(&'static str),
    /// `column IN (SELECT select FROM table WHERE by = $n)`
    InSubquery {
        column: &'static str,
        table: &'static str,
        select: &'static str,
        by: &'static str,
    },
}

impl Matcher {
    fn render(&self, placeholder: &str) -> String {
        match self {
            Matcher::Eq(column) => format!("{column} = {placeholder}"),
            Matcher::InSubquery {
                column,
                table,
                select,
                by,
            } => format!("{column} IN (SELECT {select} FROM {table} WHERE {by} = {placeholder})"),
        }
    }
}

/// A single field of a sparse filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterField {
    pub matcher: Matcher,
    pub value: String,
}

impl FilterField {
    pub fn eq(column: &'static str, value: &str) -> Self {
        Self {
            matcher: Matcher::Eq(column),
            value: value.to_string(),
        }
    }

    pub fn new(matcher: Matcher, value: &str) -> Self {
        Self {
            matcher,
            value: value.to_string(),
        }
    }

    /// Empty means "do not constrain". An empty string cannot be searched for.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// SQL text plus positional bind values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub args: Vec<Arg>,
}

/// A filter predicate rendered once, shared by the count and find templates
/// so both see the identical logical predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterArgs {
    clause: String,
    args: Vec<Arg>,
}

impl FilterArgs {
    /// ` WHERE ...`, or empty when the entity has no filter fields.
    pub fn clause(&self) -> &str {
        &self.clause
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }
}

fn placeholder(index: usize) -> String {
    format!("${index}")
}

fn bigint(v: u64) -> Arg {
    Arg::BigInt(i64::try_from(v).unwrap_or(i64::MAX))
}

#[derive(Debug, Clone)]
pub struct QueryBuilder {
    table: &'static str,
    columns: &'static [&'static str],
    key_columns: &'static [&'static str],
    sortable: &'static [&'static str],
    filters: Vec<FilterField>,
    order: Vec<Sorter>,
    paging: Option<Paging>,
}

impl QueryBuilder {
    pub fn for_entity<E: Entity>() -> Self {
        Self {
            table: E::table_name(),
            columns: E::columns(),
            key_columns: E::key_columns(),
            sortable: E::sortable(),
            filters: Vec::new(),
            order: Vec::new(),
            paging: None,
        }
    }

    pub fn filter<F: SparseFilter + ?Sized>(mut self, filter: &F) -> Self {
        self.filters = filter.fields();
        self
    }

    pub fn project(mut self, projector: &Projector) -> Self {
        self.order = projector.order.clone();
        self.paging = projector.paging;
        self
    }

    /// Render the WHERE predicate and its `(flag, value)` parameter pairs.
    pub fn filter_args(&self) -> FilterArgs {
        let mut args = Vec::with_capacity(self.filters.len() * 2);
        let mut clauses = Vec::with_capacity(self.filters.len());
        for field in &self.filters {
            let flag = placeholder(args.len() + 1);
            let value = placeholder(args.len() + 2);
            args.push(Arg::Bool(field.is_empty()));
            args.push(Arg::Text(field.value.clone()));
            clauses.push(format!("({flag} OR {})", field.matcher.render(&value)));
        }
        let clause = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };
        FilterArgs { clause, args }
    }

    /// `SELECT count(*) FROM <table> WHERE <predicate>`
    pub fn build_count(&self, filter: &FilterArgs) -> Statement {
        Statement {
            sql: format!("SELECT count(*) FROM {}{}", self.table, filter.clause),
            args: filter.args.clone(),
        }
    }

    /// `SELECT <columns> FROM <table> WHERE <predicate> ORDER BY <order>
    /// [LIMIT $n OFFSET $n+1]`
    ///
    /// Fails with `InvalidColumn` if a sort column is not allow-listed.
    pub fn build_find(&self, filter: &FilterArgs) -> Result<Statement, DataError> {
        let order = self.order_clause()?;
        let mut sql = format!(
            "SELECT {} FROM {}{} ORDER BY {order}",
            self.columns.join(", "),
            self.table,
            filter.clause
        );
        let mut args = filter.args.clone();
        if let Some(paging) = self.paging {
            let limit = placeholder(args.len() + 1);
            let offset = placeholder(args.len() + 2);
            sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}"));
            args.push(bigint(paging.limit));
            args.push(bigint(paging.offset));
        }
        Ok(Statement { sql, args })
    }

    /// Count and find statements filled from one set of filter args.
    pub fn build_count_and_find(&self) -> Result<(Statement, Statement), DataError> {
        let filter = self.filter_args();
        let find = self.build_find(&filter)?;
        Ok((self.build_count(&filter), find))
    }

    /// `INSERT INTO <table> (<columns>) VALUES ($1, ...)`
    pub fn build_insert(&self) -> String {
        let values: Vec<String> = (1..=self.columns.len()).map(placeholder).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            self.columns.join(", "),
            values.join(", ")
        )
    }

    /// Point lookup by primary key.
    pub fn build_find_one(&self) -> String {
        format!(
            "SELECT {} FROM {} WHERE {}",
            self.columns.join(", "),
            self.table,
            self.key_clause(1)
        )
    }

    /// Point lookup by an arbitrary stored column, e.g. a unique email.
    pub fn build_find_by(&self, column: &'static str) -> String {
        debug_assert!(self.columns.contains(&column));
        format!(
            "SELECT {} FROM {} WHERE {column} = $1",
            self.columns.join(", "),
            self.table
        )
    }

    pub fn build_exists(&self) -> String {
        format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE {})",
            self.table,
            self.key_clause(1)
        )
    }

    pub fn build_delete(&self) -> String {
        format!("DELETE FROM {} WHERE {}", self.table, self.key_clause(1))
    }

    /// `UPDATE <table> SET c = $k, ... WHERE <key>`, key parameters first.
    ///
    /// Returns `None` when the updater has nothing to set.
    pub fn build_update<I, U>(&self, id: &I, updater: &U) -> Option<Statement>
    where
        I: Identity + ?Sized,
        U: SparseUpdater + ?Sized,
    {
        let assignments = updater.assignments();
        if assignments.is_empty() {
            return None;
        }
        let mut args = id.key_args();
        let mut set = Vec::with_capacity(assignments.len());
        for (column, value) in assignments {
            args.push(value);
            set.push(format!("{column} = {}", placeholder(args.len())));
        }
        Some(Statement {
            sql: format!(
                "UPDATE {} SET {} WHERE {}",
                self.table,
                set.join(", "),
                self.key_clause(1)
            ),
            args,
        })
    }

    fn key_clause(&self, first: usize) -> String {
        self.key_columns
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{column} = {}", placeholder(first + i)))
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    /// Caller order first, then any primary key column not yet mentioned so
    /// that ties never make paging nondeterministic.
    fn order_clause(&self) -> Result<String, DataError> {
        let mut seen: Vec<&'static str> = Vec::with_capacity(self.order.len());
        let mut terms = Vec::with_capacity(self.order.len() + self.key_columns.len());
        for sorter in &self.order {
            let column = self.check_sortable(sorter.column.as_str())?;
            if seen.contains(&column) {
                continue;
            }
            seen.push(column);
            if sorter.desc {
                terms.push(format!("{column} DESC"));
            } else {
                terms.push(column.to_string());
            }
        }
        for key in self.key_columns {
            if !seen.contains(key) {
                terms.push(key.to_string());
            }
        }
        Ok(terms.join(", "))
    }

    /// Returns the allow-listed spelling, never the caller's string.
    fn check_sortable(&self, column: &str) -> Result<&'static str, DataError> {
        self.sortable
            .iter()
            .copied()
            .find(|allowed| *allowed == column)
            .ok_or_else(|| {
                tracing::debug!(table = self.table, column, "rejected sort column");
                DataError::invalid_column(column)
            })
    }
}
