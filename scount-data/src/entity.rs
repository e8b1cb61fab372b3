use crate::query::{Arg, FilterField};

/// Trait representing a stored record type: its table, columns and the
/// companion id, filter and updater types used by its collection.
///
/// # Example
///
/// ```ignore
/// impl Entity for User {
///     type Id = UserId;
///     type Filter = UserFilter;
///     type Updater = UserUpdater;
///     fn table_name() -> &'static str { "users" }
///     fn columns() -> &'static [&'static str] { &["uid", "email", "username", "password"] }
///     fn key_columns() -> &'static [&'static str] { &["uid"] }
///     fn sortable() -> &'static [&'static str] { &["uid", "email", "username"] }
///     fn values(&self) -> Vec<Arg> { /* column order */ }
/// }
/// ```
pub trait Entity: Send + Sync + Unpin + 'static {
    type Id: Identity;
    type Filter: SparseFilter;
    type Updater: SparseUpdater;

    fn table_name() -> &'static str;

    /// Every stored column, in declaration order. Used for SELECT and INSERT.
    fn columns() -> &'static [&'static str];

    /// Primary key columns. Also the default sort order.
    fn key_columns() -> &'static [&'static str];

    /// Columns a caller may sort on.
    fn sortable() -> &'static [&'static str];

    /// Bind values for INSERT, aligned with [`Entity::columns`].
    fn values(&self) -> Vec<Arg>;
}

/// Identity of a single record.
pub trait Identity: Send + Sync {
    /// Key values aligned with [`Entity::key_columns`].
    fn key_args(&self) -> Vec<Arg>;

    /// Whether any key field is left empty. Such an id is rejected with
    /// `NilArgument` before reaching the backend.
    fn is_unset(&self) -> bool;
}

/// Sparse filter: empty fields impose no constraint.
pub trait SparseFilter: Send + Sync {
    /// One entry per filter field in declaration order, populated or not.
    fn fields(&self) -> Vec<FilterField>;
}

/// Sparse updater: only non-empty fields are written.
pub trait SparseUpdater: Send + Sync {
    /// `(column, value)` for each non-empty field, in declaration order.
    fn assignments(&self) -> Vec<(&'static str, Arg)>;

    fn is_empty(&self) -> bool {
        self.assignments().is_empty()
    }
}
