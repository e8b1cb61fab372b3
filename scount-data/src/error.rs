use std::fmt;

/// Boxed backend diagnostic carried inside a [`DataError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The closed set of semantic failure kinds exposed by the data layer.
///
/// Callers match on these, never on backend-native error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No row matched a point lookup or a mutation target.
    NotFound,
    /// A uniqueness, foreign-key or check constraint was violated.
    Conflict,
    /// A value failed backend-side integrity rules.
    InvalidData,
    /// Syntax or permission failure. Opaque to end users.
    InsufficientPrivilege,
    /// A required argument (id, key field) was left unset by the caller.
    NilArgument,
    /// A stored value could not be decoded back into its Rust type.
    EncodingFailure,
    /// A sort or filter column is not in the entity's allow-list.
    InvalidColumn,
    /// The collection does not support the requested operation.
    Unsupported,
    /// The caller cancelled the operation or its deadline elapsed.
    Cancelled,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "no rows in result",
            ErrorKind::Conflict => "database state violation",
            ErrorKind::InvalidData => "invalid data for database operation",
            ErrorKind::InsufficientPrivilege => "syntax error or insufficient privilege",
            ErrorKind::NilArgument => "nil argument",
            ErrorKind::EncodingFailure => "invalid data encoding",
            ErrorKind::InvalidColumn => "invalid or non-permissible column",
            ErrorKind::Unsupported => "unsupported operation",
            ErrorKind::Cancelled => "operation cancelled",
        }
    }

    /// HTTP status a routing layer should answer with for this kind.
    ///
    /// `NotFound` maps to 404 here; handlers that look up a referenced
    /// (rather than addressed) resource may prefer 422.
    pub fn status_hint(self) -> u16 {
        match self {
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::InvalidData | ErrorKind::InvalidColumn => 400,
            ErrorKind::InsufficientPrivilege
            | ErrorKind::NilArgument
            | ErrorKind::EncodingFailure
            | ErrorKind::Unsupported
            | ErrorKind::Cancelled => 500,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "db: {}", self.as_str())
    }
}

/// Errors that can occur in the data layer.
///
/// Classified failures only display their [`ErrorKind`]; the backend
/// diagnostic, if any, stays reachable through [`std::error::Error::source`]
/// for logging.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("{kind}")]
    Kind {
        kind: ErrorKind,
        #[source]
        source: Option<BoxError>,
    },

    /// A backend failure that does not map onto any [`ErrorKind`].
    #[error("db: {0}")]
    Database(#[source] BoxError),

    /// An [`Iterable`](crate::Iterable) was consumed a second time.
    #[error("db: iterable already consumed")]
    AlreadyConsumed,
}

impl DataError {
    pub fn new(kind: ErrorKind) -> Self {
        DataError::Kind { kind, source: None }
    }

    /// Classified error that keeps the original diagnostic attached.
    pub fn with_source(kind: ErrorKind, source: impl Into<BoxError>) -> Self {
        DataError::Kind {
            kind,
            source: Some(source.into()),
        }
    }

    /// Construct a `Database` variant from any error type.
    ///
    /// Used by backend crates (e.g. `scount-data-sqlx`) to wrap driver
    /// errors that could not be classified.
    pub fn database(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        DataError::Database(Box::new(err))
    }

    pub fn not_found() -> Self {
        Self::new(ErrorKind::NotFound)
    }

    pub fn nil_argument(what: &'static str) -> Self {
        Self::with_source(ErrorKind::NilArgument, format!("{what} is not set"))
    }

    pub fn invalid_column(column: &str) -> Self {
        Self::with_source(
            ErrorKind::InvalidColumn,
            format!("column `{column}` is not allowed here"),
        )
    }

    /// The semantic kind, or `None` for unclassified backend failures.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            DataError::Kind { kind, .. } => Some(*kind),
            DataError::Database(_) | DataError::AlreadyConsumed => None,
        }
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind() == Some(kind)
    }
}

impl From<ErrorKind> for DataError {
    fn from(kind: ErrorKind) -> Self {
        DataError::new(kind)
    }
}
