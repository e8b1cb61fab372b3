use scount_data::{DataError, ErrorKind};

/// Extension trait for converting `sqlx::Error` into `DataError`.
///
/// Due to Rust's orphan rules, we can't implement `From<sqlx::Error> for DataError`
/// in this crate. Use `.map_err(SqlxErrorExt::into_data_error)` instead.
pub trait SqlxErrorExt {
    fn into_data_error(self) -> DataError;
}

impl SqlxErrorExt for sqlx::Error {
    fn into_data_error(self) -> DataError {
        let kind = match &self {
            sqlx::Error::RowNotFound => Some(ErrorKind::NotFound),
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_)
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::TypeNotFound { .. } => Some(ErrorKind::EncodingFailure),
            sqlx::Error::Database(db) => db.code().and_then(|code| classify_sqlstate(&code)),
            _ => None,
        };
        match kind {
            Some(ErrorKind::NotFound) => DataError::with_source(ErrorKind::NotFound, self),
            Some(kind) => {
                tracing::debug!(%kind, error = %self, "classified database error");
                DataError::with_source(kind, self)
            }
            None => {
                tracing::warn!(error = %self, "unclassified database error");
                DataError::database(self)
            }
        }
    }
}

/// Map a PostgreSQL SQLSTATE onto an [`ErrorKind`] by its two-character
/// class. `57014` (statement cancelled) is the single exact-code entry.
pub fn classify_sqlstate(code: &str) -> Option<ErrorKind> {
    if code == "57014" {
        return Some(ErrorKind::Cancelled);
    }
    match code.get(..2)? {
        "22" => Some(ErrorKind::InvalidData),
        "23" => Some(ErrorKind::Conflict),
        "42" => Some(ErrorKind::InsufficientPrivilege),
        _ => None,
    }
}
