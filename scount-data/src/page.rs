use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Page window applied to a `find`.
///
/// `limit == 0` is an empty page, not "no limit". Omit paging altogether
/// (`Projector::paging == None`) to fetch every matching row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Paging {
    pub limit: u64,
    pub offset: u64,
}

impl Paging {
    pub fn new(limit: u64, offset: u64) -> Self {
        Self { limit, offset }
    }

    /// Window for the zero-based `page` of `size` rows.
    pub fn page(page: u64, size: u64) -> Self {
        Self {
            limit: size,
            offset: page.saturating_mul(size),
        }
    }
}

/// A column name over which sorting or filtering is requested.
///
/// Only ever interpolated into SQL after allow-list validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Column(Cow<'static, str>);

impl Column {
    pub const fn from_static(name: &'static str) -> Self {
        Column(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for Column {
    fn from(name: &'static str) -> Self {
        Column::from_static(name)
    }
}

impl From<String> for Column {
    fn from(name: String) -> Self {
        Column(Cow::Owned(name))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sort order for a single column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sorter {
    pub column: Column,
    #[serde(default)]
    pub desc: bool,
}

impl Sorter {
    pub fn asc(column: impl Into<Column>) -> Self {
        Self {
            column: column.into(),
            desc: false,
        }
    }

    pub fn desc(column: impl Into<Column>) -> Self {
        Self {
            column: column.into(),
            desc: true,
        }
    }
}

/// Sort order plus page window applied to a `find`.
///
/// `order` is applied left to right. An empty `order` falls back to the
/// entity's primary key so repeated pages stay deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projector {
    #[serde(default)]
    pub order: Vec<Sorter>,
    #[serde(default)]
    pub paging: Option<Paging>,
}

impl Projector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order_by(mut self, sorter: Sorter) -> Self {
        self.order.push(sorter);
        self
    }

    pub fn paging(mut self, paging: Paging) -> Self {
        self.paging = Some(paging);
        self
    }
}

/// A drained page of results with pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub limit: u64,
    pub offset: u64,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, paging: Option<Paging>, total_elements: u64) -> Self {
        let Paging { limit, offset } = paging.unwrap_or(Paging {
            limit: total_elements,
            offset: 0,
        });
        let total_pages = if limit == 0 {
            0
        } else {
            total_elements.div_ceil(limit)
        };
        Self {
            content,
            limit,
            offset,
            total_elements,
            total_pages,
        }
    }

    pub fn has_next(&self) -> bool {
        self.offset.saturating_add(self.limit) < self.total_elements
    }

    pub fn has_prev(&self) -> bool {
        self.offset > 0
    }
}
