use serde::{Deserialize, Serialize};

use crate::entity::{Entity, Identity, SparseFilter, SparseUpdater};
use crate::query::{Arg, FilterField, Matcher};

/// A shared account owned by a user. Inserting one also grants its owner
/// membership.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scount {
    pub sid: String,
    pub owner: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScountId {
    pub sid: String,
}

impl ScountId {
    pub fn new(sid: impl Into<String>) -> Self {
        Self { sid: sid.into() }
    }
}

/// `uid` matches scounts the user is a member of, not only those it owns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScountFilter {
    pub sid: String,
    pub uid: String,
    pub owner: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScountUpdater {
    pub owner: String,
    pub title: String,
    pub description: String,
}

const MEMBER_OF: Matcher = Matcher::InSubquery {
    column: "sid",
    table: "members",
    select: "sid",
    by: "uid",
};

impl Entity for Scount {
    type Id = ScountId;
    type Filter = ScountFilter;
    type Updater = ScountUpdater;

    fn table_name() -> &'static str {
        "scounts"
    }

    fn columns() -> &'static [&'static str] {
        &["sid", "owner", "title", "description"]
    }

    fn key_columns() -> &'static [&'static str] {
        &["sid"]
    }

    fn sortable() -> &'static [&'static str] {
        &["sid", "owner", "title", "description"]
    }

    fn values(&self) -> Vec<Arg> {
        vec![
            Arg::from(self.sid.as_str()),
            Arg::from(self.owner.as_str()),
            Arg::from(self.title.as_str()),
            Arg::from(self.description.as_str()),
        ]
    }
}

impl Identity for ScountId {
    fn key_args(&self) -> Vec<Arg> {
        vec![Arg::from(self.sid.as_str())]
    }

    fn is_unset(&self) -> bool {
        self.sid.is_empty()
    }
}

impl SparseFilter for ScountFilter {
    fn fields(&self) -> Vec<FilterField> {
        vec![
            FilterField::eq("sid", &self.sid),
            FilterField::new(MEMBER_OF, &self.uid),
            FilterField::eq("owner", &self.owner),
            FilterField::eq("title", &self.title),
        ]
    }
}

impl SparseUpdater for ScountUpdater {
    fn assignments(&self) -> Vec<(&'static str, Arg)> {
        [
            ("owner", &self.owner),
            ("title", &self.title),
            ("description", &self.description),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(column, value)| (column, Arg::from(value.as_str())))
        .collect()
    }
}
