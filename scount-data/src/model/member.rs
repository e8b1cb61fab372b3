use serde::{Deserialize, Serialize};

use crate::entity::{Entity, Identity, SparseFilter, SparseUpdater};
use crate::query::{Arg, FilterField};

/// Access grant between a scount and a user. Both fields form the key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Member {
    pub sid: String,
    pub uid: String,
}

impl Member {
    pub fn new(sid: impl Into<String>, uid: impl Into<String>) -> Self {
        Self {
            sid: sid.into(),
            uid: uid.into(),
        }
    }
}

pub type MemberId = Member;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberFilter {
    pub sid: String,
    pub uid: String,
}

/// Members carry no mutable attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemberUpdater;

impl Entity for Member {
    type Id = MemberId;
    type Filter = MemberFilter;
    type Updater = MemberUpdater;

    fn table_name() -> &'static str {
        "members"
    }

    fn columns() -> &'static [&'static str] {
        &["sid", "uid"]
    }

    fn key_columns() -> &'static [&'static str] {
        &["sid", "uid"]
    }

    fn sortable() -> &'static [&'static str] {
        &["sid", "uid"]
    }

    fn values(&self) -> Vec<Arg> {
        vec![Arg::from(self.sid.as_str()), Arg::from(self.uid.as_str())]
    }
}

impl Identity for Member {
    fn key_args(&self) -> Vec<Arg> {
        self.values()
    }

    fn is_unset(&self) -> bool {
        self.sid.is_empty() || self.uid.is_empty()
    }
}

impl SparseFilter for MemberFilter {
    fn fields(&self) -> Vec<FilterField> {
        vec![
            FilterField::eq("sid", &self.sid),
            FilterField::eq("uid", &self.uid),
        ]
    }
}

impl SparseUpdater for MemberUpdater {
    fn assignments(&self) -> Vec<(&'static str, Arg)> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_with_any_empty_half_is_unset() {
        assert!(MemberId::new("", "u1").is_unset());
        assert!(MemberId::new("s1", "").is_unset());
        assert!(!MemberId::new("s1", "u1").is_unset());
    }
}
