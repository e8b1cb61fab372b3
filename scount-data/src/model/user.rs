use serde::{Deserialize, Serialize};

use crate::entity::{Entity, Identity, SparseFilter, SparseUpdater};
use crate::query::{Arg, FilterField};

/// A registered user. `email` is unique; the backend enforces it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub uid: String,
    pub email: String,
    pub username: String,
    /// Salted password hash, opaque to this layer.
    #[serde(skip)]
    pub password: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId {
    pub uid: String,
}

impl UserId {
    pub fn new(uid: impl Into<String>) -> Self {
        Self { uid: uid.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserFilter {
    pub uid: String,
    pub email: String,
    pub username: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserUpdater {
    pub username: String,
}

/// Replaces the stored hash only if it still equals `old`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordUpdater {
    pub uid: String,
    pub old: Vec<u8>,
    pub new: Vec<u8>,
}

impl Entity for User {
    type Id = UserId;
    type Filter = UserFilter;
    type Updater = UserUpdater;

    fn table_name() -> &'static str {
        "users"
    }

    fn columns() -> &'static [&'static str] {
        &["uid", "email", "username", "password"]
    }

    fn key_columns() -> &'static [&'static str] {
        &["uid"]
    }

    fn sortable() -> &'static [&'static str] {
        &["uid", "email", "username"]
    }

    fn values(&self) -> Vec<Arg> {
        vec![
            Arg::from(self.uid.as_str()),
            Arg::from(self.email.as_str()),
            Arg::from(self.username.as_str()),
            Arg::from(self.password.as_slice()),
        ]
    }
}

impl Identity for UserId {
    fn key_args(&self) -> Vec<Arg> {
        vec![Arg::from(self.uid.as_str())]
    }

    fn is_unset(&self) -> bool {
        self.uid.is_empty()
    }
}

impl SparseFilter for UserFilter {
    fn fields(&self) -> Vec<FilterField> {
        vec![
            FilterField::eq("uid", &self.uid),
            FilterField::eq("email", &self.email),
            FilterField::eq("username", &self.username),
        ]
    }
}

impl SparseUpdater for UserUpdater {
    fn assignments(&self) -> Vec<(&'static str, Arg)> {
        let mut set = Vec::new();
        if !self.username.is_empty() {
            set.push(("username", Arg::from(self.username.as_str())));
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_values_follow_columns() {
        let user = User {
            uid: "u1".into(),
            email: "a@x.com".into(),
            username: "A".into(),
            password: vec![1, 2, 3],
        };
        let values = user.values();
        assert_eq!(values.len(), User::columns().len());
        assert_eq!(values[1], Arg::Text("a@x.com".into()));
        assert_eq!(values[3], Arg::Bytes(vec![1, 2, 3]));
    }

    #[test]
    fn password_never_serialized() {
        let user = User {
            password: b"secret-hash".to_vec(),
            ..Default::default()
        };
        let yaml = serde_yaml::to_string(&user).unwrap();
        assert!(!yaml.contains("password"));
    }
}
