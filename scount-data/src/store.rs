use crate::repository::{Members, Scounts, Users};

/// One collection per entity, built once at startup and shared by cloning.
#[derive(Debug, Clone)]
pub struct Store<U, S, M> {
    pub users: U,
    pub scounts: S,
    pub members: M,
}

impl<U, S, M> Store<U, S, M>
where
    U: Users,
    S: Scounts,
    M: Members,
{
    pub fn new(users: U, scounts: S, members: M) -> Self {
        Self {
            users,
            scounts,
            members,
        }
    }
}
