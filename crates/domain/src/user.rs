use crate::shared::entity::{Entity, ID};

/// A `User` owns tasks and may be linked to reminder `Subscription`s.
///
/// Users are managed by the surrounding task backend, this service only
/// reads them to resolve who a reminder is for.
#[derive(Debug, Clone)]
pub struct User {
    pub id: ID,
    pub email: String,
    pub name: String,
}

impl User {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Default::default(),
            email: email.into(),
            name: name.into(),
        }
    }
}

impl Entity for User {
    fn id(&self) -> &ID {
        &self.id
    }
}
