// Member domain module
// Members are owned by the member directory; the team lifecycle only reads them

pub mod value_objects;

use serde::Serialize;
use uuid::Uuid;

use value_objects::Email;

/// Member as resolved from the member directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub id: Uuid,
    pub name: String,
    pub email: Email,
}

impl Member {
    pub fn new(id: Uuid, name: impl Into<String>, email: Email) -> Self {
        Self {
            id,
            name: name.into(),
            email,
        }
    }
}
