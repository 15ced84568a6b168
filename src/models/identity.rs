use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The signed-in user. Its `id` namespaces every owned record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// Stored login record. Only ever persisted in the credential list; callers
/// receive the password-stripped [`Identity`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Credential {
    pub id: String,
    pub email: String,
    pub password: String,
    pub name: String,
}

impl Credential {
    pub fn new(email: &str, password: &str, name: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
        }
    }

    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}
