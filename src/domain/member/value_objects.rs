use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailError {
    #[error("invalid email: {0:?}")]
    Malformed(String),
}

/// Contact address of a member, as held by the member directory
///
/// # Invariants
/// - Must contain '@' character
/// - Must be at least 3 characters long
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validates a new address
    ///
    /// # Example
    /// ```
    /// use teamspace_api::domain::member::value_objects::Email;
    ///
    /// let email = Email::new("haha@hoho.com").expect("valid email");
    /// assert_eq!(email.as_str(), "haha@hoho.com");
    /// ```
    pub fn new(raw: impl Into<String>) -> Result<Self, EmailError> {
        let raw = raw.into();
        if raw.contains('@') && raw.chars().count() >= 3 {
            Ok(Email(raw))
        } else {
            Err(EmailError::Malformed(raw))
        }
    }

    /// Wraps an address read back from the member directory
    ///
    /// The directory owns its data, so nothing is checked here.
    pub fn from_persistence(raw: String) -> Self {
        Email(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Email::new(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}
