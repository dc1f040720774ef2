//! Request and response shapes exchanged with the user service.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Input to the validate operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRequest {
    pub user_id: String,
}

impl ValidationRequest {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// Registration payload forwarded to `POST /api/users/register`.
///
/// `email` is optional at the type level so a missing field is reported as
/// an `INVALID_REQUEST` by the proxy service instead of a decode failure.
/// Any other field is carried through to the user service untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RegistrationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RegistrationRequest {
    /// Create a request with only an email set.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            fields: Map::new(),
        }
    }

    /// Attach an additional pass-through field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// The email, if present and not blank.
    pub fn email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }
}

/// A successfully registered user as reported by the user service.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UserResponse {
    pub email: String,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Returns the trimmed id when it is usable for a downstream call.
pub(crate) fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
