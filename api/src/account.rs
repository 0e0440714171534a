//! Account and profile wire types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Login form
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// Account name
    pub user_name: String,
    /// Plain-text password, only ever sent over the wire
    pub password: String,
}

impl Credentials {
    /// Create credentials
    #[must_use]
    pub fn new(user_name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user_name", &self.user_name)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Registration form
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Account name
    pub user_name: String,
    /// Contact email
    pub email: String,
    /// Plain-text password
    pub password: String,
    /// Given name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl Registration {
    /// Registration with only the required fields
    #[must_use]
    pub fn new(
        user_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            user_name: user_name.into(),
            email: email.into(),
            password: password.into(),
            first_name: None,
            last_name: None,
        }
    }

    /// The credentials used for the automatic login after registering
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.user_name.clone(), self.password.clone())
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("user_name", &self.user_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// Successful login response
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests
    pub token: String,
}

/// The signed-in user's profile
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    /// Account name
    pub user_name: String,
    /// Contact email
    pub email: String,
    /// Given name
    pub first_name: Option<String>,
    /// Family name
    pub last_name: Option<String>,
    /// Phone number
    pub phone_number: Option<String>,
    /// Avatar image URL
    pub avatar: Option<String>,
}

/// Uploaded avatar image
#[derive(Clone, PartialEq, Eq)]
pub struct Avatar {
    /// Original file name
    pub file_name: String,
    /// MIME type, e.g. `image/png`
    pub content_type: String,
    /// Raw image bytes
    pub bytes: Vec<u8>,
}

impl fmt::Debug for Avatar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Avatar")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Profile edit form, sent as multipart
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    /// Given name
    pub first_name: Option<String>,
    /// Family name
    pub last_name: Option<String>,
    /// Contact email
    pub email: Option<String>,
    /// Phone number
    pub phone_number: Option<String>,
    /// New avatar image
    pub avatar: Option<Avatar>,
}

impl ProfileUpdate {
    /// Text fields that are set, under their wire names
    #[must_use]
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("email", &self.email),
            ("phoneNumber", &self.phone_number),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.clone().map(|value| (name, value)))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_wire_format_and_redaction() {
        let credentials = Credentials::new("alice", "hunter2");

        let json = serde_json::to_value(&credentials).unwrap();
        assert_eq!(json, serde_json::json!({"userName": "alice", "password": "hunter2"}));
        assert!(!format!("{credentials:?}").contains("hunter2"));
    }

    #[test]
    fn test_registration_credentials() {
        let registration = Registration::new("bob", "bob@example.com", "secret");
        assert_eq!(registration.credentials(), Credentials::new("bob", "secret"));
    }

    #[test]
    fn test_profile_update_text_fields() {
        let update = ProfileUpdate {
            first_name: Some("Ann".into()),
            phone_number: Some("+100".into()),
            ..ProfileUpdate::default()
        };

        assert_eq!(
            update.text_fields(),
            vec![("firstName", "Ann".to_string()), ("phoneNumber", "+100".to_string())]
        );
    }
}
