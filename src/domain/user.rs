//! User profile and authenticated session.

use serde::{Deserialize, Deserializer, Serialize};

/// Profile of the signed-in user, as returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
}

impl UserProfile {
    /// Calendar date the account was created, if the backend sent a valid RFC 3339 timestamp.
    #[must_use]
    pub fn member_since(&self) -> Option<String> {
        let raw = self.created_at.as_deref()?;
        chrono::DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&chrono::Utc).format("%Y-%m-%d").to_string())
    }
}

/// An authenticated session: a bearer token and the profile it belongs to.
///
/// Token and profile only exist together; a half-present session is never
/// constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

impl Session {
    #[must_use]
    pub const fn new(token: String, user: UserProfile) -> Self {
        Self { token, user }
    }
}

fn id_as_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Int(n) => n.to_string(),
        Raw::Text(s) => s,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_accepts_numeric_ids_and_camel_case_timestamp() {
        let user: UserProfile = serde_json::from_str(
            r#"{"id": 12, "username": "ada", "email": "ada@example.org", "createdAt": "2024-03-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(user.id, "12");
        assert_eq!(user.member_since().as_deref(), Some("2024-03-01"));
    }

    #[test]
    fn invalid_timestamp_has_no_member_since() {
        let user = UserProfile {
            id: "1".into(),
            username: "ada".into(),
            email: "ada@example.org".into(),
            created_at: Some("yesterday".into()),
        };
        assert!(user.member_since().is_none());
    }
}
