use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{deserialize_id, deserialize_nullable_string};

/// An account as returned by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Account {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub username: String,
    /// `user` for local accounts, `user@domain` for remote ones
    pub acct: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub display_name: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub note: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl Account {
    /// Create an account with username and acct set to the same value.
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            id: id.into(),
            acct: username.clone(),
            username,
            display_name: String::new(),
            note: String::new(),
            url: None,
        }
    }
}

/// A status (post). A reblog wraps the reblogged status in `reblog`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Status {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub account: Account,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub content: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub spoiler_text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub in_reply_to_id: Option<String>,
    #[serde(default)]
    pub reblog: Option<Box<Status>>,
    #[serde(default)]
    pub favourited: bool,
    #[serde(default)]
    pub reblogged: bool,
    #[serde(default)]
    pub url: Option<String>,
}

impl Status {
    /// Create a plain status with the given content, authored now.
    pub fn new(id: impl Into<String>, account: Account, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            account,
            content: content.into(),
            spoiler_text: String::new(),
            created_at: Utc::now(),
            in_reply_to_id: None,
            reblog: None,
            favourited: false,
            reblogged: false,
            url: None,
        }
    }

    /// The status whose content is shown: the reblogged one for a reblog.
    pub fn display_status(&self) -> &Status {
        self.reblog.as_deref().unwrap_or(self)
    }
}

/// A hashtag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Tag {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_status_is_self_without_reblog() {
        let status = Status::new("1", Account::new("a", "alice"), "hello");
        assert_eq!(status.display_status().id, "1");
    }

    #[test]
    fn test_display_status_follows_reblog() {
        let original = Status::new("1", Account::new("a", "alice"), "hello");
        let mut reblog = Status::new("2", Account::new("b", "bob"), "");
        reblog.reblog = Some(Box::new(original));

        assert_eq!(reblog.display_status().id, "1");
        assert_eq!(reblog.display_status().account.username, "alice");
    }

    #[test]
    fn test_status_deserializes_numeric_id_and_null_spoiler() {
        let json = r#"{
            "id": 42,
            "account": {"id": "7", "username": "carol", "acct": "carol@example.social"},
            "content": "<p>hi</p>",
            "spoiler_text": null,
            "created_at": "2024-03-01T12:00:00Z"
        }"#;
        let status: Status = serde_json::from_str(json).unwrap();
        assert_eq!(status.id, "42");
        assert_eq!(status.spoiler_text, "");
        assert!(status.reblog.is_none());
        assert_eq!(status.account.acct, "carol@example.social");
    }
}
