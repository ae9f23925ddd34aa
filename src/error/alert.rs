use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::CollectionError;

/// A user-visible error published on the reconciler's alert channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlertItem {
    /// Unique identifier (for dismiss tracking)
    pub id: String,
    /// Short error code, e.g. `E_NET_TIMEOUT`
    pub error_code: String,
    /// Message shown to the user
    pub message: String,
    /// Operation the error came from, e.g. `load_more on home`
    #[serde(default)]
    pub context: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl AlertItem {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            error_code: error_code.into(),
            message: message.into(),
            context: None,
            timestamp: Utc::now(),
        }
    }
}

impl From<&CollectionError> for AlertItem {
    fn from(err: &CollectionError) -> Self {
        AlertItem {
            context: err.context().map(ToString::to_string),
            ..AlertItem::new(err.error_code(), err.user_message())
        }
    }
}
