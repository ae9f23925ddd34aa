use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{deserialize_id, Account, ItemId, Status, Tag};

/// Per-status presentation settings that travel with a status row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(default)]
pub struct StatusConfiguration {
    /// Already seen by the user
    pub is_read: bool,
    /// Spoiler text expanded
    pub show_content_toggled: bool,
    /// Sensitive attachments revealed
    pub show_attachments_toggled: bool,
    /// The status a thread was opened on
    pub is_context_parent: bool,
    pub is_pinned: bool,
    pub is_reply_in_context: bool,
    pub has_reply_following: bool,
}

impl StatusConfiguration {
    /// Configuration for the row a thread is opened on.
    pub fn context_parent() -> Self {
        Self {
            is_context_parent: true,
            ..Self::default()
        }
    }
}

/// How an account row is presented.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccountConfiguration {
    #[default]
    WithNote,
    WithoutNote,
    FollowRequest,
    Mute,
    Block,
}

/// Which side of a gap a load-more row fetches.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum LoadMoreDirection {
    /// Fetch the statuses just below the newer edge of the gap
    #[default]
    Down,
    /// Fetch the statuses just above the older edge of the gap
    Up,
}

/// A pagination gap in a timeline.
///
/// `after_status_id` is the newer status above the gap, `before_status_id`
/// the older status right below it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct LoadMore {
    pub timeline: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub after_status_id: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub before_status_id: String,
}

impl LoadMore {
    pub fn new(
        timeline: impl Into<String>,
        after_status_id: impl Into<String>,
        before_status_id: impl Into<String>,
    ) -> Self {
        Self {
            timeline: timeline.into(),
            after_status_id: after_status_id.into(),
            before_status_id: before_status_id.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Follow,
    FollowRequest,
    Mention,
    Reblog,
    Favourite,
    Poll,
    Status,
    Update,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Notification {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub account: Account,
    #[serde(default)]
    pub status: Option<Status>,
    pub created_at: DateTime<Utc>,
}

/// A direct-message conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Conversation {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub unread: bool,
    #[serde(default)]
    pub last_status: Option<Status>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    Accounts,
    Statuses,
    Tags,
}

impl SearchScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchScope::Accounts => "accounts",
            SearchScope::Statuses => "statuses",
            SearchScope::Tags => "tags",
        }
    }
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// "Show more" row at the end of a truncated search section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MoreResults {
    pub scope: SearchScope,
}

/// Variant tag of a [`CollectionItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemKind {
    Status,
    LoadMore,
    Account,
    Notification,
    Conversation,
    Tag,
    MoreResults,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Status => "status",
            ItemKind::LoadMore => "load_more",
            ItemKind::Account => "account",
            ItemKind::Notification => "notification",
            ItemKind::Conversation => "conversation",
            ItemKind::Tag => "tag",
            ItemKind::MoreResults => "more_results",
        }
    }
}

/// One row of a collection.
///
/// Equality covers the whole payload. Use [`CollectionItem::item_id`] to
/// decide whether two items are the same logical row across reloads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CollectionItem {
    Status {
        status: Status,
        #[serde(default)]
        configuration: StatusConfiguration,
    },
    LoadMore(LoadMore),
    Account {
        account: Account,
        #[serde(default)]
        configuration: AccountConfiguration,
    },
    Notification {
        notification: Notification,
        #[serde(default)]
        status_configuration: Option<StatusConfiguration>,
    },
    Conversation(Conversation),
    Tag(Tag),
    MoreResults(MoreResults),
}

impl CollectionItem {
    /// A status row with default configuration.
    pub fn status(status: Status) -> Self {
        CollectionItem::Status {
            status,
            configuration: StatusConfiguration::default(),
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            CollectionItem::Status { .. } => ItemKind::Status,
            CollectionItem::LoadMore(_) => ItemKind::LoadMore,
            CollectionItem::Account { .. } => ItemKind::Account,
            CollectionItem::Notification { .. } => ItemKind::Notification,
            CollectionItem::Conversation(_) => ItemKind::Conversation,
            CollectionItem::Tag(_) => ItemKind::Tag,
            CollectionItem::MoreResults(_) => ItemKind::MoreResults,
        }
    }

    /// Stable row identity, independent of payload changes such as a
    /// status being favourited.
    pub fn item_id(&self) -> ItemId {
        match self {
            CollectionItem::Status { status, .. } => status.id.clone(),
            CollectionItem::LoadMore(load_more) => format!(
                "load-more:{}:{}:{}",
                load_more.timeline, load_more.after_status_id, load_more.before_status_id
            ),
            CollectionItem::Account { account, .. } => account.id.clone(),
            CollectionItem::Notification { notification, .. } => notification.id.clone(),
            CollectionItem::Conversation(conversation) => conversation.id.clone(),
            CollectionItem::Tag(tag) => tag.name.clone(),
            CollectionItem::MoreResults(more) => format!("more-results:{}", more.scope),
        }
    }

    /// True for the status a thread was opened on.
    pub fn is_context_parent(&self) -> bool {
        matches!(
            self,
            CollectionItem::Status { configuration, .. } if configuration.is_context_parent
        )
    }

    /// Id of the status this row shows, for status rows only.
    pub fn status_id(&self) -> Option<&str> {
        match self {
            CollectionItem::Status { status, .. } => Some(status.id.as_str()),
            _ => None,
        }
    }
}
