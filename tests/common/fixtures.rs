//! Item fixtures.

use chrono::Utc;

use tootview::models::{
    Account, AccountConfiguration, CollectionItem, CollectionSection, Conversation, LoadMore,
    MoreResults, Notification, NotificationKind, SearchScope, Status, StatusConfiguration, Tag,
};

pub fn alice() -> Account {
    Account::new("acc-alice", "alice")
}

pub fn status(id: &str) -> CollectionItem {
    CollectionItem::status(Status::new(id, alice(), format!("status {}", id)))
}

/// The status a thread was opened on.
pub fn parent(id: &str) -> CollectionItem {
    CollectionItem::Status {
        status: Status::new(id, alice(), "thread root"),
        configuration: StatusConfiguration::context_parent(),
    }
}

pub fn reblog(id: &str, original_id: &str) -> CollectionItem {
    let mut wrapper = Status::new(id, Account::new("acc-bob", "bob"), "");
    wrapper.reblog = Some(Box::new(Status::new(original_id, alice(), "original")));
    CollectionItem::status(wrapper)
}

pub fn gap(after: &str, before: &str) -> LoadMore {
    LoadMore::new("home", after, before)
}

pub fn load_more(after: &str, before: &str) -> CollectionItem {
    CollectionItem::LoadMore(gap(after, before))
}

pub fn account(id: &str) -> CollectionItem {
    CollectionItem::Account {
        account: Account::new(id, format!("user{}", id)),
        configuration: AccountConfiguration::WithNote,
    }
}

pub fn follow_notification(id: &str) -> CollectionItem {
    CollectionItem::Notification {
        notification: Notification {
            id: id.to_string(),
            kind: NotificationKind::Follow,
            account: Account::new("acc-carol", "carol"),
            status: None,
            created_at: Utc::now(),
        },
        status_configuration: None,
    }
}

pub fn mention_notification(id: &str, status_id: &str) -> CollectionItem {
    CollectionItem::Notification {
        notification: Notification {
            id: id.to_string(),
            kind: NotificationKind::Mention,
            account: Account::new("acc-carol", "carol"),
            status: Some(Status::new(status_id, Account::new("acc-carol", "carol"), "hi")),
            created_at: Utc::now(),
        },
        status_configuration: Some(StatusConfiguration::default()),
    }
}

pub fn conversation(id: &str, last_status: Option<&str>) -> CollectionItem {
    CollectionItem::Conversation(Conversation {
        id: id.to_string(),
        accounts: vec![alice()],
        unread: true,
        last_status: last_status.map(|s| Status::new(s, alice(), "dm")),
    })
}

pub fn tag(name: &str) -> CollectionItem {
    CollectionItem::Tag(Tag::new(name))
}

pub fn more_results(scope: SearchScope) -> CollectionItem {
    CollectionItem::MoreResults(MoreResults { scope })
}

/// One section holding `items`.
pub fn single(items: Vec<CollectionItem>) -> Vec<CollectionSection> {
    vec![CollectionSection::new(items)]
}

/// A thread shaped `[ancestors, parent, descendants]`.
pub fn thread(
    ancestors: Vec<CollectionItem>,
    root: CollectionItem,
    descendants: Vec<CollectionItem>,
) -> Vec<CollectionSection> {
    vec![
        CollectionSection::new(ancestors),
        CollectionSection::new(vec![root]),
        CollectionSection::new(descendants),
    ]
}
