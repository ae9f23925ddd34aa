use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::models::{CollectionItem, ItemId, ItemKind};

/// Identity of a cached child view-model.
///
/// Two items map to the same child only when their kind, id and
/// identity-relevant configuration all agree. Status configuration counts
/// toward the fingerprint so a row whose presentation changed gets a fresh
/// child, while the payload itself never does.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub kind: ItemKind,
    pub item_id: ItemId,
    pub fingerprint: u64,
}

impl CacheKey {
    pub fn for_item(item: &CollectionItem) -> Self {
        Self {
            kind: item.kind(),
            item_id: item.item_id(),
            fingerprint: configuration_fingerprint(item),
        }
    }
}

fn configuration_fingerprint(item: &CollectionItem) -> u64 {
    let mut hasher = DefaultHasher::new();
    match item {
        CollectionItem::Status { configuration, .. } => configuration.hash(&mut hasher),
        CollectionItem::Account { configuration, .. } => configuration.hash(&mut hasher),
        CollectionItem::Notification {
            notification,
            status_configuration,
        } => {
            // Decides between a status child and a notification child
            notification.status.is_some().hash(&mut hasher);
            status_configuration.hash(&mut hasher);
        }
        _ => return 0,
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, LoadMore, Status, StatusConfiguration};

    fn status(id: &str, configuration: StatusConfiguration) -> CollectionItem {
        CollectionItem::Status {
            status: Status::new(id, Account::new("a", "alice"), "text"),
            configuration,
        }
    }

    #[test]
    fn test_same_item_same_key() {
        let a = status("1", StatusConfiguration::default());
        let b = status("1", StatusConfiguration::default());
        assert_eq!(CacheKey::for_item(&a), CacheKey::for_item(&b));
    }

    #[test]
    fn test_payload_change_keeps_key() {
        let a = status("1", StatusConfiguration::default());
        let mut b = a.clone();
        if let CollectionItem::Status { status, .. } = &mut b {
            status.favourited = true;
        }
        assert_eq!(CacheKey::for_item(&a), CacheKey::for_item(&b));
    }

    #[test]
    fn test_configuration_change_changes_key() {
        let a = status("1", StatusConfiguration::default());
        let b = status("1", StatusConfiguration::context_parent());
        assert_ne!(CacheKey::for_item(&a), CacheKey::for_item(&b));
    }

    #[test]
    fn test_read_state_changes_key() {
        let unread = status("1", StatusConfiguration::default());
        let read = status(
            "1",
            StatusConfiguration {
                is_read: true,
                ..StatusConfiguration::default()
            },
        );
        assert_ne!(CacheKey::for_item(&unread), CacheKey::for_item(&read));
    }

    #[test]
    fn test_load_more_has_zero_fingerprint() {
        let key = CacheKey::for_item(&CollectionItem::LoadMore(LoadMore::new("home", "5", "3")));
        assert_eq!(key.fingerprint, 0);
        assert_eq!(key.kind, ItemKind::LoadMore);
    }
}
