//! Structural difference between two item sequences.

use std::collections::HashMap;

use crate::models::CollectionItem;

/// Items of `old` that have no counterpart in `new`.
///
/// Comparison uses full item equality and is multiset-aware: an item that
/// appears twice in `old` but once in `new` is reported once.
pub fn removals<'a>(old: &'a [CollectionItem], new: &[CollectionItem]) -> Vec<&'a CollectionItem> {
    let mut remaining: HashMap<&CollectionItem, usize> = HashMap::with_capacity(new.len());
    for item in new {
        *remaining.entry(item).or_insert(0) += 1;
    }

    old.iter()
        .filter(|item| match remaining.get_mut(*item) {
            Some(count) if *count > 0 => {
                *count -= 1;
                false
            }
            _ => true,
        })
        .collect()
}

/// True if `target` is among the [`removals`] from `old` to `new`.
pub fn was_removed(old: &[CollectionItem], new: &[CollectionItem], target: &CollectionItem) -> bool {
    removals(old, new).into_iter().any(|item| item == target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, LoadMore, Status};

    fn status(id: &str) -> CollectionItem {
        CollectionItem::status(Status::new(id, Account::new("a", "alice"), "text"))
    }

    #[test]
    fn test_removals_empty_when_unchanged() {
        let items = vec![status("1"), status("2")];
        assert!(removals(&items, &items).is_empty());
    }

    #[test]
    fn test_removals_reports_missing_items_in_order() {
        let gap = CollectionItem::LoadMore(LoadMore::new("home", "3", "2"));
        let old = vec![gap.clone(), status("2"), status("1")];
        let new = vec![status("4"), status("3"), status("2"), status("1")];

        assert_eq!(removals(&old, &new), vec![&gap]);
        assert!(was_removed(&old, &new, &gap));
        assert!(!was_removed(&old, &new, &status("2")));
    }

    #[test]
    fn test_removals_counts_duplicates() {
        let old = vec![status("1"), status("1")];
        let new = vec![status("1")];
        assert_eq!(removals(&old, &new).len(), 1);
    }

    #[test]
    fn test_payload_change_counts_as_removal() {
        let old = vec![status("1")];
        let mut changed = status("1");
        if let CollectionItem::Status { status, .. } = &mut changed {
            status.favourited = true;
        }
        assert_eq!(removals(&old, &[changed]).len(), 1);
    }
}
