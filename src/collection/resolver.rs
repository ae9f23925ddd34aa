//! Scroll-position resolver
//!
//! Picks the item that must keep its on-screen offset when a collection
//! snapshot is replaced. Rules are evaluated in priority order and the first
//! match wins.

use crate::models::{
    CollectionItem, CollectionKind, CollectionSection, IndexPath, ItemId, LoadMore,
    LoadMoreDirection,
};

use super::diff;

/// Interaction state the resolver reads but does not own.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolverContext<'a> {
    pub kind: CollectionKind,
    /// Last read id persisted on this device for the collection's timeline
    pub local_last_read_id: Option<&'a str>,
    pub last_selected_load_more: Option<&'a LoadMore>,
    /// Direction of the last selected load-more, read before the cache is
    /// pruned
    pub load_more_direction: Option<LoadMoreDirection>,
    /// Topmost visible row before the update
    pub top_visible: Option<IndexPath>,
}

#[derive(Debug, Clone)]
pub struct ScrollPositionResolver {
    /// One-shot: cleared the first time the local last read id is restored
    restore_local_position: bool,
}

impl ScrollPositionResolver {
    pub fn new(restore_local_position: bool) -> Self {
        Self {
            restore_local_position,
        }
    }

    /// Whether a local read position is still waiting to be restored.
    pub fn is_restoring_local_position(&self) -> bool {
        self.restore_local_position
    }

    /// Resolve the anchor item for the transition `previous` -> `new`.
    pub fn resolve(
        &mut self,
        previous: &[CollectionSection],
        new: &[CollectionSection],
        context: &ResolverContext<'_>,
    ) -> Option<ItemId> {
        if let Some(id) = self.local_last_read_id(new, context) {
            return Some(id);
        }
        if let Some(id) = context_parent(previous, new, context) {
            return Some(id);
        }
        if let Some(id) = load_more_continuity(previous, new, context) {
            return Some(id);
        }
        forward_shift(previous, new, context)
    }

    fn local_last_read_id(
        &mut self,
        new: &[CollectionSection],
        context: &ResolverContext<'_>,
    ) -> Option<ItemId> {
        if !self.restore_local_position {
            return None;
        }
        let id = context.local_last_read_id?;
        if !flatten(new).any(|item| item.item_id() == id) {
            return None;
        }
        self.restore_local_position = false;
        tracing::debug!(item_id = %id, "Restoring local read position");
        Some(id.to_string())
    }
}

/// Whether the view must compensate for the parent row's size change.
pub fn should_adjust_content_inset(
    kind: CollectionKind,
    previous: &[CollectionSection],
    new: &[CollectionSection],
) -> bool {
    kind == CollectionKind::Context
        && is_parent_only(previous)
        && flatten(new).count() > 1
}

fn context_parent(
    previous: &[CollectionSection],
    new: &[CollectionSection],
    context: &ResolverContext<'_>,
) -> Option<ItemId> {
    if context.kind != CollectionKind::Context {
        return None;
    }
    if !(previous.is_empty() || is_parent_only(previous)) {
        return None;
    }
    flatten(new)
        .find(|item| item.is_context_parent())
        .map(CollectionItem::item_id)
}

fn load_more_continuity(
    previous: &[CollectionSection],
    new: &[CollectionSection],
    context: &ResolverContext<'_>,
) -> Option<ItemId> {
    if context.kind != CollectionKind::Timeline {
        return None;
    }
    let load_more = context.last_selected_load_more?;
    if context.load_more_direction != Some(LoadMoreDirection::Up) {
        return None;
    }

    let old_items: Vec<CollectionItem> = flatten(previous).cloned().collect();
    let new_items: Vec<CollectionItem> = flatten(new).cloned().collect();
    if !diff::was_removed(
        &old_items,
        &new_items,
        &CollectionItem::LoadMore(load_more.clone()),
    ) {
        return None;
    }

    new_items
        .iter()
        .find(|item| item.status_id() == Some(load_more.before_status_id.as_str()))
        .map(CollectionItem::item_id)
}

fn forward_shift(
    previous: &[CollectionSection],
    new: &[CollectionSection],
    context: &ResolverContext<'_>,
) -> Option<ItemId> {
    if context.kind != CollectionKind::Timeline {
        return None;
    }
    let top = context.top_visible?;
    let top_id = previous.get(top.section)?.items.get(top.item)?.item_id();

    let new_index = new
        .get(top.section)?
        .items
        .iter()
        .position(|item| item.item_id() == top_id)?;

    (new_index > top.item).then_some(top_id)
}

fn flatten(sections: &[CollectionSection]) -> impl Iterator<Item = &CollectionItem> {
    sections.iter().flat_map(|section| section.items.iter())
}

/// Shaped `[before, parent, after]` with only the parent present.
fn is_parent_only(sections: &[CollectionSection]) -> bool {
    sections.len() == 3
        && sections[0].items.is_empty()
        && sections[1].items.len() == 1
        && sections[2].items.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, Status, StatusConfiguration};

    fn status(id: &str) -> CollectionItem {
        CollectionItem::status(Status::new(id, Account::new("a", "alice"), "text"))
    }

    fn parent(id: &str) -> CollectionItem {
        CollectionItem::Status {
            status: Status::new(id, Account::new("a", "alice"), "root"),
            configuration: StatusConfiguration::context_parent(),
        }
    }

    fn sections(groups: Vec<Vec<CollectionItem>>) -> Vec<CollectionSection> {
        groups.into_iter().map(CollectionSection::new).collect()
    }

    fn timeline() -> ResolverContext<'static> {
        ResolverContext {
            kind: CollectionKind::Timeline,
            ..ResolverContext::default()
        }
    }

    #[test]
    fn test_no_rule_matches_returns_none() {
        let mut resolver = ScrollPositionResolver::new(false);
        let old = sections(vec![vec![status("2"), status("1")]]);
        let new = sections(vec![vec![status("3"), status("2"), status("1")]]);
        assert_eq!(resolver.resolve(&old, &new, &timeline()), None);
    }

    #[test]
    fn test_local_read_id_is_restored_once() {
        let mut resolver = ScrollPositionResolver::new(true);
        let context = ResolverContext {
            local_last_read_id: Some("2"),
            ..timeline()
        };
        let new = sections(vec![vec![status("3"), status("2"), status("1")]]);

        assert_eq!(resolver.resolve(&[], &new, &context), Some("2".to_string()));
        assert!(!resolver.is_restoring_local_position());
        assert_eq!(resolver.resolve(&new, &new, &context), None);
    }

    #[test]
    fn test_local_read_id_waits_until_present() {
        let mut resolver = ScrollPositionResolver::new(true);
        let context = ResolverContext {
            local_last_read_id: Some("9"),
            ..timeline()
        };
        let new = sections(vec![vec![status("3")]]);

        assert_eq!(resolver.resolve(&[], &new, &context), None);
        assert!(resolver.is_restoring_local_position());
    }

    #[test]
    fn test_context_parent_anchored_after_parent_only() {
        let mut resolver = ScrollPositionResolver::new(false);
        let context = ResolverContext {
            kind: CollectionKind::Context,
            ..ResolverContext::default()
        };
        let old = sections(vec![vec![], vec![parent("5")], vec![]]);
        let new = sections(vec![vec![status("3")], vec![parent("5")], vec![status("7")]]);

        assert_eq!(resolver.resolve(&old, &new, &context), Some("5".to_string()));
        assert!(should_adjust_content_inset(CollectionKind::Context, &old, &new));
    }

    #[test]
    fn test_context_parent_not_anchored_once_loaded() {
        let mut resolver = ScrollPositionResolver::new(false);
        let context = ResolverContext {
            kind: CollectionKind::Context,
            ..ResolverContext::default()
        };
        let loaded = sections(vec![vec![status("3")], vec![parent("5")], vec![status("7")]]);

        assert_eq!(resolver.resolve(&loaded, &loaded, &context), None);
        assert!(!should_adjust_content_inset(
            CollectionKind::Context,
            &loaded,
            &loaded
        ));
    }

    #[test]
    fn test_inset_requires_more_than_one_item() {
        let old = sections(vec![vec![], vec![parent("5")], vec![]]);
        assert!(!should_adjust_content_inset(CollectionKind::Context, &old, &old));
        assert!(!should_adjust_content_inset(
            CollectionKind::Timeline,
            &old,
            &sections(vec![vec![status("1"), status("2")]])
        ));
    }

    #[test]
    fn test_load_more_up_keeps_boundary_status_anchored() {
        let mut resolver = ScrollPositionResolver::new(false);
        let gap = LoadMore::new("home", "10", "4");
        let context = ResolverContext {
            last_selected_load_more: Some(&gap),
            load_more_direction: Some(LoadMoreDirection::Up),
            ..timeline()
        };
        let old = sections(vec![vec![
            CollectionItem::LoadMore(gap.clone()),
            status("4"),
            status("3"),
        ]]);
        let new = sections(vec![vec![status("6"), status("5"), status("4"), status("3")]]);

        assert_eq!(resolver.resolve(&old, &new, &context), Some("4".to_string()));
    }

    #[test]
    fn test_load_more_down_does_not_anchor() {
        let mut resolver = ScrollPositionResolver::new(false);
        let gap = LoadMore::new("home", "10", "4");
        let context = ResolverContext {
            last_selected_load_more: Some(&gap),
            load_more_direction: Some(LoadMoreDirection::Down),
            ..timeline()
        };
        let old = sections(vec![vec![CollectionItem::LoadMore(gap.clone()), status("4")]]);
        let new = sections(vec![vec![status("6"), status("5"), status("4")]]);

        assert_eq!(resolver.resolve(&old, &new, &context), None);
    }

    #[test]
    fn test_load_more_still_present_does_not_anchor() {
        let mut resolver = ScrollPositionResolver::new(false);
        let gap = LoadMore::new("home", "10", "4");
        let context = ResolverContext {
            last_selected_load_more: Some(&gap),
            load_more_direction: Some(LoadMoreDirection::Up),
            ..timeline()
        };
        let old = sections(vec![vec![CollectionItem::LoadMore(gap.clone()), status("4")]]);

        assert_eq!(resolver.resolve(&old, &old, &context), None);
    }

    #[test]
    fn test_forward_shift_anchors_top_visible() {
        let mut resolver = ScrollPositionResolver::new(false);
        let context = ResolverContext {
            top_visible: Some(IndexPath::new(0, 1)),
            ..timeline()
        };
        let old = sections(vec![vec![status("3"), status("2"), status("1")]]);
        let new = sections(vec![vec![
            status("5"),
            status("4"),
            status("3"),
            status("2"),
            status("1"),
        ]]);

        assert_eq!(resolver.resolve(&old, &new, &context), Some("2".to_string()));
    }

    #[test]
    fn test_forward_shift_ignores_same_index() {
        let mut resolver = ScrollPositionResolver::new(false);
        let context = ResolverContext {
            top_visible: Some(IndexPath::new(0, 0)),
            ..timeline()
        };
        let old = sections(vec![vec![status("3"), status("2")]]);
        let new = sections(vec![vec![status("3"), status("2"), status("1")]]);

        assert_eq!(resolver.resolve(&old, &new, &context), None);
    }

    #[test]
    fn test_forward_shift_only_for_timelines() {
        let mut resolver = ScrollPositionResolver::new(false);
        let context = ResolverContext {
            kind: CollectionKind::Other,
            top_visible: Some(IndexPath::new(0, 0)),
            ..ResolverContext::default()
        };
        let old = sections(vec![vec![status("2")]]);
        let new = sections(vec![vec![status("3"), status("2")]]);

        assert_eq!(resolver.resolve(&old, &new, &context), None);
    }

    #[test]
    fn test_local_read_id_takes_priority() {
        let mut resolver = ScrollPositionResolver::new(true);
        let context = ResolverContext {
            local_last_read_id: Some("1"),
            top_visible: Some(IndexPath::new(0, 0)),
            ..timeline()
        };
        let old = sections(vec![vec![status("2"), status("1")]]);
        let new = sections(vec![vec![status("3"), status("2"), status("1")]]);

        assert_eq!(resolver.resolve(&old, &new, &context), Some("1".to_string()));
    }
}
