use serde::{Deserialize, Serialize};

use super::{CollectionItem, ItemId, SearchScope};

/// Capability tag of a collection service.
///
/// Resolver rules depend on it: thread anchoring only applies to
/// [`CollectionKind::Context`], load-more continuity and forward-shift
/// preservation only to [`CollectionKind::Timeline`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    /// Chronological timeline (home, local, federated, hashtag, list)
    Timeline,
    /// A thread: `[ancestors, parent, descendants]`
    Context,
    /// Anything else (notifications, search, account lists)
    #[default]
    Other,
}

impl CollectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKind::Timeline => "timeline",
            CollectionKind::Context => "context",
            CollectionKind::Other => "other",
        }
    }
}

/// Ordered run of items. A snapshot is an ordered list of sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CollectionSection {
    pub items: Vec<CollectionItem>,
    #[serde(default)]
    pub search_scope: Option<SearchScope>,
}

impl CollectionSection {
    pub fn new(items: Vec<CollectionItem>) -> Self {
        Self {
            items,
            search_scope: None,
        }
    }
}

impl From<Vec<CollectionItem>> for CollectionSection {
    fn from(items: Vec<CollectionItem>) -> Self {
        Self::new(items)
    }
}

/// Position of a row inside a snapshot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct IndexPath {
    pub section: usize,
    pub item: usize,
}

impl IndexPath {
    pub fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }
}

/// Immutable snapshot published once per upstream emission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CollectionUpdate {
    pub sections: Vec<CollectionSection>,
    /// Row that must keep its on-screen offset across this update
    pub maintain_scroll_position_item_id: Option<ItemId>,
    /// The thread parent gained siblings; compensate for its size change
    pub should_adjust_content_inset: bool,
}

impl CollectionUpdate {
    /// All items across sections, in display order.
    pub fn items(&self) -> impl Iterator<Item = &CollectionItem> {
        self.sections.iter().flat_map(|section| section.items.iter())
    }

    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|section| section.items.len()).sum()
    }

    pub fn item(&self, index: IndexPath) -> Option<&CollectionItem> {
        self.sections
            .get(index.section)
            .and_then(|section| section.items.get(index.item))
    }

    /// Id of the last item in the final section, used as a pagination
    /// fallback. Load-more rows have no server id and are skipped.
    pub fn last_item_id(&self) -> Option<ItemId> {
        self.sections
            .last()
            .and_then(|section| {
                section
                    .items
                    .iter()
                    .rev()
                    .find(|item| !matches!(item, CollectionItem::LoadMore(_)))
            })
            .map(CollectionItem::item_id)
    }
}

/// Expand/collapse-all toggle for threads.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExpandAllState {
    /// Not a thread; the control is not shown
    #[default]
    Hidden,
    /// Next toggle expands every status
    Expand,
    /// Next toggle collapses every status
    Collapse,
}

/// Search query forwarded to the collection service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Search {
    pub query: String,
    #[serde(default)]
    pub scope: Option<SearchScope>,
    #[serde(default)]
    pub limit: Option<u32>,
}
