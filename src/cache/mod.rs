//! Child view-model cache
//!
//! Memoizes one child view-model per row identity so a reloaded collection
//! hands the view layer the same objects it already holds, and prunes the
//! children whose rows disappeared.

mod key;

pub use key::CacheKey;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::broadcast;

use crate::models::{CollectionItem, LoadMore, LoadMoreDirection};
use crate::traits::NavigationService;
use crate::view_models::{ChildViewModel, CollectionItemEvent, ForwardingSubscription};

struct CacheEntry {
    view_model: ChildViewModel,
    // Dropping the entry releases the child's event forwarding.
    _subscription: ForwardingSubscription,
}

/// Cache of child view-models keyed by [`CacheKey`].
pub struct ViewModelCache {
    entries: HashMap<CacheKey, CacheEntry>,
    events: broadcast::Sender<CollectionItemEvent>,
    navigation: Arc<dyn NavigationService>,
    /// Statistics: reused children
    hits: u64,
    /// Statistics: built children
    misses: u64,
}

impl ViewModelCache {
    /// Create an empty cache whose children forward events into `events`.
    pub fn new(
        events: broadcast::Sender<CollectionItemEvent>,
        navigation: Arc<dyn NavigationService>,
    ) -> Self {
        Self {
            entries: HashMap::new(),
            events,
            navigation,
            hits: 0,
            misses: 0,
        }
    }

    /// Get the child for `item`, building and caching it on first access.
    ///
    /// A reused status child has its payload and configuration overwritten
    /// with the values carried by `item`.
    pub fn get_or_create(&mut self, item: &CollectionItem) -> ChildViewModel {
        let key = CacheKey::for_item(item);

        if let Some(entry) = self.entries.get(&key) {
            self.hits += 1;
            entry.view_model.refresh(item);
            return entry.view_model.clone();
        }

        self.misses += 1;
        let (subscription, forwarder) = ForwardingSubscription::new(self.events.clone());
        let view_model = ChildViewModel::build(item, forwarder, Arc::clone(&self.navigation));
        tracing::trace!(
            kind = item.kind().as_str(),
            item_id = %key.item_id,
            "Built child view-model"
        );
        self.entries.insert(
            key,
            CacheEntry {
                view_model: view_model.clone(),
                _subscription: subscription,
            },
        );
        view_model
    }

    /// Get the cached child for `item` without building one.
    pub fn get(&self, item: &CollectionItem) -> Option<ChildViewModel> {
        self.entries
            .get(&CacheKey::for_item(item))
            .map(|entry| entry.view_model.clone())
    }

    pub fn contains(&self, item: &CollectionItem) -> bool {
        self.entries.contains_key(&CacheKey::for_item(item))
    }

    /// Drop every child whose key is not produced by any of `items`.
    ///
    /// Returns the number of children removed.
    pub fn prune<'a>(&mut self, items: impl IntoIterator<Item = &'a CollectionItem>) -> usize {
        let live: HashSet<CacheKey> = items.into_iter().map(CacheKey::for_item).collect();
        let before = self.entries.len();
        self.entries.retain(|key, _| live.contains(key));
        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::debug!(removed, remaining = self.entries.len(), "Pruned child view-models");
        }
        removed
    }

    /// Direction the view last set on the cached child for `load_more`.
    pub fn load_more_direction(&self, load_more: &LoadMore) -> Option<LoadMoreDirection> {
        self.get(&CollectionItem::LoadMore(load_more.clone()))
            .and_then(|vm| vm.as_load_more().map(|lm| lm.direction()))
    }

    /// Get cache statistics (hits, misses)
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ViewModelCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewModelCache")
            .field("len", &self.entries.len())
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .finish()
    }
}
