//! Collection reconciler.
//!
//! Owns the published snapshot, the child view-model cache and the
//! interaction state the scroll-position resolver reads. All mutation goes
//! through `&mut self` on the owning task; fetches, load-more fills and bulk
//! expand/collapse run on spawned tasks and report back through channels.

use std::collections::HashSet;
use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;

use super::read_marker::ReadMarkerCoordinator;
use super::resolver::{should_adjust_content_inset, ResolverContext, ScrollPositionResolver};
use crate::cache::ViewModelCache;
use crate::config::ReconcilerConfig;
use crate::error::{AlertItem, CollectionError, ErrorContext, ResultExt};
use crate::models::{
    min_id, CollectionItem, CollectionKind, CollectionSection, CollectionUpdate, ExpandAllState,
    IndexPath, ItemId, LoadMore, MarkerTimeline, PositionBehavior, Search,
};
use crate::traits::{CollectionService, IdentityContext, NavigationService, SectionStream};
use crate::view_models::{ChildViewModel, CollectionItemEvent, Navigation};

/// Result of background work applied on the owning task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Completion {
    /// Bulk expand/collapse finished; holds the state for the next toggle
    ExpandAll(ExpandAllState),
}

/// How a `request` call reaches the service.
#[derive(Debug)]
enum RequestPlan {
    /// First request of a marker-synced collection
    Marker(MarkerTimeline),
    Direct {
        max_id: Option<ItemId>,
        min_id: Option<ItemId>,
        search: Option<Search>,
    },
}

/// Turns upstream section snapshots into [`CollectionUpdate`]s.
///
/// # Example
///
/// ```ignore
/// let mut reconciler = CollectionReconciler::new(service, identity, navigation, config);
/// let mut updates = reconciler.updates();
///
/// reconciler.request(None, None, None);
/// while reconciler.pump().await {
///     let update = updates.borrow_and_update().clone();
///     render(&update);
/// }
/// ```
pub struct CollectionReconciler {
    service: Arc<dyn CollectionService>,
    identity: Arc<dyn IdentityContext>,
    navigation: Arc<dyn NavigationService>,
    kind: CollectionKind,
    marker_timeline: Option<MarkerTimeline>,
    position_behavior: PositionBehavior,

    cache: ViewModelCache,
    resolver: ScrollPositionResolver,
    read_marker: Option<ReadMarkerCoordinator>,
    sections: Option<SectionStream>,

    last_update: CollectionUpdate,
    last_selected_load_more: Option<LoadMore>,
    top_visible: Option<IndexPath>,
    has_requested_using_marker: bool,
    expand_all_state: ExpandAllState,

    updates_tx: watch::Sender<CollectionUpdate>,
    loading_tx: Arc<watch::Sender<bool>>,
    expand_all_tx: watch::Sender<ExpandAllState>,
    alerts_tx: broadcast::Sender<AlertItem>,
    events_tx: broadcast::Sender<CollectionItemEvent>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
}

impl CollectionReconciler {
    /// Create a reconciler and subscribe to the service's sections.
    pub fn new(
        service: Arc<dyn CollectionService>,
        identity: Arc<dyn IdentityContext>,
        navigation: Arc<dyn NavigationService>,
        config: ReconcilerConfig,
    ) -> Self {
        let kind = service.kind();
        let marker_timeline = service.marker_timeline();
        let position_behavior = marker_timeline
            .map(|timeline| identity.position_behavior(timeline))
            .unwrap_or_default();

        // Nothing to restore without a stored id
        let restore_local_position = position_behavior == PositionBehavior::RememberPosition
            && marker_timeline
                .and_then(|timeline| identity.local_last_read_id(timeline))
                .is_some();

        let (events_tx, _) = broadcast::channel(config.event_capacity);
        let (alerts_tx, _) = broadcast::channel(config.alert_capacity);
        let (updates_tx, _) = watch::channel(CollectionUpdate::default());
        let (loading_tx, _) = watch::channel(false);
        let expand_all_state = match kind {
            CollectionKind::Context => ExpandAllState::Expand,
            _ => ExpandAllState::Hidden,
        };
        let (expand_all_tx, _) = watch::channel(expand_all_state);
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();

        let read_marker = marker_timeline.map(|timeline| {
            ReadMarkerCoordinator::new(Arc::clone(&identity), timeline, config.marker_debounce)
        });

        tracing::debug!(
            kind = ?kind,
            marker_timeline = ?marker_timeline,
            position_behavior = ?position_behavior,
            "Creating collection reconciler"
        );

        Self {
            sections: Some(service.sections()),
            cache: ViewModelCache::new(events_tx.clone(), Arc::clone(&navigation)),
            resolver: ScrollPositionResolver::new(restore_local_position),
            service,
            identity,
            navigation,
            kind,
            marker_timeline,
            position_behavior,
            read_marker,
            last_update: CollectionUpdate::default(),
            last_selected_load_more: None,
            top_visible: None,
            has_requested_using_marker: false,
            expand_all_state,
            updates_tx,
            loading_tx: Arc::new(loading_tx),
            expand_all_tx,
            alerts_tx,
            events_tx,
            completions_tx,
            completions_rx,
        }
    }

    // ------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------

    pub fn updates(&self) -> watch::Receiver<CollectionUpdate> {
        self.updates_tx.subscribe()
    }

    pub fn loading(&self) -> watch::Receiver<bool> {
        self.loading_tx.subscribe()
    }

    pub fn expand_all(&self) -> watch::Receiver<ExpandAllState> {
        self.expand_all_tx.subscribe()
    }

    pub fn alerts(&self) -> broadcast::Receiver<AlertItem> {
        self.alerts_tx.subscribe()
    }

    /// Navigation and child events.
    pub fn events(&self) -> broadcast::Receiver<CollectionItemEvent> {
        self.events_tx.subscribe()
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    pub fn last_update(&self) -> &CollectionUpdate {
        &self.last_update
    }

    pub fn cache(&self) -> &ViewModelCache {
        &self.cache
    }

    pub fn title(&self) -> Option<String> {
        self.service.title()
    }

    pub fn can_refresh(&self) -> bool {
        self.service.can_refresh()
    }

    pub fn expand_all_state(&self) -> ExpandAllState {
        self.expand_all_state
    }

    pub fn last_selected_load_more(&self) -> Option<&LoadMore> {
        self.last_selected_load_more.as_ref()
    }

    /// Cursor for the next older page.
    pub fn next_page_max_id(&self) -> Option<ItemId> {
        if self.service.prefer_last_present_id_over_next_page_max_id() {
            if let Some(id) = self.last_update.last_item_id() {
                return Some(id);
            }
        }
        self.service.next_page_max_id()
    }

    /// Child view-model for the row at `index`, built on first access.
    pub fn view_model(&mut self, index: IndexPath) -> Option<ChildViewModel> {
        let item = self.last_update.item(index)?;
        Some(self.cache.get_or_create(item))
    }

    pub fn can_select(&self, index: IndexPath) -> bool {
        let Some(item) = self.last_update.item(index) else {
            return false;
        };
        match item {
            CollectionItem::Status { configuration, .. } => !configuration.is_context_parent,
            CollectionItem::LoadMore(_) => !self
                .cache
                .get(item)
                .and_then(|vm| vm.as_load_more().map(|lm| lm.is_loading()))
                .unwrap_or(false),
            _ => true,
        }
    }

    // ------------------------------------------------------------------
    // Reconciliation
    // ------------------------------------------------------------------

    /// Apply an upstream snapshot and publish the resulting update.
    pub fn process(&mut self, sections: Vec<CollectionSection>) {
        let load_more_direction = self
            .last_selected_load_more
            .as_ref()
            .and_then(|load_more| self.cache.load_more_direction(load_more));
        let local_last_read_id = self
            .marker_timeline
            .and_then(|timeline| self.identity.local_last_read_id(timeline));

        let context = ResolverContext {
            kind: self.kind,
            local_last_read_id: local_last_read_id.as_deref(),
            last_selected_load_more: self.last_selected_load_more.as_ref(),
            load_more_direction,
            top_visible: self.top_visible,
        };
        let previous = &self.last_update.sections;
        let anchor = self.resolver.resolve(previous, &sections, &context);
        let adjust_inset = should_adjust_content_inset(self.kind, previous, &sections);

        let update = CollectionUpdate {
            sections,
            maintain_scroll_position_item_id: anchor,
            should_adjust_content_inset: adjust_inset,
        };

        self.cache.prune(update.items());

        tracing::debug!(
            items = update.item_count(),
            anchor = ?update.maintain_scroll_position_item_id,
            adjust_inset,
            cached = self.cache.len(),
            "Processed collection update"
        );

        self.last_update = update.clone();
        self.updates_tx.send_replace(update);
    }

    /// Wait for the next upstream snapshot or background completion and
    /// apply it.
    ///
    /// Returns false once the upstream section stream has ended.
    pub async fn pump(&mut self) -> bool {
        let Some(stream) = self.sections.as_mut() else {
            self.apply_completions();
            return false;
        };

        tokio::select! {
            biased;

            Some(completion) = self.completions_rx.recv() => {
                self.apply_completion(completion);
                true
            }
            next = stream.next() => match next {
                Some(sections) => {
                    self.process(sections);
                    true
                }
                None => {
                    tracing::debug!("Upstream sections ended");
                    self.sections = None;
                    self.apply_completions();
                    false
                }
            },
        }
    }

    /// Apply every background completion that has already arrived.
    ///
    /// Returns the number applied.
    pub fn apply_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completions_rx.try_recv() {
            self.apply_completion(completion);
            applied += 1;
        }
        applied
    }

    fn apply_completion(&mut self, completion: Completion) {
        match completion {
            Completion::ExpandAll(next) => {
                tracing::debug!(state = ?next, "Expand-all toggle completed");
                self.expand_all_state = next;
                self.expand_all_tx.send_replace(next);
            }
        }
    }

    // ------------------------------------------------------------------
    // Requests
    // ------------------------------------------------------------------

    /// Fetch a page.
    ///
    /// The first call on a collection whose timeline syncs its position
    /// fetches the server marker and loads around it, then loads the newest
    /// page. Loading is published as true until the whole operation ends
    /// and failures are published as alerts.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn request(
        &mut self,
        max_id: Option<ItemId>,
        min_id: Option<ItemId>,
        search: Option<Search>,
    ) -> JoinHandle<()> {
        let plan = match self.marker_timeline {
            Some(timeline)
                if self.position_behavior == PositionBehavior::SyncPosition
                    && !self.has_requested_using_marker =>
            {
                self.has_requested_using_marker = true;
                RequestPlan::Marker(timeline)
            }
            _ => RequestPlan::Direct {
                max_id: self.effective_max_id(max_id),
                min_id,
                search,
            },
        };

        tracing::debug!(plan = ?plan, "Requesting collection page");

        let service = Arc::clone(&self.service);
        let identity = Arc::clone(&self.identity);
        let loading = Arc::clone(&self.loading_tx);
        let alerts = self.alerts_tx.clone();
        let context = self.error_context("request");

        loading.send_replace(true);

        tokio::spawn(async move {
            match plan {
                RequestPlan::Marker(timeline) => {
                    let anchored = match identity.get_marker(timeline).await {
                        Ok(marker) => service.request(Some(marker.last_read_id), None, None).await,
                        Err(e) => Err(e),
                    };
                    if let Err(e) = anchored.context(context.clone()) {
                        tracing::debug!(
                            error = %e,
                            "Marker request failed, falling back to newest page"
                        );
                        let fallback = service.request(None, None, None).await;
                        if let Err(e) = fallback.context(context.clone()) {
                            publish_alert(&alerts, &e);
                        }
                    }
                    let newest = service.request(None, None, None).await;
                    if let Err(e) = newest.context(context) {
                        publish_alert(&alerts, &e);
                    }
                }
                RequestPlan::Direct {
                    max_id,
                    min_id,
                    search,
                } => {
                    let result = service.request(max_id, min_id, search).await;
                    if let Err(e) = result.context(context) {
                        publish_alert(&alerts, &e);
                    }
                }
            }
            loading.send_replace(false);
        })
    }

    /// Clamp `max_id` to the last present item for collections that
    /// remember their position locally.
    fn effective_max_id(&self, max_id: Option<ItemId>) -> Option<ItemId> {
        let max_id = max_id?;
        if self.position_behavior != PositionBehavior::RememberPosition {
            return Some(max_id);
        }
        match self.last_update.last_item_id() {
            Some(last) => Some(min_id(&max_id, &last).to_string()),
            None => Some(max_id),
        }
    }

    /// Context naming `operation` and the timeline it ran against.
    fn error_context(&self, operation: &str) -> ErrorContext {
        let timeline = self
            .marker_timeline
            .map_or(self.kind.as_str(), |timeline| timeline.as_str());
        ErrorContext::new(operation).with_timeline(timeline)
    }

    // ------------------------------------------------------------------
    // Interaction
    // ------------------------------------------------------------------

    /// Flip between expanding and collapsing every status in a thread.
    ///
    /// Returns `None` when the collection has no expand-all control. The
    /// state flips once the bulk request finishes, even if it failed.
    /// A second toggle issued before that reads the old state again.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn toggle_expand_all(&mut self) -> Option<JoinHandle<()>> {
        let (expand, next) = match self.expand_all_state {
            ExpandAllState::Hidden => return None,
            ExpandAllState::Expand => (true, ExpandAllState::Collapse),
            ExpandAllState::Collapse => (false, ExpandAllState::Expand),
        };
        let ids = self.status_ids();

        tracing::debug!(expand, count = ids.len(), "Toggling expand-all");

        let identity = Arc::clone(&self.identity);
        let alerts = self.alerts_tx.clone();
        let completions = self.completions_tx.clone();
        let context = self.error_context(if expand { "expand_all" } else { "collapse_all" });

        Some(tokio::spawn(async move {
            let result = if expand {
                identity.expand_statuses(&ids).await
            } else {
                identity.collapse_statuses(&ids).await
            };
            if let Err(e) = result.context(context) {
                publish_alert(&alerts, &e);
            }
            // Receiver lives as long as the reconciler
            let _ = completions.send(Completion::ExpandAll(next));
        }))
    }

    /// Unique status ids in display order.
    fn status_ids(&self) -> Vec<ItemId> {
        let mut seen = HashSet::new();
        self.last_update
            .items()
            .filter_map(CollectionItem::status_id)
            .filter(|id| seen.insert(*id))
            .map(str::to_string)
            .collect()
    }

    /// Record the row now at the top of the viewport.
    pub fn viewed_at_top(&mut self, index: IndexPath) {
        self.top_visible = Some(index);

        if self.resolver.is_restoring_local_position() {
            return;
        }
        if let (Some(read_marker), Some(item)) =
            (&self.read_marker, self.last_update.item(index))
        {
            read_marker.record(item.item_id());
        }
    }

    /// Act on a tap on the row at `index`.
    ///
    /// Returns the handle of the spawned fetch when the row is a load-more
    /// gap that was not already loading.
    ///
    /// # Panics
    ///
    /// Panics if a load-more fetch must be spawned outside a Tokio runtime.
    pub fn select(&mut self, index: IndexPath) -> Option<JoinHandle<()>> {
        let item = self.last_update.item(index)?.clone();

        let navigation = match &item {
            CollectionItem::Status { status, .. } => {
                Some(self.navigation.context(&status.display_status().id))
            }
            CollectionItem::LoadMore(load_more) => return self.select_load_more(&item, load_more),
            CollectionItem::Account { account, .. } => Some(self.navigation.profile(account)),
            CollectionItem::Notification { notification, .. } => match &notification.status {
                Some(status) => Some(self.navigation.context(&status.id)),
                None => Some(self.navigation.profile(&notification.account)),
            },
            CollectionItem::Conversation(conversation) => conversation
                .last_status
                .as_ref()
                .map(|status| self.navigation.context(&status.id)),
            CollectionItem::Tag(tag) => Some(self.navigation.tag_timeline(&tag.name)),
            CollectionItem::MoreResults(more) => Some(self.navigation.search_scope(more.scope)),
        };

        if let Some(navigation) = navigation {
            self.send_navigation(navigation);
        }
        None
    }

    fn select_load_more(
        &mut self,
        item: &CollectionItem,
        load_more: &LoadMore,
    ) -> Option<JoinHandle<()>> {
        self.last_selected_load_more = Some(load_more.clone());

        let view_model = self.cache.get_or_create(item);
        let view_model = Arc::clone(view_model.as_load_more()?);
        if !view_model.begin_loading() {
            tracing::debug!(item_id = %item.item_id(), "Load-more already in flight");
            return None;
        }

        let service = Arc::clone(&self.service);
        let alerts = self.alerts_tx.clone();
        let load_more = load_more.clone();
        let direction = view_model.direction();
        let context = self
            .error_context("load_more")
            .with_item_id(item.item_id());

        tracing::debug!(item_id = %item.item_id(), direction = ?direction, "Loading gap");

        Some(tokio::spawn(async move {
            let result = service.load_more(&load_more, direction).await;
            if let Err(e) = result.context(context) {
                publish_alert(&alerts, &e);
            }
            view_model.finish_loading();
        }))
    }

    fn send_navigation(&self, navigation: Navigation) {
        if self
            .events_tx
            .send(CollectionItemEvent::Navigation(navigation))
            .is_err()
        {
            tracing::trace!("No event listeners for navigation");
        }
    }
}

impl std::fmt::Debug for CollectionReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionReconciler")
            .field("kind", &self.kind)
            .field("marker_timeline", &self.marker_timeline)
            .field("position_behavior", &self.position_behavior)
            .field("items", &self.last_update.item_count())
            .field("cache", &self.cache)
            .field("expand_all_state", &self.expand_all_state)
            .finish()
    }
}

fn publish_alert(alerts: &broadcast::Sender<AlertItem>, error: &CollectionError) {
    tracing::warn!(
        error_code = error.error_code(),
        category = error.category().as_str(),
        context = error.context().map(ErrorContext::to_log_string),
        error = %error,
        "Collection operation failed"
    );
    if alerts.send(AlertItem::from(error)).is_err() {
        tracing::trace!("No alert listeners");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{InMemoryIdentity, MockCollectionService};
    use crate::adapters::DefaultNavigation;
    use crate::models::{Account, Status};

    fn status(id: &str) -> CollectionItem {
        CollectionItem::status(Status::new(id, Account::new("a", "alice"), "text"))
    }

    fn reconciler(
        service: MockCollectionService,
        identity: InMemoryIdentity,
    ) -> CollectionReconciler {
        CollectionReconciler::new(
            Arc::new(service),
            Arc::new(identity),
            Arc::new(DefaultNavigation),
            ReconcilerConfig::default(),
        )
    }

    #[test]
    fn test_max_id_clamped_when_remembering_position() {
        let service = MockCollectionService::new(CollectionKind::Timeline)
            .with_marker_timeline(MarkerTimeline::Home);
        let identity = InMemoryIdentity::new()
            .with_position_behavior(MarkerTimeline::Home, PositionBehavior::RememberPosition);
        let mut reconciler = reconciler(service, identity);
        reconciler.process(vec![CollectionSection::new(vec![status("70"), status("50")])]);

        assert_eq!(
            reconciler.effective_max_id(Some("80".to_string())),
            Some("50".to_string())
        );
        assert_eq!(
            reconciler.effective_max_id(Some("40".to_string())),
            Some("40".to_string())
        );
        assert_eq!(reconciler.effective_max_id(None), None);
    }

    #[test]
    fn test_max_id_clamp_skips_trailing_load_more() {
        let service = MockCollectionService::new(CollectionKind::Timeline)
            .with_marker_timeline(MarkerTimeline::Home);
        let identity = InMemoryIdentity::new()
            .with_position_behavior(MarkerTimeline::Home, PositionBehavior::RememberPosition);
        let mut reconciler = reconciler(service, identity);
        reconciler.process(vec![CollectionSection::new(vec![
            status("100"),
            status("50"),
            CollectionItem::LoadMore(LoadMore::new("home", "50", "10")),
        ])]);

        assert_eq!(
            reconciler.effective_max_id(Some("80".to_string())),
            Some("50".to_string())
        );
    }

    #[test]
    fn test_max_id_untouched_without_remember_position() {
        let service = MockCollectionService::new(CollectionKind::Timeline)
            .with_marker_timeline(MarkerTimeline::Home);
        let mut reconciler = reconciler(service, InMemoryIdentity::new());
        reconciler.process(vec![CollectionSection::new(vec![status("50")])]);

        assert_eq!(
            reconciler.effective_max_id(Some("80".to_string())),
            Some("80".to_string())
        );
    }

    #[test]
    fn test_status_ids_are_unique_in_order() {
        let service = MockCollectionService::new(CollectionKind::Context);
        let mut reconciler = reconciler(service, InMemoryIdentity::new());
        reconciler.process(vec![
            CollectionSection::new(vec![status("1"), status("2")]),
            CollectionSection::new(vec![status("2"), status("3")]),
        ]);

        assert_eq!(reconciler.status_ids(), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_expand_all_hidden_outside_context() {
        let service = MockCollectionService::new(CollectionKind::Timeline);
        let mut reconciler = reconciler(service, InMemoryIdentity::new());

        assert_eq!(reconciler.expand_all_state(), ExpandAllState::Hidden);
        assert!(reconciler.toggle_expand_all().is_none());
    }

    #[test]
    fn test_next_page_prefers_last_present_id() {
        let service = MockCollectionService::new(CollectionKind::Other)
            .with_next_page_max_id("999")
            .with_prefer_last_present_id(true);
        let mut reconciler = reconciler(service, InMemoryIdentity::new());

        // Nothing present yet, fall back to the cursor
        assert_eq!(reconciler.next_page_max_id(), Some("999".to_string()));

        reconciler.process(vec![CollectionSection::new(vec![status("7"), status("3")])]);
        assert_eq!(reconciler.next_page_max_id(), Some("3".to_string()));

        reconciler.process(vec![CollectionSection::new(vec![
            status("7"),
            status("3"),
            CollectionItem::LoadMore(LoadMore::new("home", "3", "1")),
        ])]);
        assert_eq!(reconciler.next_page_max_id(), Some("3".to_string()));
    }

    #[test]
    fn test_can_select_out_of_range() {
        let service = MockCollectionService::new(CollectionKind::Timeline);
        let reconciler = reconciler(service, InMemoryIdentity::new());
        assert!(!reconciler.can_select(IndexPath::new(0, 0)));
    }
}
