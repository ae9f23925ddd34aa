//! Mock collection service for testing.
//!
//! Section snapshots are pushed by the test with [`MockCollectionService::emit`]
//! and every fetch is recorded for verification.

use async_trait::async_trait;
use futures::channel::mpsc;
use futures::StreamExt;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::error::CollectionResult;
use crate::models::{
    CollectionKind, CollectionSection, ItemId, LoadMore, LoadMoreDirection, MarkerTimeline,
    Search,
};
use crate::traits::{CollectionService, SectionStream};
use crate::view_models::lock;

/// A recorded `request` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub max_id: Option<ItemId>,
    pub min_id: Option<ItemId>,
    pub search: Option<Search>,
}

impl RecordedRequest {
    /// A request with no cursor and no search.
    pub fn unanchored() -> Self {
        Self {
            max_id: None,
            min_id: None,
            search: None,
        }
    }

    pub fn with_max_id(max_id: impl Into<ItemId>) -> Self {
        Self {
            max_id: Some(max_id.into()),
            ..Self::unanchored()
        }
    }
}

/// Mock collection service for testing.
///
/// # Example
///
/// ```ignore
/// use tootview::adapters::mock::MockCollectionService;
/// use tootview::models::{CollectionKind, CollectionSection};
///
/// let service = MockCollectionService::new(CollectionKind::Timeline);
/// let mut sections = service.sections();
///
/// service.emit(vec![CollectionSection::default()]);
/// assert!(sections.next().await.is_some());
///
/// service.request(None, None, None).await?;
/// assert_eq!(service.requests().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockCollectionService {
    kind: CollectionKind,
    marker_timeline: Option<MarkerTimeline>,
    next_page_max_id: Option<ItemId>,
    prefer_last_present_id: bool,
    can_refresh: bool,
    title: Option<String>,
    /// Open section streams
    subscribers: Arc<Mutex<Vec<mpsc::UnboundedSender<Vec<CollectionSection>>>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    /// Results handed out to requests in order; `Ok(())` once empty
    request_results: Arc<Mutex<VecDeque<CollectionResult<()>>>>,
    /// Recorded load-more fills
    load_more_calls: Arc<Mutex<Vec<(LoadMore, LoadMoreDirection)>>>,
    load_more_results: Arc<Mutex<VecDeque<CollectionResult<()>>>>,
}

impl MockCollectionService {
    pub fn new(kind: CollectionKind) -> Self {
        Self {
            kind,
            marker_timeline: None,
            next_page_max_id: None,
            prefer_last_present_id: false,
            can_refresh: true,
            title: None,
            subscribers: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            request_results: Arc::new(Mutex::new(VecDeque::new())),
            load_more_calls: Arc::new(Mutex::new(Vec::new())),
            load_more_results: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    pub fn with_marker_timeline(mut self, timeline: MarkerTimeline) -> Self {
        self.marker_timeline = Some(timeline);
        self
    }

    pub fn with_next_page_max_id(mut self, id: impl Into<ItemId>) -> Self {
        self.next_page_max_id = Some(id.into());
        self
    }

    pub fn with_prefer_last_present_id(mut self, prefer: bool) -> Self {
        self.prefer_last_present_id = prefer;
        self
    }

    pub fn with_can_refresh(mut self, can_refresh: bool) -> Self {
        self.can_refresh = can_refresh;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Push a snapshot to every open section stream.
    pub fn emit(&self, sections: Vec<CollectionSection>) {
        let mut subscribers = lock(&self.subscribers);
        subscribers.retain(|tx| tx.unbounded_send(sections.clone()).is_ok());
    }

    /// End every open section stream.
    pub fn close(&self) {
        lock(&self.subscribers).clear();
    }

    /// Queue the result of the next `request` call.
    pub fn queue_request_result(&self, result: CollectionResult<()>) {
        lock(&self.request_results).push_back(result);
    }

    /// Queue the result of the next `load_more` call.
    pub fn queue_load_more_result(&self, result: CollectionResult<()>) {
        lock(&self.load_more_results).push_back(result);
    }

    /// Get all recorded requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    pub fn load_more_calls(&self) -> Vec<(LoadMore, LoadMoreDirection)> {
        lock(&self.load_more_calls).clone()
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.subscribers).len()
    }
}

#[async_trait]
impl CollectionService for MockCollectionService {
    fn kind(&self) -> CollectionKind {
        self.kind
    }

    fn sections(&self) -> SectionStream {
        let (tx, rx) = mpsc::unbounded();
        lock(&self.subscribers).push(tx);
        rx.boxed()
    }

    fn next_page_max_id(&self) -> Option<ItemId> {
        self.next_page_max_id.clone()
    }

    fn can_refresh(&self) -> bool {
        self.can_refresh
    }

    fn marker_timeline(&self) -> Option<MarkerTimeline> {
        self.marker_timeline
    }

    fn prefer_last_present_id_over_next_page_max_id(&self) -> bool {
        self.prefer_last_present_id
    }

    fn title(&self) -> Option<String> {
        self.title.clone()
    }

    async fn request(
        &self,
        max_id: Option<ItemId>,
        min_id: Option<ItemId>,
        search: Option<Search>,
    ) -> CollectionResult<()> {
        lock(&self.requests).push(RecordedRequest {
            max_id,
            min_id,
            search,
        });
        lock(&self.request_results).pop_front().unwrap_or(Ok(()))
    }

    async fn load_more(
        &self,
        load_more: &LoadMore,
        direction: LoadMoreDirection,
    ) -> CollectionResult<()> {
        lock(&self.load_more_calls).push((load_more.clone(), direction));
        lock(&self.load_more_results).pop_front().unwrap_or(Ok(()))
    }
}
