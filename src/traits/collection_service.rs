//! Collection service trait abstraction.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::CollectionResult;
use crate::models::{
    CollectionKind, CollectionSection, ItemId, LoadMore, LoadMoreDirection, MarkerTimeline,
    Search,
};

/// Stream of ordered section snapshots emitted by a collection service.
pub type SectionStream = BoxStream<'static, Vec<CollectionSection>>;

/// A paginated, server-driven collection (timeline, thread, notifications,
/// search results).
///
/// Fetch operations do not return data. Results arrive as new snapshots on
/// the stream returned by [`CollectionService::sections`].
///
/// # Example
///
/// ```ignore
/// use tootview::traits::CollectionService;
///
/// async fn refresh<S: CollectionService>(service: &S) {
///     if service.can_refresh() {
///         let _ = service.request(None, None, None).await;
///     }
/// }
/// ```
#[async_trait]
pub trait CollectionService: Send + Sync {
    /// Capability tag used by the scroll-position resolver.
    fn kind(&self) -> CollectionKind;

    /// Subscribe to section snapshots.
    ///
    /// Each call returns an independent stream that receives every snapshot
    /// emitted after subscription.
    fn sections(&self) -> SectionStream;

    /// Cursor for the next (older) page, if any.
    fn next_page_max_id(&self) -> Option<ItemId>;

    /// Whether pull-to-refresh is meaningful for this collection.
    fn can_refresh(&self) -> bool;

    /// Marker timeline this collection keeps a read position for.
    fn marker_timeline(&self) -> Option<MarkerTimeline>;

    /// Page with the id of the last present item instead of
    /// [`CollectionService::next_page_max_id`].
    fn prefer_last_present_id_over_next_page_max_id(&self) -> bool;

    /// Display title.
    fn title(&self) -> Option<String> {
        None
    }

    /// Fetch a page.
    async fn request(
        &self,
        max_id: Option<ItemId>,
        min_id: Option<ItemId>,
        search: Option<Search>,
    ) -> CollectionResult<()>;

    /// Fill a pagination gap from one of its edges.
    async fn load_more(
        &self,
        load_more: &LoadMore,
        direction: LoadMoreDirection,
    ) -> CollectionResult<()>;
}
