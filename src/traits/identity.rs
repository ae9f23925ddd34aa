//! Identity context trait abstraction.

use async_trait::async_trait;

use crate::error::CollectionResult;
use crate::models::{ItemId, Marker, MarkerTimeline, PositionBehavior};

/// Read-only view of the signed-in identity: preferences, local and remote
/// read markers, and bulk status operations.
#[async_trait]
pub trait IdentityContext: Send + Sync {
    /// Position preference for a marker timeline.
    fn position_behavior(&self, timeline: MarkerTimeline) -> PositionBehavior;

    /// Last read id persisted on this device.
    fn local_last_read_id(&self, timeline: MarkerTimeline) -> Option<ItemId>;

    /// Fetch the server-side marker.
    async fn get_marker(&self, timeline: MarkerTimeline) -> CollectionResult<Marker>;

    /// Record the last read id for a timeline.
    ///
    /// Implementations decide where it goes based on
    /// [`IdentityContext::position_behavior`]: the local store for
    /// `RememberPosition`, the server marker for `SyncPosition`.
    async fn set_last_read_id(&self, timeline: MarkerTimeline, id: &str) -> CollectionResult<()>;

    /// Expand spoilers and sensitive media on the given statuses.
    async fn expand_statuses(&self, ids: &[ItemId]) -> CollectionResult<()>;

    /// Collapse the given statuses back to their default presentation.
    async fn collapse_statuses(&self, ids: &[ItemId]) -> CollectionResult<()>;
}
