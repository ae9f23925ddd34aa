//! In-memory identity context for testing.
//!
//! Holds position preferences, local read ids and server markers in memory
//! and records every write and bulk status action.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{CollectionError, CollectionResult};
use crate::models::{ItemId, Marker, MarkerTimeline, PositionBehavior};
use crate::traits::IdentityContext;
use crate::view_models::lock;

/// A recorded bulk status action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusAction {
    Expand(Vec<ItemId>),
    Collapse(Vec<ItemId>),
}

/// In-memory identity context for testing.
///
/// `set_last_read_id` follows the timeline's [`PositionBehavior`]: the id
/// goes to the local store for `RememberPosition`, to the server marker for
/// `SyncPosition` and nowhere for `Disabled`.
///
/// # Example
///
/// ```ignore
/// use tootview::adapters::mock::InMemoryIdentity;
/// use tootview::models::{Marker, MarkerTimeline, PositionBehavior};
///
/// let identity = InMemoryIdentity::new()
///     .with_position_behavior(MarkerTimeline::Home, PositionBehavior::SyncPosition)
///     .with_marker(MarkerTimeline::Home, Marker::new("100"));
///
/// identity.set_last_read_id(MarkerTimeline::Home, "120").await?;
/// assert_eq!(identity.get_marker(MarkerTimeline::Home).await?.last_read_id, "120");
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentity {
    behaviors: Arc<Mutex<HashMap<MarkerTimeline, PositionBehavior>>>,
    local_last_read_ids: Arc<Mutex<HashMap<MarkerTimeline, ItemId>>>,
    markers: Arc<Mutex<HashMap<MarkerTimeline, Marker>>>,
    /// Error returned by `get_marker` instead of the stored marker
    marker_error: Arc<Mutex<Option<CollectionError>>>,
    /// Error returned by every `set_last_read_id` call
    set_last_read_id_error: Arc<Mutex<Option<CollectionError>>>,
    /// Error returned by bulk status actions
    status_action_error: Arc<Mutex<Option<CollectionError>>>,
    /// Successful `set_last_read_id` calls
    recorded_last_read_ids: Arc<Mutex<Vec<(MarkerTimeline, ItemId)>>>,
    set_last_read_id_attempts: Arc<Mutex<usize>>,
    marker_fetches: Arc<Mutex<Vec<MarkerTimeline>>>,
    status_actions: Arc<Mutex<Vec<StatusAction>>>,
}

impl InMemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_position_behavior(
        self,
        timeline: MarkerTimeline,
        behavior: PositionBehavior,
    ) -> Self {
        lock(&self.behaviors).insert(timeline, behavior);
        self
    }

    pub fn with_local_last_read_id(self, timeline: MarkerTimeline, id: impl Into<ItemId>) -> Self {
        lock(&self.local_last_read_ids).insert(timeline, id.into());
        self
    }

    pub fn with_marker(self, timeline: MarkerTimeline, marker: Marker) -> Self {
        lock(&self.markers).insert(timeline, marker);
        self
    }

    pub fn with_marker_error(self, error: CollectionError) -> Self {
        *lock(&self.marker_error) = Some(error);
        self
    }

    pub fn with_set_last_read_id_error(self, error: CollectionError) -> Self {
        *lock(&self.set_last_read_id_error) = Some(error);
        self
    }

    pub fn with_status_action_error(self, error: CollectionError) -> Self {
        *lock(&self.status_action_error) = Some(error);
        self
    }

    /// Ids written successfully, in call order.
    pub fn recorded_last_read_ids(&self) -> Vec<(MarkerTimeline, ItemId)> {
        lock(&self.recorded_last_read_ids).clone()
    }

    /// All `set_last_read_id` calls, including failed ones.
    pub fn set_last_read_id_attempts(&self) -> usize {
        *lock(&self.set_last_read_id_attempts)
    }

    pub fn marker_fetches(&self) -> Vec<MarkerTimeline> {
        lock(&self.marker_fetches).clone()
    }

    pub fn status_actions(&self) -> Vec<StatusAction> {
        lock(&self.status_actions).clone()
    }

    /// Stored server marker, if any.
    pub fn marker(&self, timeline: MarkerTimeline) -> Option<Marker> {
        lock(&self.markers).get(&timeline).cloned()
    }

    fn record_status_action(&self, action: StatusAction) -> CollectionResult<()> {
        lock(&self.status_actions).push(action);
        match lock(&self.status_action_error).clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl IdentityContext for InMemoryIdentity {
    fn position_behavior(&self, timeline: MarkerTimeline) -> PositionBehavior {
        lock(&self.behaviors)
            .get(&timeline)
            .copied()
            .unwrap_or_default()
    }

    fn local_last_read_id(&self, timeline: MarkerTimeline) -> Option<ItemId> {
        lock(&self.local_last_read_ids).get(&timeline).cloned()
    }

    async fn get_marker(&self, timeline: MarkerTimeline) -> CollectionResult<Marker> {
        lock(&self.marker_fetches).push(timeline);
        if let Some(error) = lock(&self.marker_error).clone() {
            return Err(error);
        }
        lock(&self.markers)
            .get(&timeline)
            .cloned()
            .ok_or(CollectionError::MarkerUnavailable { timeline })
    }

    async fn set_last_read_id(&self, timeline: MarkerTimeline, id: &str) -> CollectionResult<()> {
        *lock(&self.set_last_read_id_attempts) += 1;
        if let Some(error) = lock(&self.set_last_read_id_error).clone() {
            return Err(error);
        }

        match self.position_behavior(timeline) {
            PositionBehavior::RememberPosition => {
                lock(&self.local_last_read_ids).insert(timeline, id.to_string());
            }
            PositionBehavior::SyncPosition => {
                let mut markers = lock(&self.markers);
                let version = markers.get(&timeline).map_or(0, |m| m.version + 1);
                let mut marker = Marker::new(id);
                marker.version = version;
                markers.insert(timeline, marker);
            }
            PositionBehavior::Disabled => return Ok(()),
        }
        lock(&self.recorded_last_read_ids).push((timeline, id.to_string()));
        Ok(())
    }

    async fn expand_statuses(&self, ids: &[ItemId]) -> CollectionResult<()> {
        self.record_status_action(StatusAction::Expand(ids.to_vec()))
    }

    async fn collapse_statuses(&self, ids: &[ItemId]) -> CollectionResult<()> {
        self.record_status_action(StatusAction::Collapse(ids.to_vec()))
    }
}
