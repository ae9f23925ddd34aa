//! Read-marker synchronization with deduplication and debouncing.
//!
//! Ids of rows scrolled to the top of the viewport arrive in bursts. The
//! coordinator drops consecutive repeats, waits for the stream to go quiet
//! for the debounce window, then records the last id through
//! [`IdentityContext::set_last_read_id`]. Failures are logged and dropped;
//! the marker is only a convenience.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::models::{ItemId, MarkerTimeline};
use crate::traits::IdentityContext;

pub struct ReadMarkerCoordinator {
    timeline: MarkerTimeline,
    tx: mpsc::UnboundedSender<ItemId>,
    task: Option<JoinHandle<()>>,
}

impl ReadMarkerCoordinator {
    /// Start the coordinator for `timeline`.
    ///
    /// Outside a tokio runtime no task is spawned and recorded ids are
    /// discarded.
    pub fn new(
        identity: Arc<dyn IdentityContext>,
        timeline: MarkerTimeline,
        debounce: Duration,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        // Guard: only spawn if a tokio runtime is available
        let task = match tokio::runtime::Handle::try_current() {
            Ok(handle) => Some(handle.spawn(run(rx, identity, timeline, debounce))),
            Err(_) => {
                tracing::debug!(timeline = %timeline, "No runtime, read markers disabled");
                None
            }
        };

        Self { timeline, tx, task }
    }

    pub fn timeline(&self) -> MarkerTimeline {
        self.timeline
    }

    /// Queue the id of the row now at the top of the viewport.
    pub fn record(&self, id: ItemId) {
        if self.tx.send(id).is_err() {
            tracing::trace!(timeline = %self.timeline, "Read marker task not running");
        }
    }
}

impl Drop for ReadMarkerCoordinator {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl std::fmt::Debug for ReadMarkerCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadMarkerCoordinator")
            .field("timeline", &self.timeline)
            .field("running", &self.task.is_some())
            .finish()
    }
}

async fn run(
    mut rx: mpsc::UnboundedReceiver<ItemId>,
    identity: Arc<dyn IdentityContext>,
    timeline: MarkerTimeline,
    debounce: Duration,
) {
    let mut last_received: Option<ItemId> = None;
    let mut pending: Option<(ItemId, Instant)> = None;

    loop {
        let deadline = pending.as_ref().map(|(_, deadline)| *deadline);
        let received = match deadline {
            Some(deadline) => match tokio::time::timeout_at(deadline, rx.recv()).await {
                Ok(received) => received,
                Err(_) => {
                    // Quiet for the whole window
                    if let Some((id, _)) = pending.take() {
                        sync(identity.as_ref(), timeline, &id).await;
                    }
                    continue;
                }
            },
            None => rx.recv().await,
        };

        let Some(id) = received else {
            if let Some((id, _)) = pending.take() {
                sync(identity.as_ref(), timeline, &id).await;
            }
            break;
        };

        // Consecutive repeats neither emit nor restart the window
        if last_received.as_deref() == Some(id.as_str()) {
            continue;
        }
        last_received = Some(id.clone());
        pending = Some((id, Instant::now() + debounce));
    }
}

async fn sync(identity: &dyn IdentityContext, timeline: MarkerTimeline, id: &str) {
    tracing::debug!(timeline = %timeline, item_id = %id, "Syncing read marker after debounce");
    if let Err(e) = identity.set_last_read_id(timeline, id).await {
        tracing::debug!(
            timeline = %timeline,
            item_id = %id,
            error = %e,
            "Read marker sync failed (ignored)"
        );
    }
}
