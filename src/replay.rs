//! JSON-driven replay of a collection session.
//!
//! A script names the collection kind and the user's position preferences,
//! then lists steps: upstream snapshots and user interactions. Each step is
//! pushed through a [`CollectionReconciler`] wired to the in-memory
//! collaborators, and everything the reconciler publishes is collected as
//! [`ReplayOutput`] values.
//!
//! ```json
//! {
//!   "kind": "timeline",
//!   "marker_timeline": "home",
//!   "position_behavior": "remember_position",
//!   "steps": [
//!     { "step": "emit", "sections": [{ "items": [] }] },
//!     { "step": "viewed_at_top", "section": 0, "item": 0 }
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;

use crate::adapters::mock::{InMemoryIdentity, MockCollectionService};
use crate::adapters::DefaultNavigation;
use crate::collection::CollectionReconciler;
use crate::config::ReconcilerConfig;
use crate::error::AlertItem;
use crate::models::{
    CollectionKind, CollectionSection, CollectionUpdate, ExpandAllState, IndexPath, ItemId,
    LoadMoreDirection, Marker, MarkerTimeline, PositionBehavior,
};
use crate::view_models::CollectionItemEvent;

/// Error type for replay scripts.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Script file could not be read
    #[error("Failed to read replay script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Script is not valid JSON for a [`ReplayScript`]
    #[error("Invalid replay script: {0}")]
    Parse(#[from] serde_json::Error),

    /// A step points at a row that is not in the current snapshot
    #[error("Step {step}: no item at section {section}, item {item}")]
    InvalidIndex {
        step: usize,
        section: usize,
        item: usize,
    },

    /// A direction was set on a row that is not a load-more gap
    #[error("Step {step}: item at section {section}, item {item} is not a load-more")]
    NotLoadMore {
        step: usize,
        section: usize,
        item: usize,
    },

    /// A background task panicked or was cancelled
    #[error("Step {step}: background task failed: {message}")]
    Task { step: usize, message: String },
}

/// A replay session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ReplayScript {
    #[serde(default)]
    pub kind: CollectionKind,
    #[serde(default)]
    pub marker_timeline: Option<MarkerTimeline>,
    #[serde(default)]
    pub position_behavior: PositionBehavior,
    /// Last read id stored on this device
    #[serde(default)]
    pub local_last_read_id: Option<ItemId>,
    /// Last read id held by the server marker
    #[serde(default)]
    pub marker_last_read_id: Option<ItemId>,
    #[serde(default)]
    pub steps: Vec<ReplayStep>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ReplayStep {
    /// Upstream emits a snapshot
    Emit { sections: Vec<CollectionSection> },
    /// Fetch a page
    Request {
        #[serde(default)]
        max_id: Option<ItemId>,
        #[serde(default)]
        min_id: Option<ItemId>,
    },
    ViewedAtTop { section: usize, item: usize },
    Select { section: usize, item: usize },
    SetLoadMoreDirection {
        section: usize,
        item: usize,
        direction: LoadMoreDirection,
    },
    ToggleExpandAll,
}

/// Something the reconciler published while replaying.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "output", rename_all = "snake_case")]
pub enum ReplayOutput {
    Update(CollectionUpdate),
    Event(CollectionItemEvent),
    Alert(AlertItem),
    ExpandAll { state: ExpandAllState },
}

impl ReplayScript {
    /// Read and parse a script file.
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn identity(&self) -> InMemoryIdentity {
        let mut identity = InMemoryIdentity::new();
        if let Some(timeline) = self.marker_timeline {
            identity = identity.with_position_behavior(timeline, self.position_behavior);
            if let Some(id) = &self.local_last_read_id {
                identity = identity.with_local_last_read_id(timeline, id.clone());
            }
            if let Some(id) = &self.marker_last_read_id {
                identity = identity.with_marker(timeline, Marker::new(id.clone()));
            }
        }
        identity
    }

    fn service(&self) -> MockCollectionService {
        let service = MockCollectionService::new(self.kind);
        match self.marker_timeline {
            Some(timeline) => service.with_marker_timeline(timeline),
            None => service,
        }
    }
}

/// Run every step of `script` and collect the published outputs.
pub async fn run(
    script: &ReplayScript,
    config: ReconcilerConfig,
) -> Result<Vec<ReplayOutput>, ReplayError> {
    let service = script.service();
    let mut reconciler = CollectionReconciler::new(
        Arc::new(service.clone()),
        Arc::new(script.identity()),
        Arc::new(DefaultNavigation),
        config,
    );
    let mut events = reconciler.events();
    let mut alerts = reconciler.alerts();
    let mut outputs = Vec::new();

    for (step_index, step) in script.steps.iter().enumerate() {
        tracing::debug!(step = step_index, "Replaying step");
        let index_error = |section, item| ReplayError::InvalidIndex {
            step: step_index,
            section,
            item,
        };

        match step {
            ReplayStep::Emit { sections } => {
                service.emit(sections.clone());
                if reconciler.pump().await {
                    outputs.push(ReplayOutput::Update(reconciler.last_update().clone()));
                }
            }
            ReplayStep::Request { max_id, min_id } => {
                let handle = reconciler.request(max_id.clone(), min_id.clone(), None);
                join(step_index, handle).await?;
            }
            ReplayStep::ViewedAtTop { section, item } => {
                let index = IndexPath::new(*section, *item);
                if reconciler.last_update().item(index).is_none() {
                    return Err(index_error(*section, *item));
                }
                reconciler.viewed_at_top(index);
            }
            ReplayStep::Select { section, item } => {
                let index = IndexPath::new(*section, *item);
                if reconciler.last_update().item(index).is_none() {
                    return Err(index_error(*section, *item));
                }
                if let Some(handle) = reconciler.select(index) {
                    join(step_index, handle).await?;
                }
            }
            ReplayStep::SetLoadMoreDirection {
                section,
                item,
                direction,
            } => {
                let view_model = reconciler
                    .view_model(IndexPath::new(*section, *item))
                    .ok_or_else(|| index_error(*section, *item))?;
                let load_more = view_model.as_load_more().ok_or(ReplayError::NotLoadMore {
                    step: step_index,
                    section: *section,
                    item: *item,
                })?;
                load_more.set_direction(*direction);
            }
            ReplayStep::ToggleExpandAll => {
                if let Some(handle) = reconciler.toggle_expand_all() {
                    join(step_index, handle).await?;
                    reconciler.apply_completions();
                    outputs.push(ReplayOutput::ExpandAll {
                        state: reconciler.expand_all_state(),
                    });
                }
            }
        }

        drain(&mut events, &mut outputs, ReplayOutput::Event);
        drain(&mut alerts, &mut outputs, ReplayOutput::Alert);
    }

    Ok(outputs)
}

async fn join(step: usize, handle: tokio::task::JoinHandle<()>) -> Result<(), ReplayError> {
    handle.await.map_err(|e| ReplayError::Task {
        step,
        message: e.to_string(),
    })
}

fn drain<T: Clone>(
    rx: &mut broadcast::Receiver<T>,
    outputs: &mut Vec<ReplayOutput>,
    wrap: fn(T) -> ReplayOutput,
) {
    loop {
        match rx.try_recv() {
            Ok(value) => outputs.push(wrap(value)),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Replay output lagged");
            }
            Err(_) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, CollectionItem, Status};

    fn status(id: &str) -> CollectionItem {
        CollectionItem::status(Status::new(id, Account::new("a", "alice"), "text"))
    }

    #[test]
    fn test_script_defaults() {
        let script: ReplayScript = serde_json::from_str("{}").unwrap();
        assert_eq!(script.kind, CollectionKind::Other);
        assert!(script.steps.is_empty());
    }

    #[test]
    fn test_step_tags() {
        let step: ReplayStep =
            serde_json::from_str(r#"{"step": "viewed_at_top", "section": 0, "item": 2}"#).unwrap();
        assert_eq!(step, ReplayStep::ViewedAtTop { section: 0, item: 2 });

        let step: ReplayStep = serde_json::from_str(r#"{"step": "toggle_expand_all"}"#).unwrap();
        assert_eq!(step, ReplayStep::ToggleExpandAll);
    }

    #[tokio::test]
    async fn test_emit_produces_update() {
        let script = ReplayScript {
            kind: CollectionKind::Timeline,
            steps: vec![ReplayStep::Emit {
                sections: vec![CollectionSection::new(vec![status("2"), status("1")])],
            }],
            ..ReplayScript::default()
        };

        let outputs = run(&script, ReconcilerConfig::default()).await.unwrap();
        assert_eq!(outputs.len(), 1);
        match &outputs[0] {
            ReplayOutput::Update(update) => assert_eq!(update.item_count(), 2),
            other => panic!("unexpected output: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_select_status_emits_navigation() {
        let script = ReplayScript {
            kind: CollectionKind::Timeline,
            steps: vec![
                ReplayStep::Emit {
                    sections: vec![CollectionSection::new(vec![status("2")])],
                },
                ReplayStep::Select { section: 0, item: 0 },
            ],
            ..ReplayScript::default()
        };

        let outputs = run(&script, ReconcilerConfig::default()).await.unwrap();
        assert!(outputs.iter().any(|output| matches!(
            output,
            ReplayOutput::Event(CollectionItemEvent::Navigation(_))
        )));
    }

    #[tokio::test]
    async fn test_invalid_index_is_reported() {
        let script = ReplayScript {
            steps: vec![ReplayStep::Select { section: 3, item: 0 }],
            ..ReplayScript::default()
        };

        let err = run(&script, ReconcilerConfig::default()).await.unwrap_err();
        assert!(matches!(
            err,
            ReplayError::InvalidIndex {
                step: 0,
                section: 3,
                item: 0
            }
        ));
    }
}
