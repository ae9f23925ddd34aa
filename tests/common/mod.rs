//! Shared test utilities for integration tests.
//!
//! [`Harness`] wires a [`CollectionReconciler`] to the in-memory service and
//! identity so a test can emit snapshots and inspect what was published.

#![allow(dead_code)]

pub mod fixtures;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use tootview::adapters::mock::{InMemoryIdentity, MockCollectionService};
use tootview::adapters::DefaultNavigation;
use tootview::collection::CollectionReconciler;
use tootview::config::ReconcilerConfig;
use tootview::models::{CollectionKind, CollectionSection, CollectionUpdate, MarkerTimeline};

/// Debounce window used by tests that exercise the read marker.
pub const TEST_DEBOUNCE: Duration = Duration::from_millis(50);

pub struct Harness {
    pub service: MockCollectionService,
    pub identity: InMemoryIdentity,
    pub reconciler: CollectionReconciler,
}

impl Harness {
    pub fn builder(kind: CollectionKind) -> HarnessBuilder {
        HarnessBuilder::new(kind)
    }

    /// Emit `sections` upstream and apply them.
    pub async fn emit(&mut self, sections: Vec<CollectionSection>) -> CollectionUpdate {
        self.service.emit(sections);
        assert!(self.reconciler.pump().await, "section stream ended early");
        self.reconciler.last_update().clone()
    }
}

pub struct HarnessBuilder {
    service: MockCollectionService,
    identity: InMemoryIdentity,
    config: ReconcilerConfig,
}

impl HarnessBuilder {
    fn new(kind: CollectionKind) -> Self {
        Self {
            service: MockCollectionService::new(kind),
            identity: InMemoryIdentity::new(),
            config: ReconcilerConfig::default().with_marker_debounce(TEST_DEBOUNCE),
        }
    }

    pub fn marker_timeline(mut self, timeline: MarkerTimeline) -> Self {
        self.service = self.service.with_marker_timeline(timeline);
        self
    }

    pub fn service(mut self, f: impl FnOnce(MockCollectionService) -> MockCollectionService) -> Self {
        self.service = f(self.service);
        self
    }

    pub fn identity(mut self, f: impl FnOnce(InMemoryIdentity) -> InMemoryIdentity) -> Self {
        self.identity = f(self.identity);
        self
    }

    pub fn build(self) -> Harness {
        let reconciler = CollectionReconciler::new(
            Arc::new(self.service.clone()),
            Arc::new(self.identity.clone()),
            Arc::new(DefaultNavigation),
            self.config,
        );
        Harness {
            service: self.service,
            identity: self.identity,
            reconciler,
        }
    }
}

/// Everything currently buffered on a broadcast receiver.
pub fn drain<T: Clone>(rx: &mut broadcast::Receiver<T>) -> Vec<T> {
    let mut values = Vec::new();
    while let Ok(value) = rx.try_recv() {
        values.push(value);
    }
    values
}

/// Poll `check` until it holds or `timeout` passes.
pub async fn wait_until(timeout: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    check()
}
