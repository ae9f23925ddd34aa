//! Mock implementations for testing.
//!
//! These doubles let the reconciler run without a server. The replay
//! binary uses them too.
//!
//! # Available Mocks
//!
//! - [`MockCollectionService`] - section snapshots on demand, configurable fetch results
//! - [`InMemoryIdentity`] - position preferences, local ids and server markers

pub mod collection_service;
pub mod identity;

pub use collection_service::{MockCollectionService, RecordedRequest};
pub use identity::{InMemoryIdentity, StatusAction};
