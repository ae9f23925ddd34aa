//! Collection reconciliation.
//!
//! - [`CollectionReconciler`] - applies upstream snapshots and user actions
//! - [`ScrollPositionResolver`] - picks the row that keeps its offset
//! - [`ReadMarkerCoordinator`] - debounced last-read sync
//! - [`diff`] - structural removals between item sequences

pub mod diff;
mod read_marker;
mod reconciler;
mod resolver;

pub use read_marker::ReadMarkerCoordinator;
pub use reconciler::CollectionReconciler;
pub use resolver::{should_adjust_content_inset, ResolverContext, ScrollPositionResolver};
