//! Error handling for collection reconciliation.
//!
//! Nothing in the reconciler is fatal. Errors end up in one of three places:
//!
//! | Source | Handling |
//! |--------|----------|
//! | Fetch (`request`, load-more, expand/collapse) | Converted to an [`AlertItem`] and published on the alert channel |
//! | Read-marker sync | Logged at debug level and dropped |
//! | Marker bootstrap during the first `request` | Falls back to an unanchored fetch |
//!
//! Collaborators report failures as [`CollectionError`]. The reconciler wraps
//! them in an [`ErrorContext`] naming the operation before publishing, and
//! [`ErrorCategory`] gives a coarse label for the log line.

mod alert;
mod category;
mod collection_error;
mod context;
mod network;
mod result;

pub use alert::AlertItem;
pub use category::ErrorCategory;
pub use collection_error::CollectionError;
pub use context::ErrorContext;
pub use network::NetworkError;
pub use result::{CollectionResult, ResultExt};
