//! Result type alias for collection operations.

use super::collection_error::CollectionError;
use super::context::ErrorContext;

/// Type alias for Results using CollectionError.
pub type CollectionResult<T> = Result<T, CollectionError>;

/// Extension trait for Result types to add context to errors.
pub trait ResultExt<T> {
    /// Add context to an error if the result is Err.
    fn context(self, ctx: ErrorContext) -> CollectionResult<T>;
}

impl<T> ResultExt<T> for CollectionResult<T> {
    fn context(self, ctx: ErrorContext) -> CollectionResult<T> {
        self.map_err(|e| e.with_context(ctx))
    }
}
