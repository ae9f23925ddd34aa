//! Unified error type reported by collection collaborators.

use std::fmt;

use super::category::ErrorCategory;
use super::context::ErrorContext;
use super::network::NetworkError;
use crate::models::MarkerTimeline;

/// Error returned by [`crate::traits::CollectionService`] and
/// [`crate::traits::IdentityContext`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    /// Transport or HTTP failure.
    Network(NetworkError),

    /// Payload could not be decoded.
    Parse { message: String },

    /// The instance has no marker for this timeline.
    MarkerUnavailable { timeline: MarkerTimeline },

    /// Wrapped error with additional context.
    WithContext {
        error: Box<CollectionError>,
        context: ErrorContext,
    },
}

impl CollectionError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            CollectionError::Network(err) if err.is_server_error() => ErrorCategory::Server,
            CollectionError::Network(_) => ErrorCategory::Network,
            CollectionError::Parse { .. } => ErrorCategory::Client,
            CollectionError::MarkerUnavailable { .. } => ErrorCategory::Server,
            CollectionError::WithContext { error, .. } => error.category(),
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            CollectionError::Network(err) => err.user_message(),
            CollectionError::Parse { .. } => {
                "Received content this app does not understand.".to_string()
            }
            CollectionError::MarkerUnavailable { timeline } => {
                format!("No saved reading position for the {} timeline.", timeline)
            }
            CollectionError::WithContext { error, .. } => error.user_message(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            CollectionError::Network(err) => err.error_code(),
            CollectionError::Parse { .. } => "E_PARSE",
            CollectionError::MarkerUnavailable { .. } => "E_MARKER",
            CollectionError::WithContext { error, .. } => error.error_code(),
        }
    }

    /// Attach context to this error.
    pub fn with_context(self, ctx: ErrorContext) -> Self {
        CollectionError::WithContext {
            error: Box::new(self),
            context: ctx,
        }
    }

    /// Get the context if this error has one attached.
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            CollectionError::WithContext { context, .. } => Some(context),
            _ => None,
        }
    }
}

impl fmt::Display for CollectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionError::Network(err) => write!(f, "{}", err),
            CollectionError::Parse { message } => write!(f, "Parse error: {}", message),
            CollectionError::MarkerUnavailable { timeline } => {
                write!(f, "No marker for timeline '{}'", timeline)
            }
            CollectionError::WithContext { error, context } => {
                write!(f, "{} ({})", error, context)
            }
        }
    }
}

impl std::error::Error for CollectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CollectionError::Network(err) => Some(err),
            CollectionError::WithContext { error, .. } => error.source(),
            _ => None,
        }
    }
}

impl From<NetworkError> for CollectionError {
    fn from(err: NetworkError) -> Self {
        CollectionError::Network(err)
    }
}

impl From<serde_json::Error> for CollectionError {
    fn from(err: serde_json::Error) -> Self {
        CollectionError::Parse {
            message: err.to_string(),
        }
    }
}
