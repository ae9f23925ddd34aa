//! Error context for enriched error information.

use std::fmt;

use chrono::{DateTime, Utc};

/// Context information attached to errors for debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Operation that failed (`request`, `load_more`, `expand_all`).
    pub operation: String,

    /// Timeline or collection the operation ran against.
    pub timeline: Option<String>,

    /// Item the operation was triggered from.
    pub item_id: Option<String>,

    /// Timestamp when the error occurred.
    pub timestamp: DateTime<Utc>,
}

impl ErrorContext {
    /// Create a new ErrorContext for an operation.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            timeline: None,
            item_id: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_timeline(mut self, timeline: impl Into<String>) -> Self {
        self.timeline = Some(timeline.into());
        self
    }

    pub fn with_item_id(mut self, item_id: impl Into<String>) -> Self {
        self.item_id = Some(item_id.into());
        self
    }

    /// Get a formatted context string suitable for logging.
    pub fn to_log_string(&self) -> String {
        let mut parts = vec![format!("operation={}", self.operation)];

        if let Some(ref timeline) = self.timeline {
            parts.push(format!("timeline={}", timeline));
        }

        if let Some(ref item_id) = self.item_id {
            parts.push(format!("item_id={}", item_id));
        }

        parts.push(format!("timestamp={}", self.timestamp.to_rfc3339()));

        parts.join(" ")
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.operation)?;
        if let Some(ref timeline) = self.timeline {
            write!(f, " on {}", timeline)?;
        }
        if let Some(ref item_id) = self.item_id {
            write!(f, " for item {}", item_id)?;
        }
        Ok(())
    }
}
