use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::deserialize_id;

/// Timeline a read marker is kept for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MarkerTimeline {
    Home,
    Notifications,
}

impl MarkerTimeline {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerTimeline::Home => "home",
            MarkerTimeline::Notifications => "notifications",
        }
    }
}

impl fmt::Display for MarkerTimeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server-side read position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Marker {
    #[serde(deserialize_with = "deserialize_id")]
    pub last_read_id: String,
    #[serde(default)]
    pub version: u64,
    pub updated_at: DateTime<Utc>,
}

impl Marker {
    pub fn new(last_read_id: impl Into<String>) -> Self {
        Self {
            last_read_id: last_read_id.into(),
            version: 0,
            updated_at: Utc::now(),
        }
    }
}

/// User preference for keeping a timeline's reading position.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum PositionBehavior {
    /// Persist the last read id on this device
    RememberPosition,
    /// Keep the position in the server-side marker
    SyncPosition,
    /// Always open at the newest item
    #[default]
    Disabled,
}

/// Order two server ids.
///
/// Numeric ids (snowflakes) compare by length first so that `"9"` sorts
/// below `"10"`; anything else falls back to byte order.
pub fn compare_ids(a: &str, b: &str) -> Ordering {
    let numeric = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if numeric(a) && numeric(b) {
        let a = a.trim_start_matches('0');
        let b = b.trim_start_matches('0');
        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
    } else {
        a.cmp(b)
    }
}

/// The older (smaller) of two ids.
pub fn min_id<'a>(a: &'a str, b: &'a str) -> &'a str {
    match compare_ids(a, b) {
        Ordering::Greater => b,
        _ => a,
    }
}
