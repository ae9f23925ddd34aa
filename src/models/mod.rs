//! Data model for collections: items, sections, update snapshots and markers.
//!
//! Everything here is plain data. Identity rules live on [`CollectionItem`]:
//! [`CollectionItem::item_id`] is the stable "same row" identity, while the
//! cache key additionally folds in configuration.

mod collection;
mod item;
mod marker;
mod status;

pub use collection::{
    CollectionKind, CollectionSection, CollectionUpdate, ExpandAllState, IndexPath, Search,
};
pub use item::{
    AccountConfiguration, CollectionItem, Conversation, ItemKind, LoadMore, LoadMoreDirection,
    MoreResults, Notification, NotificationKind, SearchScope, StatusConfiguration,
};
pub use marker::{compare_ids, min_id, Marker, MarkerTimeline, PositionBehavior};
pub use status::{Account, Status, Tag};

use serde::{Deserialize, Deserializer};

/// Stable identity of a row across snapshots.
pub type ItemId = String;

/// Helper to deserialize id as either string or integer
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer")
        }

        fn visit_str<E>(self, value: &str) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_string<E>(self, value: String) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value)
        }

        fn visit_i64<E>(self, value: i64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

/// Helper to deserialize nullable strings as empty string
pub(crate) fn deserialize_nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|opt| opt.unwrap_or_default())
}
