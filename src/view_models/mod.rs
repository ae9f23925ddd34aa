//! Per-item child view-models.
//!
//! One variant per [`CollectionItem`] tag. Each child owns an
//! [`EventForwarder`] so its user-triggered events reach the reconciler's
//! shared stream until the cache releases it.

mod account;
mod events;
mod load_more;
mod notification;
mod rows;
mod status;

pub use account::AccountViewModel;
pub use events::{CollectionItemEvent, EventForwarder, ForwardingSubscription, Navigation};
pub use load_more::LoadMoreViewModel;
pub use notification::NotificationViewModel;
pub use rows::{ConversationViewModel, MoreResultsViewModel, TagViewModel};
pub use status::StatusViewModel;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::models::CollectionItem;
use crate::traits::NavigationService;

/// Lock a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shared handle to a child view-model.
///
/// Clones share the same underlying object; use
/// [`ChildViewModel::same_instance`] to check referential identity.
#[derive(Debug, Clone)]
pub enum ChildViewModel {
    Status(Arc<StatusViewModel>),
    LoadMore(Arc<LoadMoreViewModel>),
    Account(Arc<AccountViewModel>),
    Notification(Arc<NotificationViewModel>),
    Conversation(Arc<ConversationViewModel>),
    Tag(Arc<TagViewModel>),
    MoreResults(Arc<MoreResultsViewModel>),
}

impl ChildViewModel {
    /// Construct the child variant for `item`.
    ///
    /// Notifications that carry a status and a status configuration are
    /// presented as statuses.
    pub fn build(
        item: &CollectionItem,
        events: EventForwarder,
        navigation: Arc<dyn NavigationService>,
    ) -> Self {
        match item {
            CollectionItem::Status {
                status,
                configuration,
            } => ChildViewModel::Status(Arc::new(StatusViewModel::new(
                status.clone(),
                *configuration,
                events,
                navigation,
            ))),
            CollectionItem::LoadMore(load_more) => ChildViewModel::LoadMore(Arc::new(
                LoadMoreViewModel::new(load_more.clone(), events),
            )),
            CollectionItem::Account {
                account,
                configuration,
            } => ChildViewModel::Account(Arc::new(AccountViewModel::new(
                account.clone(),
                *configuration,
                events,
                navigation,
            ))),
            CollectionItem::Notification {
                notification,
                status_configuration,
            } => match (&notification.status, status_configuration) {
                (Some(status), Some(configuration)) => ChildViewModel::Status(Arc::new(
                    StatusViewModel::new(status.clone(), *configuration, events, navigation),
                )),
                _ => ChildViewModel::Notification(Arc::new(NotificationViewModel::new(
                    notification.clone(),
                    events,
                    navigation,
                ))),
            },
            CollectionItem::Conversation(conversation) => ChildViewModel::Conversation(
                Arc::new(ConversationViewModel::new(conversation.clone(), events, navigation)),
            ),
            CollectionItem::Tag(tag) => {
                ChildViewModel::Tag(Arc::new(TagViewModel::new(tag.clone(), events)))
            }
            CollectionItem::MoreResults(more_results) => ChildViewModel::MoreResults(Arc::new(
                MoreResultsViewModel::new(more_results.clone(), events),
            )),
        }
    }

    /// Push the latest payload and configuration from `item` into a reused
    /// child.
    pub(crate) fn refresh(&self, item: &CollectionItem) {
        match (self, item) {
            (
                ChildViewModel::Status(vm),
                CollectionItem::Status {
                    status,
                    configuration,
                },
            ) => vm.refresh(status, *configuration),
            (
                ChildViewModel::Status(vm),
                CollectionItem::Notification {
                    notification,
                    status_configuration: Some(configuration),
                },
            ) => {
                if let Some(status) = &notification.status {
                    vm.refresh(status, *configuration);
                }
            }
            (ChildViewModel::Account(vm), CollectionItem::Account { account, .. }) => {
                vm.refresh(account)
            }
            (
                ChildViewModel::Notification(vm),
                CollectionItem::Notification { notification, .. },
            ) => vm.refresh(notification),
            (ChildViewModel::Conversation(vm), CollectionItem::Conversation(conversation)) => {
                vm.refresh(conversation)
            }
            _ => {}
        }
    }

    /// True if both handles point at the same object.
    pub fn same_instance(&self, other: &ChildViewModel) -> bool {
        match (self, other) {
            (ChildViewModel::Status(a), ChildViewModel::Status(b)) => Arc::ptr_eq(a, b),
            (ChildViewModel::LoadMore(a), ChildViewModel::LoadMore(b)) => Arc::ptr_eq(a, b),
            (ChildViewModel::Account(a), ChildViewModel::Account(b)) => Arc::ptr_eq(a, b),
            (ChildViewModel::Notification(a), ChildViewModel::Notification(b)) => {
                Arc::ptr_eq(a, b)
            }
            (ChildViewModel::Conversation(a), ChildViewModel::Conversation(b)) => {
                Arc::ptr_eq(a, b)
            }
            (ChildViewModel::Tag(a), ChildViewModel::Tag(b)) => Arc::ptr_eq(a, b),
            (ChildViewModel::MoreResults(a), ChildViewModel::MoreResults(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn as_status(&self) -> Option<&Arc<StatusViewModel>> {
        match self {
            ChildViewModel::Status(vm) => Some(vm),
            _ => None,
        }
    }

    pub fn as_load_more(&self) -> Option<&Arc<LoadMoreViewModel>> {
        match self {
            ChildViewModel::LoadMore(vm) => Some(vm),
            _ => None,
        }
    }
}
