use std::sync::{Arc, Mutex};

use super::{lock, CollectionItemEvent, EventForwarder};
use crate::models::{Notification, NotificationKind};
use crate::traits::NavigationService;

/// Child state for a notification without an attached status (follows,
/// follow requests).
pub struct NotificationViewModel {
    notification: Mutex<Notification>,
    events: EventForwarder,
    navigation: Arc<dyn NavigationService>,
}

impl NotificationViewModel {
    pub fn new(
        notification: Notification,
        events: EventForwarder,
        navigation: Arc<dyn NavigationService>,
    ) -> Self {
        Self {
            notification: Mutex::new(notification),
            events,
            navigation,
        }
    }

    pub fn notification(&self) -> Notification {
        lock(&self.notification).clone()
    }

    pub fn kind(&self) -> NotificationKind {
        lock(&self.notification).kind
    }

    pub(crate) fn refresh(&self, notification: &Notification) {
        let mut current = lock(&self.notification);
        if *current != *notification {
            *current = notification.clone();
        }
    }

    pub fn open_account(&self) -> bool {
        let navigation = self.navigation.profile(&lock(&self.notification).account);
        self.events.send(CollectionItemEvent::Navigation(navigation))
    }
}

impl std::fmt::Debug for NotificationViewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let notification = lock(&self.notification);
        f.debug_struct("NotificationViewModel")
            .field("notification_id", &notification.id)
            .field("kind", &notification.kind)
            .finish()
    }
}
