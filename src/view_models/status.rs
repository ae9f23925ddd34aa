use std::sync::{Arc, Mutex};

use super::{lock, CollectionItemEvent, EventForwarder};
use crate::models::{Status, StatusConfiguration};
use crate::traits::NavigationService;

/// Child state for a status row (and for notifications that carry a status).
///
/// The status payload and its [`StatusConfiguration`] are refreshed every
/// time the reconciler hands this view-model out. Configuration is session
/// presentation state and is not part of the object's identity.
pub struct StatusViewModel {
    status: Mutex<Status>,
    configuration: Mutex<StatusConfiguration>,
    events: EventForwarder,
    navigation: Arc<dyn NavigationService>,
}

impl StatusViewModel {
    pub fn new(
        status: Status,
        configuration: StatusConfiguration,
        events: EventForwarder,
        navigation: Arc<dyn NavigationService>,
    ) -> Self {
        Self {
            status: Mutex::new(status),
            configuration: Mutex::new(configuration),
            events,
            navigation,
        }
    }

    pub fn status(&self) -> Status {
        lock(&self.status).clone()
    }

    pub fn configuration(&self) -> StatusConfiguration {
        *lock(&self.configuration)
    }

    pub fn is_context_parent(&self) -> bool {
        lock(&self.configuration).is_context_parent
    }

    pub fn show_content_toggled(&self) -> bool {
        lock(&self.configuration).show_content_toggled
    }

    pub fn is_read(&self) -> bool {
        lock(&self.configuration).is_read
    }

    /// Overwrite payload and configuration with the latest snapshot values.
    pub(crate) fn refresh(&self, status: &Status, configuration: StatusConfiguration) {
        {
            let mut current = lock(&self.status);
            if *current != *status {
                *current = status.clone();
            }
        }
        *lock(&self.configuration) = configuration;
    }

    /// Ask the view layer to open the composer.
    pub fn reply(&self) -> bool {
        let status_id = lock(&self.status).display_status().id.clone();
        self.events.send(CollectionItemEvent::Reply { status_id })
    }

    pub fn open_account(&self) -> bool {
        let navigation = {
            let status = lock(&self.status);
            self.navigation.profile(&status.display_status().account)
        };
        self.events.send(CollectionItemEvent::Navigation(navigation))
    }

    pub fn open_url(&self, url: &str) -> bool {
        self.events
            .send(CollectionItemEvent::Navigation(self.navigation.url(url)))
    }

    pub fn share(&self) -> bool {
        let url = lock(&self.status).display_status().url.clone();
        match url {
            Some(url) => self.events.send(CollectionItemEvent::Share { url }),
            None => false,
        }
    }
}

impl std::fmt::Debug for StatusViewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusViewModel")
            .field("status_id", &lock(&self.status).id)
            .field("configuration", &*lock(&self.configuration))
            .finish()
    }
}
