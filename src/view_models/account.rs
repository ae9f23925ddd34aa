use std::sync::{Arc, Mutex};

use super::{lock, CollectionItemEvent, EventForwarder};
use crate::models::{Account, AccountConfiguration};
use crate::traits::NavigationService;

/// Child state for an account row (follower lists, search results, mutes).
pub struct AccountViewModel {
    account: Mutex<Account>,
    configuration: AccountConfiguration,
    events: EventForwarder,
    navigation: Arc<dyn NavigationService>,
}

impl AccountViewModel {
    pub fn new(
        account: Account,
        configuration: AccountConfiguration,
        events: EventForwarder,
        navigation: Arc<dyn NavigationService>,
    ) -> Self {
        Self {
            account: Mutex::new(account),
            configuration,
            events,
            navigation,
        }
    }

    pub fn account(&self) -> Account {
        lock(&self.account).clone()
    }

    pub fn configuration(&self) -> AccountConfiguration {
        self.configuration
    }

    /// Whether the note (bio) is shown under the name.
    pub fn shows_note(&self) -> bool {
        self.configuration == AccountConfiguration::WithNote
    }

    pub(crate) fn refresh(&self, account: &Account) {
        let mut current = lock(&self.account);
        if *current != *account {
            *current = account.clone();
        }
    }

    pub fn open_url(&self) -> bool {
        let url = lock(&self.account).url.clone();
        match url {
            Some(url) => self
                .events
                .send(CollectionItemEvent::Navigation(self.navigation.url(&url))),
            None => false,
        }
    }
}

impl std::fmt::Debug for AccountViewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountViewModel")
            .field("account_id", &lock(&self.account).id)
            .field("configuration", &self.configuration)
            .finish()
    }
}
