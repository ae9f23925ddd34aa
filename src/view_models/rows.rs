//! Small child states: conversations, tags and "more results" rows.

use std::sync::{Arc, Mutex};

use super::{lock, CollectionItemEvent, EventForwarder};
use crate::models::{Account, Conversation, MoreResults, Tag};
use crate::traits::NavigationService;

pub struct ConversationViewModel {
    conversation: Mutex<Conversation>,
    events: EventForwarder,
    navigation: Arc<dyn NavigationService>,
}

impl ConversationViewModel {
    pub fn new(
        conversation: Conversation,
        events: EventForwarder,
        navigation: Arc<dyn NavigationService>,
    ) -> Self {
        Self {
            conversation: Mutex::new(conversation),
            events,
            navigation,
        }
    }

    pub fn conversation(&self) -> Conversation {
        lock(&self.conversation).clone()
    }

    pub fn is_unread(&self) -> bool {
        lock(&self.conversation).unread
    }

    pub fn participants(&self) -> Vec<Account> {
        lock(&self.conversation).accounts.clone()
    }

    pub(crate) fn refresh(&self, conversation: &Conversation) {
        let mut current = lock(&self.conversation);
        if *current != *conversation {
            *current = conversation.clone();
        }
    }

    /// Open a participant's profile.
    pub fn open_participant(&self, index: usize) -> bool {
        let navigation = {
            let conversation = lock(&self.conversation);
            match conversation.accounts.get(index) {
                Some(account) => self.navigation.profile(account),
                None => return false,
            }
        };
        self.events.send(CollectionItemEvent::Navigation(navigation))
    }
}

impl std::fmt::Debug for ConversationViewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationViewModel")
            .field("conversation_id", &lock(&self.conversation).id)
            .finish()
    }
}

#[derive(Debug)]
pub struct TagViewModel {
    tag: Tag,
    events: EventForwarder,
}

impl TagViewModel {
    pub fn new(tag: Tag, events: EventForwarder) -> Self {
        Self { tag, events }
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn share(&self) -> bool {
        match &self.tag.url {
            Some(url) => self
                .events
                .send(CollectionItemEvent::Share { url: url.clone() }),
            None => false,
        }
    }
}

#[derive(Debug)]
pub struct MoreResultsViewModel {
    more_results: MoreResults,
    _events: EventForwarder,
}

impl MoreResultsViewModel {
    pub fn new(more_results: MoreResults, events: EventForwarder) -> Self {
        Self {
            more_results,
            _events: events,
        }
    }

    pub fn more_results(&self) -> &MoreResults {
        &self.more_results
    }
}
