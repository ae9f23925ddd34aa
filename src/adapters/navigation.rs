//! Navigation targets built straight from item payloads.

use crate::models::{Account, SearchScope};
use crate::traits::NavigationService;
use crate::view_models::Navigation;

/// [`NavigationService`] that maps each intent to its [`Navigation`]
/// value with no extra lookups.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNavigation;

impl NavigationService for DefaultNavigation {
    fn context(&self, status_id: &str) -> Navigation {
        Navigation::Context {
            status_id: status_id.to_string(),
        }
    }

    fn profile(&self, account: &Account) -> Navigation {
        Navigation::Profile {
            account_id: account.id.clone(),
        }
    }

    fn tag_timeline(&self, name: &str) -> Navigation {
        Navigation::TagTimeline {
            name: name.to_string(),
        }
    }

    fn search_scope(&self, scope: SearchScope) -> Navigation {
        Navigation::SearchScope { scope }
    }

    fn url(&self, url: &str) -> Navigation {
        Navigation::Url {
            url: url.to_string(),
        }
    }
}
