//! Navigation service trait abstraction.

use crate::models::{Account, SearchScope};
use crate::view_models::Navigation;

/// Builds navigation targets.
///
/// Child view-models are constructed with a handle to this service and use
/// it to turn user intents (open a thread, open a profile) into
/// [`Navigation`] values that travel on the shared event stream.
pub trait NavigationService: Send + Sync {
    /// Thread view opened on a status.
    fn context(&self, status_id: &str) -> Navigation;

    fn profile(&self, account: &Account) -> Navigation;

    fn tag_timeline(&self, name: &str) -> Navigation;

    /// Full results for one search scope.
    fn search_scope(&self, scope: SearchScope) -> Navigation;

    fn url(&self, url: &str) -> Navigation;
}
