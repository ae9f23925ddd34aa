use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::{lock, EventForwarder};
use crate::models::{LoadMore, LoadMoreDirection};

/// Child state for a pagination gap.
///
/// The view sets [`LoadMoreDirection`] from where the user pulled the row;
/// the resolver reads it back after the gap is filled to decide whether the
/// status below the gap must stay anchored.
pub struct LoadMoreViewModel {
    load_more: LoadMore,
    direction: Mutex<LoadMoreDirection>,
    loading: AtomicBool,
    // Held so the forwarding link is released together with this row.
    _events: EventForwarder,
}

impl LoadMoreViewModel {
    pub fn new(load_more: LoadMore, events: EventForwarder) -> Self {
        Self {
            load_more,
            direction: Mutex::new(LoadMoreDirection::default()),
            loading: AtomicBool::new(false),
            _events: events,
        }
    }

    pub fn load_more(&self) -> &LoadMore {
        &self.load_more
    }

    pub fn direction(&self) -> LoadMoreDirection {
        *lock(&self.direction)
    }

    pub fn set_direction(&self, direction: LoadMoreDirection) {
        *lock(&self.direction) = direction;
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Mark the gap as loading. Returns false if a fetch is already running.
    pub(crate) fn begin_loading(&self) -> bool {
        self.loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub(crate) fn finish_loading(&self) {
        self.loading.store(false, Ordering::Release);
    }
}

impl std::fmt::Debug for LoadMoreViewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadMoreViewModel")
            .field("load_more", &self.load_more)
            .field("direction", &self.direction())
            .field("loading", &self.is_loading())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view_models::ForwardingSubscription;
    use tokio::sync::broadcast;

    fn view_model() -> (ForwardingSubscription, LoadMoreViewModel) {
        let (sink, _) = broadcast::channel(4);
        let (subscription, forwarder) = ForwardingSubscription::new(sink);
        (
            subscription,
            LoadMoreViewModel::new(LoadMore::new("home", "20", "10"), forwarder),
        )
    }

    #[test]
    fn test_direction_defaults_to_down() {
        let (_sub, vm) = view_model();
        assert_eq!(vm.direction(), LoadMoreDirection::Down);
        vm.set_direction(LoadMoreDirection::Up);
        assert_eq!(vm.direction(), LoadMoreDirection::Up);
    }

    #[test]
    fn test_begin_loading_is_exclusive() {
        let (_sub, vm) = view_model();
        assert!(vm.begin_loading());
        assert!(!vm.begin_loading());
        assert!(vm.is_loading());

        vm.finish_loading();
        assert!(!vm.is_loading());
        assert!(vm.begin_loading());
    }
}
