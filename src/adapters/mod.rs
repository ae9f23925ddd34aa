//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`DefaultNavigation`] - maps intents straight to [`crate::view_models::Navigation`] values
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles for the remaining seams:
//! - [`mock::MockCollectionService`] - snapshots pushed by the test, recorded fetches
//! - [`mock::InMemoryIdentity`] - in-memory preferences and markers, recorded writes

pub mod mock;
pub mod navigation;

pub use mock::{InMemoryIdentity, MockCollectionService};
pub use navigation::DefaultNavigation;
