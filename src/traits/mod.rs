//! Trait abstractions for the reconciler's collaborators.
//!
//! The reconciler only talks to the outside world through these seams, so
//! tests and the replay tool can substitute in-memory implementations.
//!
//! # Traits
//!
//! - [`CollectionService`] - paginated section stream plus fetch operations
//! - [`IdentityContext`] - position preferences, markers and bulk status actions
//! - [`NavigationService`] - builds navigation targets for child view-models

pub mod collection_service;
pub mod identity;
pub mod navigation;

pub use collection_service::{CollectionService, SectionStream};
pub use identity::IdentityContext;
pub use navigation::NavigationService;
