//! tootview - collection reconciliation for a Mastodon client
//!
//! Turns server-driven section snapshots into stable, diffable list updates
//! that keep the reader's scroll position, and owns the per-row view-models
//! the list hands out. This library exposes modules for use in integration
//! tests and the replay binary.

pub mod adapters;
pub mod cache;
pub mod cli;
pub mod collection;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod replay;
pub mod traits;
pub mod view_models;
