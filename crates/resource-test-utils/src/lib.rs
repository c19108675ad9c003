//! Shared test utilities for the resource-helper workspace.
//!
//! Stores that misbehave in controlled ways, for exercising the
//! provisioning retry loop. Dev-dependency only — never published.
//!
//! # Modules
//!
//! - [`stores`] — [`RacingStore`], [`ConflictingStore`], [`FlakyStore`]

pub mod stores;

pub use stores::{ConflictingStore, FlakyStore, RacingStore};
