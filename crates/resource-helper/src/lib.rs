//! Name sanitizing, property snapshots and race-tolerant provisioning
//!
//! The pieces a job persistence layer needs before it writes to a
//! hierarchical store:
//!
//! - [`filter_name`] turns an arbitrary identifier into a legal path segment.
//! - [`ignore_property`] / [`PropertyFilter`] keep transport metadata out of
//!   the store.
//! - [`clone_value_map`] copies a property view into a [`PropertySnapshot`],
//!   draining single-read streams.
//! - [`Provisioner`] makes sure a folder path or leaf exists even when other
//!   writers are creating the same path at the same time.

pub mod config;
pub mod error;
pub mod logging;
pub mod name;
pub mod properties;
pub mod provision;
pub mod snapshot;

pub use config::{BackoffConfig, BackoffStrategy, HelperConfig, RetryConfig};
pub use error::{Error, Result};
pub use name::{REPLACEMENT_CHAR, filter_name, is_legal_name, join_filtered};
pub use properties::{IGNORED_PROPERTIES, PropertyFilter, ignore_property};
pub use provision::{Provisioner, RetryPolicy, ensure_folder_path, ensure_resource};
pub use snapshot::{PropertySnapshot, READ_ERROR_MARKER, clone_value_map};
