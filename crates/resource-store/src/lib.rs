//! Hierarchical resource store abstraction for Resource Helper
//!
//! Provides the path, value and property-view vocabulary shared by the
//! helpers, the [`ResourceStore`] interface they drive, and an in-memory
//! reference store.

pub mod constants;
pub mod error;
pub mod memory;
pub mod path;
pub mod store;
pub mod value;
pub mod view;

pub use constants::{
    BUNDLE_EVENT_STARTED, BUNDLE_EVENT_UPDATED, DEFAULT_RESOURCE_TYPE, RESOURCE_TYPE_PROPERTY,
    ResourceType,
};
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use path::ResourcePath;
pub use store::{CreateRequest, Resource, ResourceStore};
pub use value::{BinaryStream, PropertyValue};
pub use view::{MemoryValueMap, ValueMap};
