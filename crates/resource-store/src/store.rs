//! The store interface the helpers drive

use crate::{MemoryValueMap, PropertyValue, ResourcePath, ResourceType, Result};
use std::collections::BTreeMap;

/// A node read back from the store.
///
/// This is an owned copy: it is not updated when the store changes and
/// holds no session or lock.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    path: ResourcePath,
    resource_type: String,
    properties: BTreeMap<String, PropertyValue>,
}

impl Resource {
    pub fn new(
        path: ResourcePath,
        resource_type: impl Into<String>,
        properties: BTreeMap<String, PropertyValue>,
    ) -> Self {
        Self {
            path,
            resource_type: resource_type.into(),
            properties,
        }
    }

    pub fn path(&self) -> &ResourcePath {
        &self.path
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn properties(&self) -> &BTreeMap<String, PropertyValue> {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// A property view over this copy.
    pub fn value_map(&self) -> MemoryValueMap {
        MemoryValueMap::from(self.properties.clone())
    }
}

/// Arguments to [`ResourceStore::create_or_get`].
#[derive(Debug, Clone, PartialEq)]
pub struct CreateRequest {
    pub path: ResourcePath,
    /// Type tag for the leaf. When absent the store derives one from
    /// the properties.
    pub resource_type: Option<String>,
    /// Initial properties of the leaf. Ignored if the leaf already exists.
    pub properties: BTreeMap<String, PropertyValue>,
    /// Type tag for any missing ancestor.
    pub intermediate_type: String,
}

impl CreateRequest {
    /// A folder request: the leaf and every missing ancestor are folders.
    pub fn folder(path: ResourcePath) -> Self {
        Self {
            path,
            resource_type: Some(ResourceType::Folder.into()),
            properties: BTreeMap::new(),
            intermediate_type: ResourceType::Folder.into(),
        }
    }

    /// A leaf request carrying `properties`, below folder ancestors.
    pub fn leaf(path: ResourcePath, properties: BTreeMap<String, PropertyValue>) -> Self {
        Self {
            path,
            resource_type: None,
            properties,
            intermediate_type: ResourceType::Folder.into(),
        }
    }

    pub fn with_resource_type(mut self, resource_type: impl Into<String>) -> Self {
        self.resource_type = Some(resource_type.into());
        self
    }
}

/// A path-addressed hierarchical store.
///
/// Each call is atomic on its own. `create_or_get` is *not* atomic across
/// writers: two callers may both see the path absent and both try to
/// create it, in which case one of them fails with
/// [`StoreError::Conflict`](crate::StoreError::Conflict).
pub trait ResourceStore: Send + Sync {
    /// Look a path up.
    fn resolve(&self, path: &ResourcePath) -> Result<Option<Resource>>;

    /// Return the node at `request.path`, creating it and any missing
    /// ancestors first if it does not exist.
    fn create_or_get(&self, request: &CreateRequest) -> Result<Resource>;
}

impl<S: ResourceStore + ?Sized> ResourceStore for &S {
    fn resolve(&self, path: &ResourcePath) -> Result<Option<Resource>> {
        (**self).resolve(path)
    }

    fn create_or_get(&self, request: &CreateRequest) -> Result<Resource> {
        (**self).create_or_get(request)
    }
}

impl<S: ResourceStore + ?Sized> ResourceStore for std::sync::Arc<S> {
    fn resolve(&self, path: &ResourcePath) -> Result<Option<Resource>> {
        (**self).resolve(path)
    }

    fn create_or_get(&self, request: &CreateRequest) -> Result<Resource> {
        (**self).create_or_get(request)
    }
}
