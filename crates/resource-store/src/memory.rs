//! In-memory reference store
//!
//! Behaves like the persistent stores this crate fronts: single calls are
//! atomic, but `create_or_get` is a lookup followed by a strict create, so
//! writers racing on the same absent path can see a conflict.

use crate::{
    CreateRequest, DEFAULT_RESOURCE_TYPE, PropertyValue, RESOURCE_TYPE_PROPERTY, Resource,
    ResourcePath, ResourceStore, Result, StoreError,
};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone)]
struct Node {
    resource_type: String,
    properties: BTreeMap<String, PropertyValue>,
}

/// Thread-safe in-memory hierarchical store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    nodes: Mutex<BTreeMap<ResourcePath, Node>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<ResourcePath, Node>>> {
        self.nodes
            .lock()
            .map_err(|_| StoreError::InvalidRequest {
                message: "memory store lock poisoned".into(),
            })
    }

    /// Create the node at `request.path`, failing if it already exists.
    ///
    /// Missing ancestors are created with `request.intermediate_type`;
    /// existing ancestors are left untouched.
    pub fn create(&self, request: &CreateRequest) -> Result<Resource> {
        if request.path.is_root() {
            return Err(StoreError::InvalidRequest {
                message: "cannot create the root node".into(),
            });
        }

        let mut nodes = self.lock()?;
        if nodes.contains_key(&request.path) {
            return Err(StoreError::conflict(&request.path));
        }

        for ancestor in request.path.ancestors() {
            nodes.entry(ancestor).or_insert_with(|| Node {
                resource_type: request.intermediate_type.clone(),
                properties: BTreeMap::new(),
            });
        }

        let node = Node {
            resource_type: leaf_type(request),
            properties: request.properties.clone(),
        };
        let resource = Resource::new(
            request.path.clone(),
            node.resource_type.clone(),
            node.properties.clone(),
        );
        nodes.insert(request.path.clone(), node);
        tracing::trace!(path = %request.path, "created node");
        Ok(resource)
    }

    pub fn contains(&self, path: &ResourcePath) -> bool {
        self.lock().map(|n| n.contains_key(path)).unwrap_or(false)
    }

    /// Every stored path, in lexical segment order.
    pub fn paths(&self) -> Vec<ResourcePath> {
        self.lock()
            .map(|n| n.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.lock().map(|n| n.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn leaf_type(request: &CreateRequest) -> String {
    if let Some(hint) = &request.resource_type {
        return hint.clone();
    }
    request
        .properties
        .get(RESOURCE_TYPE_PROPERTY)
        .and_then(PropertyValue::as_str)
        .unwrap_or(DEFAULT_RESOURCE_TYPE)
        .to_string()
}

impl ResourceStore for MemoryStore {
    fn resolve(&self, path: &ResourcePath) -> Result<Option<Resource>> {
        let nodes = self.lock()?;
        Ok(nodes.get(path).map(|node| {
            Resource::new(
                path.clone(),
                node.resource_type.clone(),
                node.properties.clone(),
            )
        }))
    }

    fn create_or_get(&self, request: &CreateRequest) -> Result<Resource> {
        if let Some(existing) = self.resolve(&request.path)? {
            return Ok(existing);
        }
        self.create(request)
    }
}
