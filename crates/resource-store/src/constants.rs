//! Well-known resource type tags and property names.

/// Property holding a leaf's type tag when no explicit hint is given.
pub const RESOURCE_TYPE_PROPERTY: &str = "sling:resourceType";

/// Type tag used when neither a hint nor [`RESOURCE_TYPE_PROPERTY`] is present.
pub const DEFAULT_RESOURCE_TYPE: &str = "nt:unstructured";

/// Topic published when a bundle is updated.
pub const BUNDLE_EVENT_UPDATED: &str = "org/osgi/framework/BundleEvent/UPDATED";

/// Topic published when a bundle is started.
pub const BUNDLE_EVENT_STARTED: &str = "org/osgi/framework/BundleEvent/STARTED";

/// Resource types the job persistence layer stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    /// Plain ordered folder, also used for intermediate nodes
    Folder,
    /// A persisted job
    Job,
    /// A persisted event
    Event,
}

impl ResourceType {
    /// Get the type tag written to the store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Folder => "sling:Folder",
            Self::Job => "slingevent:Job",
            Self::Event => "slingevent:Event",
        }
    }
}

impl AsRef<str> for ResourceType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<ResourceType> for String {
    fn from(t: ResourceType) -> Self {
        t.as_str().to_string()
    }
}
