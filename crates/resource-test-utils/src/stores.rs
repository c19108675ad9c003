//! Store doubles for retry and race scenarios.

use resource_store::{
    CreateRequest, MemoryStore, Resource, ResourcePath, ResourceStore, Result, StoreError,
};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Barrier;

/// A [`MemoryStore`] that forces first-time creators to collide.
///
/// The first `writers` calls that find their path absent all wait for each
/// other after the lookup and only then create. Exactly one create wins;
/// every other one fails with [`StoreError::Conflict`]. Later calls behave
/// like a plain [`MemoryStore`].
pub struct RacingStore {
    inner: MemoryStore,
    gate: Barrier,
    armed: AtomicUsize,
    calls: AtomicU32,
    conflicts: AtomicU32,
}

impl RacingStore {
    pub fn new(writers: usize) -> Self {
        Self {
            inner: MemoryStore::new(),
            gate: Barrier::new(writers),
            armed: AtomicUsize::new(writers),
            calls: AtomicU32::new(0),
            conflicts: AtomicU32::new(0),
        }
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    /// Total `create_or_get` calls.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Creates that lost a race.
    pub fn conflicts(&self) -> u32 {
        self.conflicts.load(Ordering::SeqCst)
    }
}

impl ResourceStore for RacingStore {
    fn resolve(&self, path: &ResourcePath) -> Result<Option<Resource>> {
        self.inner.resolve(path)
    }

    fn create_or_get(&self, request: &CreateRequest) -> Result<Resource> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(existing) = self.inner.resolve(&request.path)? {
            return Ok(existing);
        }

        let gated = self
            .armed
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if gated {
            self.gate.wait();
        }

        self.inner.create(request).inspect_err(|err| {
            if matches!(err, StoreError::Conflict { .. }) {
                self.conflicts.fetch_add(1, Ordering::SeqCst);
            }
        })
    }
}

/// A store whose every create conflicts.
#[derive(Default)]
pub struct ConflictingStore {
    attempts: AtomicU32,
}

impl ConflictingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl ResourceStore for ConflictingStore {
    fn resolve(&self, _path: &ResourcePath) -> Result<Option<Resource>> {
        Ok(None)
    }

    fn create_or_get(&self, request: &CreateRequest) -> Result<Resource> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::conflict(&request.path))
    }
}

/// A [`MemoryStore`] whose first `failures` calls fail with a persistence error.
pub struct FlakyStore {
    inner: MemoryStore,
    remaining: AtomicU32,
    attempts: AtomicU32,
}

impl FlakyStore {
    pub fn new(failures: u32) -> Self {
        Self {
            inner: MemoryStore::new(),
            remaining: AtomicU32::new(failures),
            attempts: AtomicU32::new(0),
        }
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl ResourceStore for FlakyStore {
    fn resolve(&self, path: &ResourcePath) -> Result<Option<Resource>> {
        self.inner.resolve(path)
    }

    fn create_or_get(&self, request: &CreateRequest) -> Result<Resource> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(StoreError::persistence(&request.path, "session refresh failed"));
        }
        self.inner.create_or_get(request)
    }
}
