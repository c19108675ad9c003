//! Race-tolerant get-or-create
//!
//! The store's `create_or_get` is a lookup followed by a create. Two writers
//! provisioning the same absent path can both see it missing, and the
//! slower create then fails. Retrying re-runs the lookup, which now finds
//! the winner's node. No locks or tokens are involved; the first writer's
//! properties win and nothing is merged.

use crate::config::{BackoffStrategy, DEFAULT_MAX_ATTEMPTS, HelperConfig};
use crate::snapshot::PropertySnapshot;
use crate::{Error, Result};
use backoff::ExponentialBackoffBuilder;
use backoff::backoff::{Backoff, Constant, Zero};
use resource_store::{CreateRequest, Resource, ResourcePath, ResourceStore, StoreError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

type BackoffFactory = Arc<dyn Fn() -> Box<dyn Backoff + Send> + Send + Sync>;

/// How many times to try and how long to wait in between.
///
/// A fresh [`Backoff`] is created for every provisioning call. The number
/// of attempts is fixed by `max_attempts`: a backoff that returns `None`
/// only means "retry without waiting".
#[derive(Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: BackoffFactory,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

impl std::fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

impl RetryPolicy {
    /// Retry immediately, `max_attempts` times in total (at least once).
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff: Arc::new(|| Box::new(Zero {}) as Box<dyn Backoff + Send>),
        }
    }

    pub fn with_strategy(self, strategy: BackoffStrategy) -> Self {
        match strategy {
            BackoffStrategy::None => self.with_backoff(|| Zero {}),
            BackoffStrategy::Constant { delay } => self.with_backoff(move || Constant::new(delay)),
            BackoffStrategy::Exponential {
                initial,
                max,
                multiplier,
            } => self.with_backoff(move || {
                ExponentialBackoffBuilder::new()
                    .with_initial_interval(initial)
                    .with_max_interval(max)
                    .with_multiplier(multiplier)
                    .with_max_elapsed_time(None)
                    .build()
            }),
        }
    }

    /// Use a custom backoff, built fresh for each call.
    pub fn with_backoff<B, F>(mut self, factory: F) -> Self
    where
        B: Backoff + Send + 'static,
        F: Fn() -> B + Send + Sync + 'static,
    {
        self.backoff = Arc::new(move || Box::new(factory()) as Box<dyn Backoff + Send>);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    fn run<T>(
        &self,
        path: &ResourcePath,
        mut attempt: impl FnMut() -> std::result::Result<T, StoreError>,
    ) -> Result<T> {
        let mut backoff = (self.backoff)();
        let mut n = 0;
        loop {
            n += 1;
            let err = match attempt() {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if n >= self.max_attempts {
                warn!(path = %path, attempts = n, error = %err, "provisioning gave up");
                return Err(Error::ConflictRetryExhausted {
                    path: path.clone(),
                    attempts: n,
                    source: err,
                });
            }

            debug!(path = %path, attempt = n, error = %err, "provisioning attempt failed, retrying");
            if let Some(delay) = backoff.next_backoff().filter(|d| *d > Duration::ZERO) {
                std::thread::sleep(delay);
            }
        }
    }
}

/// Guarantees a folder path or leaf resource exists.
#[derive(Debug, Clone, Default)]
pub struct Provisioner {
    policy: RetryPolicy,
}

impl Provisioner {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn from_config(config: &HelperConfig) -> Self {
        let policy = RetryPolicy::new(config.retry.max_attempts)
            .with_strategy(BackoffStrategy::from(&config.retry.backoff));
        Self::new(policy)
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Make sure `path` and all of its ancestors exist, creating missing
    /// nodes as folders.
    ///
    /// An existing node is returned as is, whatever its type.
    pub fn ensure_folder_path<S>(&self, store: &S, path: &ResourcePath) -> Result<Resource>
    where
        S: ResourceStore + ?Sized,
    {
        if path.is_root() {
            return Err(Error::EmptyPath);
        }
        let request = CreateRequest::folder(path.clone());
        self.policy.run(path, || store.create_or_get(&request))
    }

    /// Make sure a leaf exists at `path`, creating it with `props` below
    /// folder ancestors if it does not.
    ///
    /// If another writer got there first, its node is returned and `props`
    /// are not applied.
    pub fn ensure_resource<S>(
        &self,
        store: &S,
        path: &ResourcePath,
        props: &PropertySnapshot,
    ) -> Result<Resource>
    where
        S: ResourceStore + ?Sized,
    {
        if path.is_root() {
            return Err(Error::EmptyPath);
        }
        let request = CreateRequest::leaf(path.clone(), props.to_map());
        self.policy.run(path, || store.create_or_get(&request))
    }
}

/// [`Provisioner::ensure_folder_path`] with the default policy.
pub fn ensure_folder_path<S>(store: &S, path: &ResourcePath) -> Result<Resource>
where
    S: ResourceStore + ?Sized,
{
    Provisioner::default().ensure_folder_path(store, path)
}

/// [`Provisioner::ensure_resource`] with the default policy.
pub fn ensure_resource<S>(store: &S, path: &ResourcePath, props: &PropertySnapshot) -> Result<Resource>
where
    S: ResourceStore + ?Sized,
{
    Provisioner::default().ensure_resource(store, path, props)
}
