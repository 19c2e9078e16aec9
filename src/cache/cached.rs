//! Cache decorator wrapping a fetch operation
//!
//! [`Cached`] composes an operation with a store instead of mutating a
//! service in place: it holds the original operation, the store, and the
//! resolved configuration, and exposes the same calling convention by
//! implementing [`Fetch`] itself. Re-decoration therefore nests explicitly
//! in the type (`Cached<Cached<F, S1>, S2>`) rather than silently
//! re-wrapping anything.

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, warn};

use super::config::{CacheConfig, ConfigError};
use super::fetch::{CacheKey, Fetch, Timestamped};
use super::store::Store;

/// A fetch operation decorated with a TTL cache
///
/// Per-call protocol: read the store, test freshness against the configured
/// TTL, and either serve the cached record or call the wrapped operation and
/// write the result through. When the wrapped operation fails and a stale
/// record exists, the stale record is served instead of the error.
///
/// Concurrent calls each run the protocol independently; two callers racing
/// on an expired record may both reach the origin and both write (last write
/// wins). Acceptable because provider reads are idempotent.
pub struct Cached<F, S> {
    inner: F,
    store: S,
    config: CacheConfig,
}

impl<F, S> Cached<F, S>
where
    F: Fetch,
    S: Store<F::Payload>,
{
    /// Decorates `inner` with the given store and configuration.
    ///
    /// Fails with [`ConfigError::OperationMismatch`] when the configuration
    /// targets a different operation than the one being wrapped; nothing is
    /// constructed in that case.
    pub fn decorate(inner: F, store: S, config: CacheConfig) -> Result<Self, ConfigError> {
        if config.operation() != F::OPERATION {
            return Err(ConfigError::OperationMismatch {
                configured: config.operation().to_string(),
                actual: F::OPERATION,
            });
        }

        Ok(Self {
            inner,
            store,
            config,
        })
    }

    /// Decorates `inner` with the default configuration for its operation.
    pub fn with_defaults(inner: F, store: S) -> Self {
        Self {
            inner,
            store,
            config: CacheConfig::for_operation(F::OPERATION),
        }
    }

    /// The resolved configuration, for introspection and tests.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// The wrapped operation.
    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// Unwraps the decorator, returning the original operation.
    pub fn into_inner(self) -> F {
        self.inner
    }
}

#[async_trait]
impl<F, S> Fetch for Cached<F, S>
where
    F: Fetch,
    S: Store<F::Payload>,
{
    const OPERATION: &'static str = F::OPERATION;
    type Args = F::Args;
    type Payload = F::Payload;
    type Error = F::Error;

    async fn fetch(&self, args: &Self::Args) -> Result<Self::Payload, Self::Error> {
        let now = Utc::now();
        let key = CacheKey::new(F::OPERATION, args);

        // A failing store read degrades to a cache miss; the record path
        // must survive a broken cache.
        let cached = match self.store.get(&key).await {
            Ok(record) => record,
            Err(err) => {
                warn!(key = %key, error = %err, "cache read failed, treating as a miss");
                None
            }
        };

        if let Some(record) = &cached {
            if self.config.ttl().is_fresh(record.fetched_at(), now) {
                debug!(key = %key, "cache hit");
                return Ok(record.clone());
            }
        }

        debug!(key = %key, "cache miss or expired record, calling origin");
        match self.inner.fetch(args).await {
            Ok(fresh) => {
                // Best-effort write-through: awaited for ordering, but the
                // fresh payload is returned whether or not it persisted.
                if let Err(err) = self.store.put(&fresh, &key).await {
                    warn!(key = %key, error = %err, "cache write failed");
                }
                Ok(fresh)
            }
            Err(err) => match cached {
                // Stale fallback: an expired record beats surfacing a
                // transient upstream failure.
                Some(stale) => {
                    warn!(key = %key, "origin call failed, serving stale record");
                    Ok(stale)
                }
                None => Err(err),
            },
        }
    }
}
