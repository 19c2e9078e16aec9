//! Capability traits the cache layer is built on
//!
//! A cacheable operation is anything implementing [`Fetch`]: an async call
//! that takes arguments, returns a payload carrying its own publication
//! timestamp, and fails with a typed error. The cache makes no other
//! assumption about the payload.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

/// Payloads that report when they were produced upstream.
///
/// The provider reports timestamps in unix seconds; implementations convert
/// to a typed instant here so the freshness test never has to guess units.
pub trait Timestamped {
    /// When the payload was produced, if it reports a timestamp at all.
    ///
    /// Payloads without a timestamp (e.g. the currency list) are never
    /// considered fresh under a finite TTL and always fresh under an
    /// infinite one.
    fn fetched_at(&self) -> Option<DateTime<Utc>>;
}

/// Call arguments that can contribute to a cache key.
///
/// Different argument sets cache independently: the suffix (if any) is
/// appended to the operation name to form the [`CacheKey`].
pub trait KeyArgs {
    /// Key suffix derived from the arguments, or `None` for no-argument calls.
    fn key_suffix(&self) -> Option<String>;
}

impl KeyArgs for () {
    fn key_suffix(&self) -> Option<String> {
        None
    }
}

impl KeyArgs for NaiveDate {
    fn key_suffix(&self) -> Option<String> {
        Some(self.format("%Y-%m-%d").to_string())
    }
}

/// Identifies a cached record: operation name plus argument suffix
///
/// Examples: `latest`, `historical_2013-12-29`. A store may use the key to
/// cache per argument set, or ignore it and hold a single global record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Builds the key for an operation called with the given arguments.
    pub fn new(operation: &str, args: &impl KeyArgs) -> Self {
        match args.key_suffix() {
            Some(suffix) => Self(format!("{operation}_{suffix}")),
            None => Self(operation.to_string()),
        }
    }

    /// The key as a string slice (usable as a file name or map key).
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An asynchronous data-fetch operation that the cache can decorate.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Name of the operation, used for cache keys and configuration checks.
    const OPERATION: &'static str;

    /// Call arguments, forwarded unchanged to the origin and the store key.
    type Args: KeyArgs + Send + Sync;

    /// Payload the operation produces.
    type Payload: Timestamped + Clone + Send + Sync;

    /// Error the operation fails with.
    type Error: Send;

    /// Performs the fetch.
    async fn fetch(&self, args: &Self::Args) -> Result<Self::Payload, Self::Error>;
}
