//! Cache configuration: TTL policy and per-operation defaults

use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors raised while decorating an operation
///
/// Raised synchronously at decoration time; the configuration must be fixed
/// and the decoration retried. Nothing is constructed on failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The configuration targets a different operation than the one being wrapped
    #[error("the wrapped operation is `{actual}` but the configuration targets `{configured}`")]
    OperationMismatch {
        /// Operation name the configuration was built for
        configured: String,
        /// Operation name of the value actually being decorated
        actual: &'static str,
    },
}

/// Maximum age after which a cached record is eligible for refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    /// Records older than this duration are stale
    Finite(Duration),
    /// Records never expire once cached
    Infinite,
}

impl Ttl {
    /// 24 hours, the default for the `latest` operation.
    pub const DAY: Self = Self::Finite(Duration::from_secs(24 * 3600));

    /// Finite TTL from a millisecond count.
    pub fn from_millis(millis: u64) -> Self {
        Self::Finite(Duration::from_millis(millis))
    }

    /// Default TTL for an operation: 24h for `latest`, infinite otherwise.
    ///
    /// Rates that are not the latest snapshot never change retroactively,
    /// so anything else is cached forever unless configured otherwise.
    pub fn default_for(operation: &str) -> Self {
        if operation == "latest" {
            Self::DAY
        } else {
            Self::Infinite
        }
    }

    /// Freshness test: a record fetched at `fetched_at` is fresh at `now`
    /// iff `fetched_at + ttl > now`.
    ///
    /// A record with no timestamp is never fresh under a finite TTL.
    pub fn is_fresh(&self, fetched_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        match (self, fetched_at) {
            (Self::Infinite, _) => true,
            (Self::Finite(ttl), Some(at)) => match chrono::Duration::from_std(*ttl) {
                Ok(ttl) => now.signed_duration_since(at) < ttl,
                // A duration too large for chrono arithmetic never elapses
                Err(_) => true,
            },
            (Self::Finite(_), None) => false,
        }
    }
}

/// Immutable configuration resolved once at decoration time
///
/// Holds the name of the operation being wrapped and the TTL policy applied
/// to its cached records. Built with [`CacheConfig::for_operation`], which
/// resolves the per-operation TTL default, optionally overridden with
/// [`CacheConfig::with_ttl`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    operation: String,
    ttl: Ttl,
}

impl CacheConfig {
    /// Configuration for the named operation with its default TTL.
    pub fn for_operation(operation: impl Into<String>) -> Self {
        let operation = operation.into();
        let ttl = Ttl::default_for(&operation);
        Self { operation, ttl }
    }

    /// Overrides the TTL.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Ttl) -> Self {
        self.ttl = ttl;
        self
    }

    /// Name of the operation this configuration targets.
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// TTL applied to cached records.
    pub fn ttl(&self) -> Ttl {
        self.ttl
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::for_operation("latest")
    }
}
