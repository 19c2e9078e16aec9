//! Open Exchange Rates client with a pluggable response cache
//!
//! The [`client`] module is a thin HTTP facade over the provider's API. The
//! [`cache`] module decorates any of its operations with a TTL cache that
//! serves stale data when the provider is unavailable.
//!
//! ```no_run
//! use oxr::cache::{Cached, Fetch, MemoryStore};
//! use oxr::client::{Latest, OxrClient};
//!
//! # async fn run() -> Result<(), oxr::client::ClientError> {
//! let client = OxrClient::new("YOUR_APP_ID");
//! let latest = Cached::with_defaults(Latest(client), MemoryStore::new());
//!
//! let rates = latest.fetch(&()).await?; // hits the API
//! let again = latest.fetch(&()).await?; // served from cache for 24h
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;

pub use cache::{
    CacheConfig, CacheKey, Cached, ConfigError, Fetch, FileStore, MemoryStore, Store, StoreError,
    Timestamped, Ttl,
};
pub use client::{ClientError, CurrencyList, OxrClient, OxrError, Rates};
