//! Store-agnostic TTL cache for fetch operations
//!
//! This module provides a cache decorator that wraps any [`Fetch`] operation
//! with configurable TTL (time-to-live) values. It supports graceful
//! degradation by serving an expired record when the origin is unavailable,
//! and treats store failures as best-effort so a broken cache never takes
//! the data path down.

mod cached;
mod config;
mod disk;
mod fetch;
mod store;

pub use cached::Cached;
pub use config::{CacheConfig, ConfigError, Ttl};
pub use disk::FileStore;
pub use fetch::{CacheKey, Fetch, KeyArgs, Timestamped};
pub use store::{MemoryStore, Store, StoreError};
