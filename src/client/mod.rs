//! Response models for the Open Exchange Rates API
//!
//! This module contains the data types returned by the provider, plus the
//! HTTP client that fetches them.

pub mod oxr;

pub use oxr::{ClientError, Currencies, Historical, Latest, OxrClient, OxrError};

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::Timestamped;

/// Exchange rates snapshot from the `latest` and `historical` endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rates {
    /// Provider disclaimer text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disclaimer: Option<String>,
    /// Provider license text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    /// When the rates were published, in unix seconds as reported by the provider
    pub timestamp: i64,
    /// Base currency the rates are relative to (e.g. "USD")
    pub base: String,
    /// Map of currency code to rate against the base
    pub rates: HashMap<String, f64>,
}

impl Timestamped for Rates {
    fn fetched_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

/// Map of currency code to display name from the `currencies` endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyList(pub BTreeMap<String, String>);

impl Timestamped for CurrencyList {
    // The currency list carries no timestamp; under the default infinite
    // TTL it is cached forever.
    fn fetched_at(&self) -> Option<DateTime<Utc>> {
        None
    }
}
