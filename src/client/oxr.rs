//! Open Exchange Rates HTTP client
//!
//! This module provides the thin HTTP facade over the provider's API. The
//! provider signals failures inside a JSON body rather than (only) through
//! HTTP status codes, so every response is first checked against the error
//! envelope before being parsed into its payload shape.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use super::{CurrencyList, Rates};
use crate::cache::Fetch;

/// Base URL for the Open Exchange Rates API
const OXR_BASE_URL: &str = "https://openexchangerates.org/api";

/// Error reported by the provider in a response body
///
/// Example: `{"status": 401, "message": "invalid_app_id", "description":
/// "Invalid App ID - please sign up ..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Deserialize)]
#[error("{message} (status {status}): {description}")]
pub struct OxrError {
    /// HTTP-like status code reported by the provider
    pub status: u16,
    /// Short machine-readable message (e.g. "invalid_app_id")
    pub message: String,
    /// Human-readable description
    pub description: String,
}

/// Errors that can occur when fetching data from the provider
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The provider reported an error in the response body
    #[error(transparent)]
    Api(#[from] OxrError),
}

/// Error envelope the provider returns in place of a payload
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: bool,
    status: u16,
    message: String,
    description: String,
}

/// Client for the Open Exchange Rates API
#[derive(Debug, Clone)]
pub struct OxrClient {
    client: Client,
    app_id: String,
    base_url: String,
}

impl OxrClient {
    /// Creates a client authenticating with the given app id.
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            app_id: app_id.into(),
            base_url: OXR_BASE_URL.to_string(),
        }
    }

    /// Creates a client with a custom HTTP client.
    pub fn with_client(client: Client, app_id: impl Into<String>) -> Self {
        Self {
            client,
            app_id: app_id.into(),
            base_url: OXR_BASE_URL.to_string(),
        }
    }

    /// Overrides the API base URL (no trailing slash).
    ///
    /// Useful for testing against a local mock server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sends a GET request to an endpoint and parses the response,
    /// surfacing the provider's error envelope as [`OxrError`].
    async fn send<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ClientError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .client
            .get(&url)
            .query(&[("app_id", self.app_id.as_str())])
            .send()
            .await?;
        let text = response.text().await?;

        if let Ok(body) = serde_json::from_str::<ErrorBody>(&text) {
            if body.error {
                return Err(OxrError {
                    status: body.status,
                    message: body.message,
                    description: body.description,
                }
                .into());
            }
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// Fetches the latest exchange rates.
    pub async fn latest(&self) -> Result<Rates, ClientError> {
        self.send("latest.json").await
    }

    /// Fetches the exchange rates for a given date.
    pub async fn historical(&self, date: NaiveDate) -> Result<Rates, ClientError> {
        self.send(&format!("historical/{}.json", date.format("%Y-%m-%d")))
            .await
    }

    /// Fetches the list of supported currencies.
    pub async fn currencies(&self) -> Result<CurrencyList, ClientError> {
        self.send("currencies.json").await
    }
}

/// The `latest` operation as a decoratable fetch.
#[derive(Debug, Clone)]
pub struct Latest(pub OxrClient);

#[async_trait]
impl Fetch for Latest {
    const OPERATION: &'static str = "latest";
    type Args = ();
    type Payload = Rates;
    type Error = ClientError;

    async fn fetch(&self, _args: &()) -> Result<Rates, ClientError> {
        self.0.latest().await
    }
}

/// The `historical` operation as a decoratable fetch, keyed by date.
#[derive(Debug, Clone)]
pub struct Historical(pub OxrClient);

#[async_trait]
impl Fetch for Historical {
    const OPERATION: &'static str = "historical";
    type Args = NaiveDate;
    type Payload = Rates;
    type Error = ClientError;

    async fn fetch(&self, date: &NaiveDate) -> Result<Rates, ClientError> {
        self.0.historical(*date).await
    }
}

/// The `currencies` operation as a decoratable fetch.
#[derive(Debug, Clone)]
pub struct Currencies(pub OxrClient);

#[async_trait]
impl Fetch for Currencies {
    const OPERATION: &'static str = "currencies";
    type Args = ();
    type Payload = CurrencyList;
    type Error = ClientError;

    async fn fetch(&self, _args: &()) -> Result<CurrencyList, ClientError> {
        self.0.currencies().await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> OxrClient {
        OxrClient::new("test-app-id").with_base_url(format!("{}/api", server.uri()))
    }

    fn rates_body() -> serde_json::Value {
        json!({
            "disclaimer": "Exchange rates provided by [...]",
            "license": "Data collected and blended [...]",
            "timestamp": 1319730758,
            "base": "USD",
            "rates": {
                "AED": 3.672626,
                "EUR": 0.91,
                "ZWL": 322.355011
            }
        })
    }

    #[tokio::test]
    async fn test_latest_parses_the_rates_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/latest.json"))
            .and(query_param("app_id", "test-app-id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(rates_body()))
            .expect(1)
            .mount(&server)
            .await;

        let rates = client_for(&server).latest().await.expect("latest should succeed");

        assert_eq!(rates.base, "USD");
        assert_eq!(rates.timestamp, 1319730758);
        assert!(rates.disclaimer.is_some());
        assert!(rates.license.is_some());
        assert!((rates.rates["AED"] - 3.672626).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_error_body_is_parsed_into_oxr_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/latest.json"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": true,
                "status": 401,
                "message": "invalid_app_id",
                "description": "Invalid App ID provided. Please sign up at https://openexchangerates.org/signup"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).latest().await.expect_err("latest should fail");

        match err {
            ClientError::Api(api) => {
                assert_eq!(api.status, 401);
                assert_eq!(api.message, "invalid_app_id");
                assert!(api.description.contains("Invalid App ID"));
            }
            other => panic!("expected provider error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_historical_formats_the_date_into_the_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/historical/2013-12-29.json"))
            .and(query_param("app_id", "test-app-id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(rates_body()))
            .expect(1)
            .mount(&server)
            .await;

        let date = NaiveDate::from_ymd_opt(2013, 12, 29).unwrap();
        let rates = client_for(&server)
            .historical(date)
            .await
            .expect("historical should succeed");

        assert_eq!(rates.base, "USD");
    }

    #[tokio::test]
    async fn test_historical_zero_pads_single_digit_dates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/historical/2024-03-05.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(rates_body()))
            .expect(1)
            .mount(&server)
            .await;

        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        client_for(&server)
            .historical(date)
            .await
            .expect("historical should succeed");
    }

    #[tokio::test]
    async fn test_currencies_parses_the_currency_map() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/currencies.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "USD": "United States Dollar",
                "EUR": "Euro"
            })))
            .mount(&server)
            .await;

        let currencies = client_for(&server)
            .currencies()
            .await
            .expect("currencies should succeed");

        assert_eq!(currencies.0["USD"], "United States Dollar");
    }

    #[tokio::test]
    async fn test_malformed_payload_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/latest.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json {"))
            .mount(&server)
            .await;

        let err = client_for(&server).latest().await.expect_err("latest should fail");

        assert!(matches!(err, ClientError::Parse(_)));
    }
}
