//! SearchAPI client
//!
//! HTTP client for the SearchAPI.io Google Flights engines. Every call is a
//! single GET with the credential passed as the `api_key` query parameter.
//! Provider failures are mapped onto [`SearchError`] here, so callers never see
//! transport details.

use crate::config::ProviderConfig;
use crate::provider::types::{AirportLookupResponse, ErrorEnvelope, FlightsResponse};
use crate::provider::{FlightDataProvider, FlightQuery};
use crate::search::error::SearchError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

const FLIGHTS_ENGINE: &str = "google_flights";
const AUTOCOMPLETE_ENGINE: &str = "google_flights_autocomplete";

/// Longest slice of an error body kept in error messages
const MAX_ERROR_BODY_CHARS: usize = 200;

/// SearchAPI.io client
///
/// Cheap to clone; the inner `reqwest::Client` shares its connection pool.
#[derive(Debug, Clone)]
pub struct SearchApiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    currency: String,
    timeout_secs: u64,
}

impl SearchApiClient {
    /// Build a client with its own connection pool and the configured timeout
    pub fn new(config: &ProviderConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self::with_client(http, config))
    }

    /// Build a client on top of an existing `reqwest::Client`
    pub fn with_client(http: reqwest::Client, config: &ProviderConfig) -> Self {
        Self {
            http,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            currency: config.currency.clone(),
            timeout_secs: config.timeout_secs,
        }
    }

    /// Issue one GET against `engine` and decode the body
    ///
    /// # Errors
    /// * `Authentication` - no credential configured, HTTP 401/403, or the
    ///   provider says the key is invalid
    /// * `UpstreamUnavailable` - transport failure, timeout, HTTP 429 or 5xx
    /// * `InvalidInput` - HTTP 400
    /// * `UpstreamContractViolation` - any other status, or a body that does
    ///   not decode
    async fn get<T>(&self, engine: &str, params: &[(&str, &str)]) -> Result<T, SearchError>
    where
        T: DeserializeOwned + Default,
    {
        if self.api_key.is_empty() {
            return Err(SearchError::Authentication(
                "SEARCHAPI_KEY is not set".to_string(),
            ));
        }

        tracing::debug!(
            engine = engine,
            base_url = %self.base_url,
            params = ?params,
            "Calling SearchAPI"
        );

        let response = self
            .http
            .get(&self.base_url)
            .query(&[("engine", engine)])
            .query(params)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                // the URL carries the credential
                let e = e.without_url();
                if e.is_timeout() {
                    SearchError::UpstreamUnavailable(format!(
                        "request timed out after {} seconds",
                        self.timeout_secs
                    ))
                } else {
                    SearchError::UpstreamUnavailable(format!("request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            let message = provider_message(&error_body);

            tracing::error!(
                engine = engine,
                status_code = status_code,
                error = %message,
                "SearchAPI returned error status"
            );

            return Err(map_status(status_code, message));
        }

        let body = response.text().await.map_err(|e| {
            SearchError::UpstreamUnavailable(format!(
                "failed to read response body: {}",
                e.without_url()
            ))
        })?;

        if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&body) {
            return classify_error_envelope(engine, envelope.error);
        }

        let parsed = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(engine = engine, error = %e, "Failed to parse SearchAPI response");
            SearchError::UpstreamContractViolation(format!(
                "failed to parse {} response: {}",
                engine, e
            ))
        })?;

        tracing::debug!(engine = engine, body_len = body.len(), "SearchAPI call succeeded");
        Ok(parsed)
    }
}

#[async_trait]
impl FlightDataProvider for SearchApiClient {
    async fn lookup_airports(&self, query: &str) -> Result<AirportLookupResponse, SearchError> {
        self.get(AUTOCOMPLETE_ENGINE, &[("q", query)]).await
    }

    async fn search_flights(&self, query: &FlightQuery) -> Result<FlightsResponse, SearchError> {
        let mut params = vec![
            ("flight_type", query.flight_type.as_str()),
            ("departure_id", query.departure_id.as_str()),
            ("arrival_id", query.arrival_id.as_str()),
            ("outbound_date", query.outbound_date.as_str()),
            ("currency", self.currency.as_str()),
        ];
        if let Some(return_date) = &query.return_date {
            params.push(("return_date", return_date.as_str()));
        }
        self.get(FLIGHTS_ENGINE, &params).await
    }
}

fn map_status(status_code: u16, message: String) -> SearchError {
    match status_code {
        401 | 403 => SearchError::Authentication(format!("HTTP {}: {}", status_code, message)),
        429 | 500..=599 => {
            SearchError::UpstreamUnavailable(format!("HTTP {}: {}", status_code, message))
        }
        400 => SearchError::InvalidInput(message),
        _ => SearchError::UpstreamContractViolation(format!(
            "unexpected HTTP {}: {}",
            status_code, message
        )),
    }
}

/// Pull the provider's own message out of an error body
fn provider_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error,
        Err(_) => body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
    }
}

/// A 200 response can still carry an `error` field instead of results
fn classify_error_envelope<T: Default>(engine: &str, error: String) -> Result<T, SearchError> {
    let lowered = error.to_lowercase();
    if lowered.contains("api key") || lowered.contains("api_key") {
        return Err(SearchError::Authentication(error));
    }
    if lowered.contains("returned any results") || lowered.contains("no results") {
        tracing::info!(engine = engine, message = %error, "SearchAPI reported no results");
        return Ok(T::default());
    }
    tracing::error!(engine = engine, message = %error, "SearchAPI returned an error payload");
    Err(SearchError::UpstreamContractViolation(error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    const SEARCH_PATH: &str = "/api/v1/search";

    fn config(base_url: String, api_key: &str) -> ProviderConfig {
        ProviderConfig {
            api_key: api_key.to_string(),
            base_url,
            timeout_secs: 5,
            currency: "USD".to_string(),
        }
    }

    fn client_for(server: &Server) -> SearchApiClient {
        SearchApiClient::new(&config(
            format!("{}{}", server.url(), SEARCH_PATH),
            "test-key",
        ))
        .unwrap()
    }

    fn one_way_query() -> FlightQuery {
        FlightQuery {
            departure_id: "COK".to_string(),
            arrival_id: "YYZ".to_string(),
            outbound_date: "2025-11-15".to_string(),
            return_date: None,
            flight_type: "one_way".to_string(),
        }
    }

    #[tokio::test]
    async fn test_empty_api_key_fails_without_request() {
        let client =
            SearchApiClient::new(&config("http://127.0.0.1:1".to_string(), "")).unwrap();
        let err = client.lookup_airports("Kochi").await.unwrap_err();
        assert!(matches!(err, SearchError::Authentication(_)));
        assert!(err.to_string().contains("SEARCHAPI_KEY"));
    }

    #[tokio::test]
    async fn test_lookup_airports_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("engine".into(), "google_flights_autocomplete".into()),
                Matcher::UrlEncoded("q".into(), "Kochi".into()),
                Matcher::UrlEncoded("api_key".into(), "test-key".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{
                    "suggestions": [{
                        "type": "airport",
                        "name": "Cochin International Airport",
                        "id": "COK",
                        "city": "Kochi"
                    }]
                }"#,
            )
            .create_async()
            .await;

        let response = client_for(&server).lookup_airports("Kochi").await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.suggestions.len(), 1);
        assert_eq!(response.suggestions[0].id.as_deref(), Some("COK"));
    }

    #[tokio::test]
    async fn test_search_flights_sends_round_trip_params() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("engine".into(), "google_flights".into()),
                Matcher::UrlEncoded("flight_type".into(), "round_trip".into()),
                Matcher::UrlEncoded("departure_id".into(), "COK".into()),
                Matcher::UrlEncoded("arrival_id".into(), "YYZ".into()),
                Matcher::UrlEncoded("outbound_date".into(), "2025-11-15".into()),
                Matcher::UrlEncoded("return_date".into(), "2025-11-22".into()),
                Matcher::UrlEncoded("currency".into(), "USD".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"best_flights": [], "other_flights": []}"#)
            .create_async()
            .await;

        let query = FlightQuery {
            return_date: Some("2025-11-22".to_string()),
            flight_type: "round_trip".to_string(),
            ..one_way_query()
        };
        let response = client_for(&server).search_flights(&query).await.unwrap();

        mock.assert_async().await;
        assert!(response.best_flights.is_empty());
        assert!(response.other_flights.is_empty());
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_authentication() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"error": "Invalid API key. Your API key should be here: https://www.searchapi.io/api_tokens"}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .search_flights(&one_way_query())
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, SearchError::Authentication(_)));
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("HTTP 401"));
    }

    #[tokio::test]
    async fn test_server_error_maps_to_unavailable() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("Service Unavailable")
            .create_async()
            .await;

        let err = client_for(&server)
            .search_flights(&one_way_query())
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, SearchError::UpstreamUnavailable(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_rate_limit_maps_to_unavailable() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::Any)
            .with_status(429)
            .with_body(r#"{"error": "Rate limit exceeded"}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .lookup_airports("Toronto")
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, SearchError::UpstreamUnavailable(_)));
        assert!(err.to_string().contains("Rate limit exceeded"));
    }

    #[tokio::test]
    async fn test_bad_request_maps_to_invalid_input() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(r#"{"error": "Parameter `outbound_date` is invalid."}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .search_flights(&one_way_query())
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert_eq!(
            err,
            SearchError::InvalidInput("Parameter `outbound_date` is invalid.".to_string())
        );
    }

    #[tokio::test]
    async fn test_invalid_json_maps_to_contract_violation() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("This is not JSON")
            .create_async()
            .await;

        let err = client_for(&server)
            .search_flights(&one_way_query())
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, SearchError::UpstreamContractViolation(_)));
        assert!(err.to_string().contains("failed to parse"));
    }

    #[tokio::test]
    async fn test_leg_without_airports_is_contract_violation() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"best_flights": [{"flights": [{"airline": "Air India"}], "price": 900}]}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .search_flights(&one_way_query())
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, SearchError::UpstreamContractViolation(_)));
    }

    #[tokio::test]
    async fn test_no_results_payload_is_empty_response() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"error": "Google Flights hasn't returned any results for this query."}"#)
            .create_async()
            .await;

        let response = client_for(&server)
            .search_flights(&one_way_query())
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(response.best_flights.is_empty());
        assert!(response.other_flights.is_empty());
    }

    #[tokio::test]
    async fn test_connection_failure_maps_to_unavailable() {
        let client = SearchApiClient::new(&config(
            "http://127.0.0.1:1/api/v1/search".to_string(),
            "secret-key",
        ))
        .unwrap();

        let err = client.lookup_airports("Kochi").await.unwrap_err();

        assert!(matches!(err, SearchError::UpstreamUnavailable(_)));
        assert!(!err.to_string().contains("secret-key"));
    }

    #[test]
    fn test_provider_message_truncates_plain_bodies() {
        let body = "x".repeat(500);
        assert_eq!(provider_message(&body).len(), MAX_ERROR_BODY_CHARS);
        assert_eq!(provider_message(r#"{"error": "nope"}"#), "nope");
    }
}
