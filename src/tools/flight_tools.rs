//! Airport lookup and flight search tools

use crate::error::AppError;
use crate::search::model::{parse_date, IataCode, TripSpec, TripType};
use crate::search::{AirportResolver, FlightSearchExecutor, SearchError};
use crate::tools::Tool;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

/// `search_airport` arguments
#[derive(Debug, Deserialize)]
pub struct SearchAirportArgs {
    /// Free-text place name
    pub query: String,
}

/// `search_flights` arguments
#[derive(Debug, Deserialize)]
pub struct SearchFlightsArgs {
    /// Departure airport code
    pub departure_id: String,
    /// Arrival airport code
    pub arrival_id: String,
    /// `YYYY-MM-DD`
    pub outbound_date: String,
    /// `YYYY-MM-DD`; round trips only
    #[serde(default)]
    pub return_date: Option<String>,
    /// `one_way` or `round_trip`; defaults to `round_trip`
    #[serde(default)]
    pub flight_type: Option<String>,
}

impl SearchFlightsArgs {
    /// Parse into a trip spec; invariants are checked later by the executor
    ///
    /// A blank `return_date` counts as omitted.
    pub fn trip_spec(&self) -> Result<TripSpec, SearchError> {
        let trip_type = match self.flight_type.as_deref() {
            Some(flight_type) => flight_type.parse::<TripType>()?,
            None => TripType::default(),
        };
        let return_date = match self.return_date.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(parse_date("return_date", raw)?),
            _ => None,
        };

        Ok(TripSpec {
            departure_code: IataCode::parse(&self.departure_id)?,
            arrival_code: IataCode::parse(&self.arrival_id)?,
            trip_type,
            outbound_date: parse_date("outbound_date", &self.outbound_date)?,
            return_date,
        })
    }
}

fn parse_args<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T, AppError> {
    serde_json::from_value(arguments)
        .map_err(|e| AppError::InvalidArguments(format!("invalid arguments for {}: {}", tool, e)))
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to serialize tool result: {}", e)))
}

/// Finds airports for a place name
pub struct SearchAirportTool {
    resolver: AirportResolver,
}

impl SearchAirportTool {
    /// Tool backed by `resolver`
    pub fn new(resolver: AirportResolver) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl Tool for SearchAirportTool {
    fn name(&self) -> &str {
        "search_airport"
    }

    fn description(&self) -> &str {
        "Find airports matching a city or airport name. Returns candidates (name, city, \
         iata_code) in relevance order; an empty list means nothing matched. When several \
         airports match, ask the user which one they mean before searching flights."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "City or airport name, e.g. Kochi or Toronto"
                }
            },
            "required": ["query"]
        })
    }

    async fn call(&self, arguments: Value) -> Result<Value, AppError> {
        let args: SearchAirportArgs = parse_args(self.name(), arguments)?;
        let candidates = self.resolver.search_airport(&args.query).await?;
        to_value(&candidates)
    }
}

/// Searches flight offers between two airports
pub struct SearchFlightsTool {
    executor: FlightSearchExecutor,
}

impl SearchFlightsTool {
    /// Tool backed by `executor`
    pub fn new(executor: FlightSearchExecutor) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl Tool for SearchFlightsTool {
    fn name(&self) -> &str {
        "search_flights"
    }

    fn description(&self) -> &str {
        "Search flights between two airports on the given dates. Returns best_offers and \
         other_offers in provider ranking order; two empty lists mean no flights were found."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "departure_id": {
                    "type": "string",
                    "description": "Departure airport IATA code (e.g., JFK, COK)"
                },
                "arrival_id": {
                    "type": "string",
                    "description": "Arrival airport IATA code (e.g., MAD, YYZ)"
                },
                "outbound_date": {
                    "type": "string",
                    "description": "Outbound date in YYYY-MM-DD format"
                },
                "return_date": {
                    "type": "string",
                    "description": "Return date in YYYY-MM-DD format; required for round_trip, must be omitted for one_way"
                },
                "flight_type": {
                    "type": "string",
                    "enum": ["round_trip", "one_way"],
                    "default": "round_trip",
                    "description": "Type of trip"
                }
            },
            "required": ["departure_id", "arrival_id", "outbound_date"]
        })
    }

    async fn call(&self, arguments: Value) -> Result<Value, AppError> {
        let args: SearchFlightsArgs = parse_args(self.name(), arguments)?;
        let spec = args.trip_spec()?;
        let result = self.executor.search_flights(&spec).await?;
        to_value(&result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::FixtureProvider;
    use crate::search::FixedClock;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn flights_tool(provider: Arc<FixtureProvider>) -> SearchFlightsTool {
        let clock = Arc::new(FixedClock(NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()));
        SearchFlightsTool::new(FlightSearchExecutor::new(provider, clock, 3, "USD"))
    }

    #[test]
    fn test_args_default_to_round_trip_and_uppercase_codes() {
        let args: SearchFlightsArgs = serde_json::from_value(json!({
            "departure_id": "cok",
            "arrival_id": "yyz",
            "outbound_date": "2025-11-15",
            "return_date": "2025-11-22"
        }))
        .unwrap();

        let spec = args.trip_spec().unwrap();

        assert_eq!(spec.trip_type, TripType::RoundTrip);
        assert_eq!(spec.departure_code.as_str(), "COK");
        assert_eq!(spec.arrival_code.as_str(), "YYZ");
        assert_eq!(spec.return_date, NaiveDate::from_ymd_opt(2025, 11, 22));
    }

    #[test]
    fn test_blank_return_date_counts_as_omitted() {
        let args: SearchFlightsArgs = serde_json::from_value(json!({
            "departure_id": "COK",
            "arrival_id": "YYZ",
            "outbound_date": "2025-11-15",
            "return_date": "  ",
            "flight_type": "one_way"
        }))
        .unwrap();

        assert_eq!(args.trip_spec().unwrap().return_date, None);
    }

    #[test]
    fn test_bad_date_format_is_invalid_input() {
        let args: SearchFlightsArgs = serde_json::from_value(json!({
            "departure_id": "COK",
            "arrival_id": "YYZ",
            "outbound_date": "Nov 15"
        }))
        .unwrap();

        let err = args.trip_spec().unwrap_err();
        assert!(err.to_string().contains("outbound_date"));
    }

    #[tokio::test]
    async fn test_missing_query_is_invalid_arguments() {
        let tool = SearchAirportTool::new(AirportResolver::new(Arc::new(FixtureProvider::new())));
        let err = tool.call(json!({"place": "Kochi"})).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn test_empty_query_is_invalid_input() {
        let tool = SearchAirportTool::new(AirportResolver::new(Arc::new(FixtureProvider::new())));
        let err = tool.call(json!({"query": ""})).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Search(SearchError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_round_trip_without_return_date_is_rejected() {
        let provider = Arc::new(FixtureProvider::new());
        let err = flights_tool(provider.clone())
            .call(json!({
                "departure_id": "COK",
                "arrival_id": "YYZ",
                "outbound_date": "2025-11-15"
            }))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Search(SearchError::InvalidInput(_))));
        assert!(provider.flight_queries().is_empty());
    }

    #[tokio::test]
    async fn test_one_way_with_return_date_is_rejected() {
        let provider = Arc::new(FixtureProvider::new());
        let err = flights_tool(provider.clone())
            .call(json!({
                "departure_id": "COK",
                "arrival_id": "YYZ",
                "outbound_date": "2025-11-15",
                "return_date": "2025-11-22",
                "flight_type": "one_way"
            }))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("one-way"));
        assert!(provider.flight_queries().is_empty());
    }

    #[tokio::test]
    async fn test_zero_offers_serializes_as_empty_lists() {
        let provider = Arc::new(FixtureProvider::new());
        let result = flights_tool(provider)
            .call(json!({
                "departure_id": "COK",
                "arrival_id": "YYZ",
                "outbound_date": "2025-11-15",
                "flight_type": "one_way"
            }))
            .await
            .unwrap();

        assert_eq!(result["best_offers"], json!([]));
        assert_eq!(result["other_offers"], json!([]));
    }
}
