//! Flight data provider boundary
//!
//! The resolver and the executor talk to the outside world only through
//! [`FlightDataProvider`]. Production uses [`SearchApiClient`]; tests plug in
//! [`FixtureProvider`].

pub mod client;
pub mod fixture;
pub mod types;

use crate::search::error::SearchError;
use async_trait::async_trait;
use types::{AirportLookupResponse, FlightsResponse};

pub use client::SearchApiClient;
pub use fixture::FixtureProvider;

/// Provider-facing flight query, already validated
///
/// `return_date` is only ever set for round trips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightQuery {
    /// Departure airport code
    pub departure_id: String,
    /// Arrival airport code
    pub arrival_id: String,
    /// `YYYY-MM-DD`
    pub outbound_date: String,
    /// `YYYY-MM-DD`, round trips only
    pub return_date: Option<String>,
    /// `one_way` or `round_trip`
    pub flight_type: String,
}

/// Source of airport and flight data
#[async_trait]
pub trait FlightDataProvider: Send + Sync {
    /// Look up airports matching a free-text place name
    async fn lookup_airports(&self, query: &str) -> Result<AirportLookupResponse, SearchError>;

    /// Search flight offers
    async fn search_flights(&self, query: &FlightQuery) -> Result<FlightsResponse, SearchError>;
}
