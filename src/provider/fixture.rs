//! Deterministic in-memory provider
//!
//! Serves canned payloads and records every query it receives, so the
//! resolver, executor and conversation can be exercised without a network.

use crate::provider::types::{AirportLookupResponse, FlightsResponse};
use crate::provider::{FlightDataProvider, FlightQuery};
use crate::search::error::SearchError;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Canned-response provider
///
/// Airport lookups are keyed by the trimmed, lowercased query; unknown queries
/// yield no suggestions. Flight searches pop queued outcomes in order, and the
/// last queued outcome repeats once the queue is down to one entry.
#[derive(Debug, Default)]
pub struct FixtureProvider {
    airports: HashMap<String, Result<AirportLookupResponse, SearchError>>,
    flight_outcomes: Mutex<VecDeque<Result<FlightsResponse, SearchError>>>,
    airport_queries: Mutex<Vec<String>>,
    flight_queries: Mutex<Vec<FlightQuery>>,
}

impl FixtureProvider {
    /// Provider with no canned data
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `query` with the given autocomplete payload
    pub fn with_airports_json(mut self, query: &str, json: &str) -> serde_json::Result<Self> {
        let response: AirportLookupResponse = serde_json::from_str(json)?;
        self.airports.insert(key(query), Ok(response));
        Ok(self)
    }

    /// Fail lookups of `query` with `error`
    pub fn with_airport_error(mut self, query: &str, error: SearchError) -> Self {
        self.airports.insert(key(query), Err(error));
        self
    }

    /// Queue a flight search payload
    pub fn with_flights_json(self, json: &str) -> serde_json::Result<Self> {
        let response: FlightsResponse = serde_json::from_str(json)?;
        self.queue(Ok(response));
        Ok(self)
    }

    /// Queue a flight search failure
    pub fn with_flight_error(self, error: SearchError) -> Self {
        self.queue(Err(error));
        self
    }

    /// Airport queries received so far, in order
    pub fn airport_queries(&self) -> Vec<String> {
        lock(&self.airport_queries).clone()
    }

    /// Flight queries received so far, in order
    pub fn flight_queries(&self) -> Vec<FlightQuery> {
        lock(&self.flight_queries).clone()
    }

    fn queue(&self, outcome: Result<FlightsResponse, SearchError>) {
        lock(&self.flight_outcomes).push_back(outcome);
    }
}

#[async_trait]
impl FlightDataProvider for FixtureProvider {
    async fn lookup_airports(&self, query: &str) -> Result<AirportLookupResponse, SearchError> {
        lock(&self.airport_queries).push(query.to_string());
        self.airports
            .get(&key(query))
            .cloned()
            .unwrap_or_else(|| Ok(AirportLookupResponse::default()))
    }

    async fn search_flights(&self, query: &FlightQuery) -> Result<FlightsResponse, SearchError> {
        lock(&self.flight_queries).push(query.clone());
        let mut outcomes = lock(&self.flight_outcomes);
        match outcomes.len() {
            0 => Ok(FlightsResponse::default()),
            1 => outcomes
                .front()
                .cloned()
                .unwrap_or_else(|| Ok(FlightsResponse::default())),
            _ => outcomes
                .pop_front()
                .unwrap_or_else(|| Ok(FlightsResponse::default())),
        }
    }
}

fn key(query: &str) -> String {
    query.trim().to_lowercase()
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
