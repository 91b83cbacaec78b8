//! Application state shared by the HTTP handlers
//!
//! Everything here is read-only after startup, so handlers share one
//! `Arc<AppState>` without locking.

use crate::config::{Config, SearchConfig};
use crate::conversation::Orchestrator;
use crate::provider::{FlightDataProvider, SearchApiClient};
use crate::search::{AirportResolver, Clock, FlightSearchExecutor, SystemClock};
use crate::tools::{SearchAirportTool, SearchFlightsTool, ToolRegistry};
use std::sync::Arc;

/// Tool registry and conversation orchestrator
pub struct AppState {
    /// Tools callable through `/api/tools/:name`
    pub registry: ToolRegistry,
    /// Multi-turn workflow behind `/api/conversation`
    pub orchestrator: Orchestrator,
}

impl AppState {
    /// Build state backed by the SearchAPI.io client
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = SearchApiClient::new(&config.provider)?;
        Ok(Self::with_provider(
            Arc::new(client),
            Arc::new(SystemClock),
            &config.search,
            &config.provider.currency,
        ))
    }

    /// Build state around any provider and clock
    pub fn with_provider(
        provider: Arc<dyn FlightDataProvider>,
        clock: Arc<dyn Clock>,
        search: &SearchConfig,
        currency: &str,
    ) -> Self {
        let resolver = AirportResolver::new(provider.clone());
        let executor =
            FlightSearchExecutor::new(provider, clock, search.max_offers_per_bucket, currency);

        let mut registry = ToolRegistry::new();
        registry.register(SearchAirportTool::new(resolver.clone()));
        registry.register(SearchFlightsTool::new(executor.clone()));

        let orchestrator = Orchestrator::new(
            resolver,
            executor,
            search.max_airport_choices,
            search.max_search_attempts,
        );

        Self {
            registry,
            orchestrator,
        }
    }
}
